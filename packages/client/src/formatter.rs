//! Message formatting utilities for client display.

use std::collections::{BTreeSet, HashMap};

use pavlac_server::infrastructure::dto::http::HistoryMessage;
use pavlac_server::infrastructure::dto::websocket::MessageData;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a broadcast chat message with its presence count
    pub fn format_message(data: &MessageData) -> String {
        let label = data.display_name.as_deref().unwrap_or(&data.username);
        format!(
            "\n[{}] {}: {} (online: {})\n",
            data.created_at,
            label,
            data.content,
            data.online_users.len()
        )
    }

    /// Format one row of the history fetched on startup
    pub fn format_history_message(message: &HistoryMessage) -> String {
        let label = message.display_name.as_deref().unwrap_or(&message.username);
        format!("[{}] {}: {}\n", message.created_at, label, message.content)
    }

    /// Format the presence list
    pub fn format_online_users(online_users: &[i64]) -> String {
        if online_users.is_empty() {
            return "Online uživatelé: (nikdo)\n".to_string();
        }
        let ids: Vec<String> = online_users.iter().map(|id| id.to_string()).collect();
        format!("Online uživatelé: {}\n", ids.join(", "))
    }

    /// Format a relayed read receipt with the distinct reader count
    pub fn format_read_receipt(message_id: i64, distinct_readers: usize) -> String {
        format!(
            "\nPřečteno: zpráva {} ({}x)\n",
            message_id, distinct_readers
        )
    }

    /// Format a departure notice together with the remaining presence list
    pub fn format_user_offline(user_id: i64, online_users: &[i64]) -> String {
        format!(
            "\n- Uživatel {} se odpojil\n{}",
            user_id,
            Self::format_online_users(online_users)
        )
    }

    /// Banner printed when a session opens
    pub fn format_connected() -> String {
        "\n=== Chat připojen ===\n".to_string()
    }

    /// Banner printed when a session is lost
    pub fn format_disconnected() -> String {
        "\n=== Chat odpojen ===\n".to_string()
    }
}

/// Tracks which users have read which messages, deduplicating repeated
/// receipts from the same reader.
#[derive(Debug, Default)]
pub struct ReceiptLedger {
    readers: HashMap<i64, BTreeSet<i64>>,
}

impl ReceiptLedger {
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Record that `user_id` read `message_id` and return the number of
    /// distinct readers so far.
    pub fn record(&mut self, message_id: i64, user_id: i64) -> usize {
        let readers = self.readers.entry(message_id).or_default();
        readers.insert(user_id);
        readers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> MessageData {
        MessageData {
            id: 10,
            content: "Ahoj!".to_string(),
            user_id: 1,
            created_at: "2023-01-01T00:00:00.000Z".to_string(),
            username: "alena".to_string(),
            display_name: Some("Alena N.".to_string()),
            online_users: vec![1, 2],
        }
    }

    #[test]
    fn test_format_message_prefers_the_display_name() {
        // Test case: the display name labels the message when present
        // given:
        let data = sample_message();

        // when:
        let result = MessageFormatter::format_message(&data);

        // then:
        assert!(result.contains("Alena N.: Ahoj!"));
        assert!(result.contains("[2023-01-01T00:00:00.000Z]"));
        assert!(result.contains("(online: 2)"));
    }

    #[test]
    fn test_format_message_falls_back_to_the_username() {
        // Test case: without a display name the username labels the message
        // given:
        let mut data = sample_message();
        data.display_name = None;

        // when:
        let result = MessageFormatter::format_message(&data);

        // then:
        assert!(result.contains("alena: Ahoj!"));
    }

    #[test]
    fn test_format_history_message_has_no_presence_count() {
        // Test case: history rows show the timestamp and label only
        // given:
        let message = HistoryMessage {
            id: 1,
            content: "včerejší zpráva".to_string(),
            user_id: 2,
            created_at: "2023-01-01T00:00:00.000Z".to_string(),
            username: "bedrich".to_string(),
            display_name: None,
        };

        // when:
        let result = MessageFormatter::format_history_message(&message);

        // then:
        assert!(result.contains("bedrich: včerejší zpráva"));
        assert!(!result.contains("online"));
    }

    #[test]
    fn test_format_online_users_lists_ids() {
        // Test case: the presence list joins ids with commas
        // when:
        let result = MessageFormatter::format_online_users(&[1, 2, 5]);

        // then:
        assert!(result.contains("Online uživatelé: 1, 2, 5"));
    }

    #[test]
    fn test_format_online_users_handles_empty_list() {
        // Test case: an empty presence list says so instead of trailing off
        // when:
        let result = MessageFormatter::format_online_users(&[]);

        // then:
        assert!(result.contains("(nikdo)"));
    }

    #[test]
    fn test_format_read_receipt_shows_reader_count() {
        // Test case: the receipt names the message and the reader count
        // when:
        let result = MessageFormatter::format_read_receipt(7, 2);

        // then:
        assert!(result.contains("Přečteno"));
        assert!(result.contains("zpráva 7"));
        assert!(result.contains("2x"));
    }

    #[test]
    fn test_format_user_offline_includes_remaining_presence() {
        // Test case: the departure notice carries the updated presence list
        // when:
        let result = MessageFormatter::format_user_offline(3, &[1, 2]);

        // then:
        assert!(result.contains("Uživatel 3 se odpojil"));
        assert!(result.contains("Online uživatelé: 1, 2"));
    }

    #[test]
    fn test_receipt_ledger_counts_distinct_readers() {
        // Test case: repeated receipts from one reader count once
        // given:
        let mut ledger = ReceiptLedger::new();

        // when / then:
        assert_eq!(ledger.record(7, 2), 1);
        assert_eq!(ledger.record(7, 2), 1);
        assert_eq!(ledger.record(7, 3), 2);
        // receipts for another message are tracked separately
        assert_eq!(ledger.record(8, 2), 1);
    }
}
