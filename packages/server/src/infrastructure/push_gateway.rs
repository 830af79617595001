//! Push gateway implementations.

use async_trait::async_trait;

use crate::domain::{PushError, PushGateway};

const DEFAULT_PUSH_API_URL: &str = "https://onesignal.com/api/v1/notifications";

/// Gateway used when no push provider is configured; deliveries are
/// dropped with a debug log.
pub struct NoopPushGateway;

#[async_trait]
impl PushGateway for NoopPushGateway {
    async fn push(
        &self,
        title: &str,
        _body: &str,
        external_ids: &[String],
    ) -> Result<(), PushError> {
        tracing::debug!(
            "Push provider not configured, dropping \"{}\" for {} recipients",
            title,
            external_ids.len()
        );
        Ok(())
    }
}

/// Gateway speaking the OneSignal-style REST API: one POST per batch,
/// recipients addressed by the external user ids they registered with
/// the provider.
pub struct HttpPushGateway {
    client: reqwest::Client,
    api_url: String,
    app_id: String,
    api_key: String,
}

impl HttpPushGateway {
    pub fn new(api_url: String, app_id: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            app_id,
            api_key,
        }
    }

    /// Build a gateway from `PUSH_APP_ID`, `PUSH_API_KEY` and the optional
    /// `PUSH_API_URL`. Returns `None` unless app id and key are both set.
    pub fn from_env() -> Option<Self> {
        let app_id = std::env::var("PUSH_APP_ID").ok()?;
        let api_key = std::env::var("PUSH_API_KEY").ok()?;
        let api_url =
            std::env::var("PUSH_API_URL").unwrap_or_else(|_| DEFAULT_PUSH_API_URL.to_string());
        Some(Self::new(api_url, app_id, api_key))
    }

    fn build_payload(&self, title: &str, body: &str, external_ids: &[String]) -> serde_json::Value {
        serde_json::json!({
            "app_id": self.app_id,
            "include_external_user_ids": external_ids,
            "headings": { "en": title },
            "contents": { "en": body },
        })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn push(
        &self,
        title: &str,
        body: &str,
        external_ids: &[String],
    ) -> Result<(), PushError> {
        let payload = self.build_payload(title, body, external_ids);
        let response = self
            .client
            .post(&self.api_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.api_key),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected(format!("{status}: {detail}")));
        }

        tracing::debug!("Pushed notification to {} recipients", external_ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_gateway_accepts_everything() {
        // Test case: the noop gateway reports success without doing anything
        // given:
        let gateway = NoopPushGateway;

        // when:
        let result = gateway
            .push("Nová zpráva", "alena: ahoj", &["push-bedrich".to_string()])
            .await;

        // then:
        assert!(result.is_ok());
    }

    #[test]
    fn test_http_gateway_builds_provider_payload() {
        // Test case: the request body carries app id, recipients and the
        // localized heading/content blocks the provider expects
        // given:
        let gateway = HttpPushGateway::new(
            DEFAULT_PUSH_API_URL.to_string(),
            "app-123".to_string(),
            "key-456".to_string(),
        );
        let recipients = vec!["push-bedrich".to_string(), "push-cyril".to_string()];

        // when:
        let payload = gateway.build_payload("Nová zpráva", "Alena N.: Ahoj", &recipients);

        // then:
        assert_eq!(payload["app_id"], "app-123");
        assert_eq!(
            payload["include_external_user_ids"],
            serde_json::json!(["push-bedrich", "push-cyril"])
        );
        assert_eq!(payload["headings"]["en"], "Nová zpráva");
        assert_eq!(payload["contents"]["en"], "Alena N.: Ahoj");
    }
}
