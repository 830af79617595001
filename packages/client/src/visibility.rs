//! Visibility gating for reconnect attempts.
//!
//! Reconnects pause while the client is hidden and resume when it becomes
//! visible again. On Unix the state is driven by signals: SIGUSR1 marks
//! the client hidden, SIGUSR2 visible.

use tokio::sync::watch;

/// Whether the client is currently in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Read side of the visibility state.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    receiver: watch::Receiver<Visibility>,
}

impl VisibilityGate {
    pub fn new(receiver: watch::Receiver<Visibility>) -> Self {
        Self { receiver }
    }

    /// A gate that is permanently visible, for platforms without a signal
    /// watcher and for tests.
    pub fn always_visible() -> Self {
        let (sender, receiver) = watch::channel(Visibility::Visible);
        drop(sender);
        Self { receiver }
    }

    pub fn is_visible(&self) -> bool {
        *self.receiver.borrow() == Visibility::Visible
    }

    /// Wait until the client is visible; returns immediately when it
    /// already is. When the watcher is gone the gate fails open.
    pub async fn wait_until_visible(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() == Visibility::Visible {
                return;
            }
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Spawn the signal watcher driving a [`VisibilityGate`].
#[cfg(unix)]
pub fn spawn_signal_watcher() -> VisibilityGate {
    use tokio::signal::unix::{SignalKind, signal};

    let (sender, receiver) = watch::channel(Visibility::Visible);

    tokio::spawn(async move {
        let mut hide = match signal(SignalKind::user_defined1()) {
            Ok(hide) => hide,
            Err(e) => {
                tracing::warn!("Failed to install SIGUSR1 handler: {}", e);
                return;
            }
        };
        let mut show = match signal(SignalKind::user_defined2()) {
            Ok(show) => show,
            Err(e) => {
                tracing::warn!("Failed to install SIGUSR2 handler: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = hide.recv() => {
                    tracing::info!("Client hidden, reconnects paused");
                    if sender.send(Visibility::Hidden).is_err() {
                        break;
                    }
                }
                _ = show.recv() => {
                    tracing::info!("Client visible, reconnects resume");
                    if sender.send(Visibility::Visible).is_err() {
                        break;
                    }
                }
            }
        }
    });

    VisibilityGate::new(receiver)
}

/// Without Unix signals there is no way to hide the client.
#[cfg(not(unix))]
pub fn spawn_signal_watcher() -> VisibilityGate {
    VisibilityGate::always_visible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_gate_reports_the_current_visibility() {
        // Test case: the gate tracks the watch channel's value
        // given:
        let (sender, receiver) = watch::channel(Visibility::Visible);
        let gate = VisibilityGate::new(receiver);

        // when / then:
        assert!(gate.is_visible());
        sender.send(Visibility::Hidden).unwrap();
        assert!(!gate.is_visible());
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_visible() {
        // Test case: waiting on a visible gate does not block
        // given:
        let (_sender, receiver) = watch::channel(Visibility::Visible);
        let mut gate = VisibilityGate::new(receiver);

        // when / then: completes without outside help
        tokio::time::timeout(Duration::from_secs(1), gate.wait_until_visible())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_blocks_until_the_show_signal() {
        // Test case: a hidden gate releases the waiter once visibility
        // flips back
        // given:
        let (sender, receiver) = watch::channel(Visibility::Hidden);
        let mut gate = VisibilityGate::new(receiver);

        let waiter = tokio::spawn(async move {
            gate.wait_until_visible().await;
            gate
        });

        // then: still waiting while hidden
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!waiter.is_finished());

        // when:
        sender.send(Visibility::Visible).unwrap();

        // then:
        let gate = waiter.await.unwrap();
        assert!(gate.is_visible());
    }

    #[tokio::test]
    async fn test_gate_fails_open_when_the_watcher_is_gone() {
        // Test case: with the sender dropped a hidden gate stops blocking
        // given:
        let (sender, receiver) = watch::channel(Visibility::Hidden);
        let mut gate = VisibilityGate::new(receiver);
        drop(sender);

        // when / then:
        tokio::time::timeout(Duration::from_secs(1), gate.wait_until_visible())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_always_visible_gate_never_blocks() {
        // Test case: the fallback gate is visible and passes waiters through
        // given:
        let mut gate = VisibilityGate::always_visible();

        // when / then:
        assert!(gate.is_visible());
        tokio::time::timeout(Duration::from_secs(1), gate.wait_until_visible())
            .await
            .unwrap();
    }
}
