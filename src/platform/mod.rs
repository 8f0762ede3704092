pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

/// A chat destination that status notifications are delivered to.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Platform identifier (e.g., "telegram")
    fn platform(&self) -> &str;

    async fn deliver(&self, text: &str) -> Result<()>;
}

/// Deliver `text`, logging the outcome. Failures are logged here and handed
/// back so the caller can record whether the chat actually got the message.
pub async fn send_message(notifier: &dyn Notifier, text: &str) -> Result<()> {
    info!("Sending message to {} chat", notifier.platform());
    match notifier.deliver(text).await {
        Ok(()) => {
            debug!("Message sent: {}", text);
            Ok(())
        }
        Err(e) => {
            error!("Message was not sent: {:#}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        fn platform(&self) -> &str {
            "test"
        }

        async fn deliver(&self, _text: &str) -> Result<()> {
            anyhow::bail!("chat not found")
        }
    }

    struct SilentNotifier;

    #[async_trait]
    impl Notifier for SilentNotifier {
        fn platform(&self) -> &str {
            "test"
        }

        async fn deliver(&self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_message_reports_failure() {
        let err = send_message(&FailingNotifier, "hello").await.unwrap_err();
        assert!(err.to_string().contains("chat not found"));
    }

    #[tokio::test]
    async fn test_send_message_reports_success() {
        assert!(send_message(&SilentNotifier, "hello").await.is_ok());
    }
}
