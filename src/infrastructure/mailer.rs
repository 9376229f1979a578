use crate::domain::mailer::Mailer;
use async_trait::async_trait;
use std::sync::Arc;

/// Mailer that records the message in the log instead of delivering it.
///
/// Stands in wherever no transport is configured.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        recipient: &str,
        template: &str,
        data: serde_json::Value,
    ) -> Result<(), anyhow::Error> {
        tracing::info!(recipient, template, %data, "Outbound email");
        Ok(())
    }
}

/// Send in the background. Failures are logged and otherwise dropped.
pub fn spawn_email(
    mailer: Arc<dyn Mailer>,
    recipient: String,
    template: &'static str,
    data: serde_json::Value,
) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&recipient, template, data).await {
            tracing::error!("Failed to send {} email to {}: {:?}", template, recipient, e);
        }
    });
}
