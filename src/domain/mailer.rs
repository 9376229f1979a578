use async_trait::async_trait;

pub const WELCOME_TEMPLATE: &str = "user_welcome";
pub const PASSWORD_RESET_TEMPLATE: &str = "password_reset";

/// Outbound mail boundary. Delivery itself lives outside this service.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        template: &str,
        data: serde_json::Value,
    ) -> Result<(), anyhow::Error>;
}
