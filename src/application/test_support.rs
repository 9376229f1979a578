//! Shared wiring for use-case tests.

use crate::domain::auth::{AuthService, Session, SessionRepository};
use crate::domain::mailer::Mailer;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{CUSTOMER_ROLE_ID, NewUser, User, UserId, UserRepository};
use crate::infrastructure::auth::JwtAuthService;
use crate::infrastructure::config::JwtConfig;
use crate::infrastructure::password::{MIN_COST, PasswordService};
use crate::infrastructure::repositories::mock::{
    MockOrderRepository, MockSessionRepository, MockUserRepository,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub const PASSWORD: &str = "pa55word-long";

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, serde_json::Value)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        recipient: &str,
        template: &str,
        data: serde_json::Value,
    ) -> Result<(), anyhow::Error> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), template.to_string(), data));
        Ok(())
    }
}

/// Sessions whose row is revoked right after it has been read, as when a
/// logout or password reset lands between a token check and the write.
pub struct RevokedAfterRead(pub MockSessionRepository);

#[async_trait]
impl SessionRepository for RevokedAfterRead {
    async fn save(&self, user_id: UserId, token_hash: &str) -> anyhow::Result<Session> {
        self.0.save(user_id, token_hash).await
    }

    async fn find_by_user_id(&self, user_id: UserId) -> anyhow::Result<Option<Session>> {
        let session = self.0.find_by_user_id(user_id).await?;
        self.0.remove_for_user(user_id).await?;
        Ok(session)
    }

    async fn rotate(
        &self,
        user_id: UserId,
        current_hash: &str,
        new_hash: &str,
    ) -> anyhow::Result<bool> {
        self.0.rotate(user_id, current_hash, new_hash).await
    }

    async fn remove(&self, token_hash: &str) -> anyhow::Result<bool> {
        self.0.remove(token_hash).await
    }

    async fn remove_for_user(&self, user_id: UserId) -> anyhow::Result<bool> {
        self.0.remove_for_user(user_id).await
    }
}

pub struct Fixture {
    pub users: MockUserRepository,
    pub sessions: MockSessionRepository,
    pub orders: MockOrderRepository,
    pub auth: Arc<dyn AuthService>,
    pub passwords: Arc<dyn PasswordHashingService>,
    pub mailer: Arc<RecordingMailer>,
}

impl Fixture {
    pub fn new() -> Self {
        let sessions = MockSessionRepository::default();
        Self {
            users: MockUserRepository::with_sessions(sessions.clone()),
            sessions,
            orders: MockOrderRepository::with_products(&[1, 2, 3]),
            auth: Arc::new(JwtAuthService::new(&JwtConfig {
                access_secret: "test-access-secret".to_string(),
                refresh_secret: "test-refresh-secret".to_string(),
                access_token_expiry: 900,
                refresh_token_expiry: 2_592_000,
            })),
            passwords: Arc::new(PasswordService::new(MIN_COST)),
            mailer: Arc::new(RecordingMailer::default()),
        }
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.users.clone())
    }

    pub fn sessions(&self) -> Arc<dyn SessionRepository> {
        Arc::new(self.sessions.clone())
    }

    pub fn orders(&self) -> Arc<dyn crate::domain::orders::OrderRepository> {
        Arc::new(self.orders.clone())
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.mailer.clone()
    }

    /// Insert an activated customer whose password is [`PASSWORD`].
    pub async fn customer(&self, email: &str) -> User {
        self.user_with_role(email, CUSTOMER_ROLE_ID).await
    }

    pub async fn user_with_role(&self, email: &str, role_id: i64) -> User {
        let user = self
            .users
            .create(NewUser {
                firstname: "Test".to_string(),
                lastname: "User".to_string(),
                phone_number: String::new(),
                email: email.to_string(),
                password_hash: self.passwords.hash_password(PASSWORD).unwrap(),
                role_id,
                activation_token: None,
            })
            .await
            .unwrap();
        user
    }
}
