pub mod auth;
pub mod mailer;
pub mod orders;
pub mod password;
pub mod users;
