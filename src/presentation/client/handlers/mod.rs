pub mod auth;
pub mod orders;
pub mod profile;
pub mod users;
