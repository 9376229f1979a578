pub mod mock;
pub mod orders;
pub mod sessions;
pub mod users;
