pub mod delete;
pub mod get;
pub mod list;
pub mod place;
pub mod update_item;
pub mod update_status;
