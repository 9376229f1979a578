#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

pub mod orders_test;
pub mod users_test;
