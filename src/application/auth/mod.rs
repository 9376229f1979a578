pub mod activate;
pub mod identity;
pub mod login;
pub mod logout;
pub mod password_reset;
pub mod refresh;
pub mod register;
pub mod token_utils;
