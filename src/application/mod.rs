pub mod auth;
pub mod orders;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
