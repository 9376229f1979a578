use crate::domain::password::PasswordHashingService;
use anyhow::{Result, bail};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

/// Cheapest and most expensive work factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt hashing with a configurable work factor.
///
/// Verification also accepts Argon2 PHC strings, so accounts imported with
/// such hashes can still sign in.
#[derive(Clone, Debug)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHashingService for PasswordService {
    fn hash_password(&self, password: &str) -> Result<String> {
        if !(MIN_COST..=MAX_COST).contains(&self.cost) {
            bail!("bcrypt cost {} is outside {}..={}", self.cost, MIN_COST, MAX_COST);
        }

        bcrypt::hash(password, self.cost)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// A stored hash that cannot be parsed is an error, not a mismatch.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        if hash.starts_with("$argon2") {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok());
        }

        bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))
    }
}
