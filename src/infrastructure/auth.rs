use crate::domain::auth::{AuthService, Claims, TokenError};
use crate::domain::users::{RoleId, UserId};
use crate::infrastructure::config::JwtConfig;
use anyhow::Result;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

const ALGORITHM: Algorithm = Algorithm::HS512;

/// HMAC-SHA512 signer/verifier bound to a single secret.
pub struct HmacTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl HmacTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

/// Issues access and refresh tokens from two independent secrets, so neither
/// kind can stand in for the other.
pub struct JwtAuthService {
    access: HmacTokenCodec,
    refresh: HmacTokenCodec,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtAuthService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: HmacTokenCodec::new(config.access_secret.as_bytes()),
            refresh: HmacTokenCodec::new(config.refresh_secret.as_bytes()),
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
        }
    }
}

impl AuthService for JwtAuthService {
    fn generate_access_token(&self, user_id: UserId, role_id: RoleId) -> Result<String> {
        self.access
            .encode(&Claims::new(user_id, role_id, self.access_token_expiry))
    }

    fn generate_refresh_token(&self, user_id: UserId, role_id: RoleId) -> Result<String> {
        self.refresh
            .encode(&Claims::new(user_id, role_id, self.refresh_token_expiry))
    }

    fn decode_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.access.decode(token)
    }

    fn decode_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.refresh.decode(token)
    }

    fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }
}
