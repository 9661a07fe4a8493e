//! Session tokens: HS256 JWTs carrying the user id.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::UserError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: u64,
    pub iat: u64,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, token_duration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
        }
    }

    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String, UserError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| UserError::TokenCreationFailed("System time error".to_string()))?;

        let claims = Claims {
            user_id: user_id.to_string(),
            exp: (now + self.token_duration).as_secs(),
            iat: now.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| UserError::TokenCreationFailed(err.to_string()))
    }

    /// Check signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, UserError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| UserError::InvalidToken(format!("Token validation failed: {err}")))?;

        Ok(token_data.claims)
    }
}
