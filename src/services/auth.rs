use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::config::AppConfig;
use crate::database::connection::DbPool;
use crate::models::auth::Claims;
use crate::models::user::{User, UserError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    User(#[from] UserError),
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl AuthService {
    pub fn new(secret: &str, token_lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_lifetime,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.jwt_expiration_hours))
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user.id, user.email.clone(), self.token_lifetime);
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Expired or tampered tokens are rejected.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub async fn authenticate_user(
        &self,
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(User::authenticate(pool, email, password).await?)
    }
}
