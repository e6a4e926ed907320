use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64, // expiration time
    pub iat: i64, // issued at
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Payload the payment gateway expects in its `sign` token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayClaims {
    pub school_id: String,
    pub amount: String,
    pub callback_url: String,
}
