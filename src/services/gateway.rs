use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::auth::GatewayClaims;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Failed to sign gateway payload: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Gateway answer to a collect request.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectRequest {
    pub collect_request_id: String,
    #[serde(rename = "Collect_request_url", alias = "collect_request_url")]
    pub collect_request_url: String,
}

#[derive(Debug, Serialize)]
struct CollectRequestBody<'a> {
    #[serde(flatten)]
    claims: &'a GatewayClaims,
    sign: String,
}

#[derive(Clone)]
pub struct PaymentGateway {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    pg_key: Option<String>,
    school_id: Option<String>,
    callback_url: Option<String>,
}

impl PaymentGateway {
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_url: config.payment_api_url.clone(),
            api_key: config.api_key.clone(),
            pg_key: config.pg_key.clone(),
            school_id: config.school_id.clone(),
            callback_url: config.callback_url.clone(),
        })
    }

    pub fn school_id(&self) -> Result<&str, GatewayError> {
        required(&self.school_id, "SCHOOL_ID")
    }

    /// Builds the claims for a collect request and signs them with the
    /// gateway key.
    pub fn sign(&self, amount: Decimal) -> Result<(GatewayClaims, String), GatewayError> {
        let claims = GatewayClaims {
            school_id: self.school_id()?.to_string(),
            amount: amount.to_string(),
            callback_url: required(&self.callback_url, "CALLBACK_URL")?.to_string(),
        };
        let key = EncodingKey::from_secret(required(&self.pg_key, "PG_KEY")?.as_bytes());
        let sign = encode(&Header::default(), &claims, &key)?;
        Ok((claims, sign))
    }

    pub async fn create_collect_request(&self, amount: Decimal) -> Result<CollectRequest, GatewayError> {
        let api_url = required(&self.api_url, "PAYMENT_API_URL")?;
        let api_key = required(&self.api_key, "API_KEY")?;
        let (claims, sign) = self.sign(amount)?;

        let response = self
            .client
            .post(api_url)
            .bearer_auth(api_key)
            .json(&CollectRequestBody {
                claims: &claims,
                sign,
            })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Payment gateway rejected collect request: {}", e);
                e
            })?;

        let collect: CollectRequest = response.json().await?;
        info!(
            collect_request_id = %collect.collect_request_id,
            "Collect request created"
        );
        Ok(collect)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, GatewayError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::NotConfigured(name))
}
