use rust_decimal::Decimal;
use serde::Deserialize;

/// Gateway callback body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub status: i64,
    pub order_info: OrderInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    /// The collect request id we stored as `bank_reference`.
    pub order_id: String,
    pub order_amount: Decimal,
    pub transaction_amount: Decimal,
    pub status: String,
    pub payment_mode: String,
}

impl WebhookPayload {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, String> {
        let payload = Self::deserialize(value).map_err(|e| format!("Invalid webhook payload: {}", e))?;
        if payload.order_info.order_id.trim().is_empty() {
            return Err("Invalid webhook payload: order_info.order_id is empty".to_string());
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_gateway_callback() {
        let payload = WebhookPayload::from_value(&json!({
            "status": 200,
            "order_info": {
                "order_id": "6808bc4888e4e3c149e757f1",
                "order_amount": 2000,
                "transaction_amount": 2200.5,
                "gateway": "PhonePe",
                "bank_reference": "YESBNK222",
                "status": "success",
                "payment_mode": "upi"
            }
        }))
        .unwrap();

        assert_eq!(payload.status, 200);
        assert_eq!(payload.order_info.order_id, "6808bc4888e4e3c149e757f1");
        assert_eq!(payload.order_info.order_amount, Decimal::from(2000));
        assert_eq!(payload.order_info.transaction_amount, Decimal::new(22005, 1));
        assert_eq!(payload.order_info.payment_mode, "upi");
    }

    #[test]
    fn rejects_missing_or_empty_order_id() {
        let missing = WebhookPayload::from_value(&json!({
            "status": 200,
            "order_info": { "order_amount": 1, "transaction_amount": 1, "status": "x", "payment_mode": "y" }
        }));
        assert!(missing.is_err());

        let empty = WebhookPayload::from_value(&json!({
            "status": 200,
            "order_info": { "order_id": " ", "order_amount": 1, "transaction_amount": 1, "status": "x", "payment_mode": "y" }
        }));
        assert!(empty.unwrap_err().contains("order_id"));
    }
}
