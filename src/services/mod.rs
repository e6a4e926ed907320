pub mod auth;
pub mod gateway;
pub mod payment_store;
