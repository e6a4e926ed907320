pub mod auth;
pub mod order;
pub mod order_status;
pub mod user;
pub mod webhook_log;
