pub mod payment;
pub mod register;
pub mod transaction;
pub mod webhook;
