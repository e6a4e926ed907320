pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod reporting;
pub mod requests;
pub mod routes;
pub mod services;
pub mod utils;
