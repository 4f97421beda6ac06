pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
