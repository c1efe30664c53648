pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
