pub mod app;
pub mod auth;
pub mod config;
pub mod service;
pub mod streaming;
pub mod telemetry;
