//! Configuration management: defaults, loading from DB + environment.

pub mod app_config;
pub mod defaults;

pub use app_config::AppConfig;
