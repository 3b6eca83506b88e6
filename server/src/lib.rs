pub mod app;
pub mod bootstrap;
pub mod config;
pub mod key_store;
pub mod server;
pub mod services;

pub use bootstrap::{build_state, init_foundation};
