//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus PORT/SERVER_HOST/SERVER_PORT)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)

mod settings;

pub use settings::*;
