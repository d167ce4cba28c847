//! Configuration module for money-manager
//!
//! This module provides configuration management including:
//! - platform path resolution with an environment override
//! - the JSON preference store (`config.json`)

pub mod paths;
pub mod settings;

pub use paths::MoneyPaths;
pub use settings::Settings;
