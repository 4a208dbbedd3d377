//! Configuration module for baudsweep.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//! Command-line flags are applied on top by the caller.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `--config <path>`
//! 2. `BAUDSWEEP_CONFIG` environment variable (explicit path)
//! 3. `./baudsweep.toml` (current directory)
//! 4. `config.toml` in the per-user config directory
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `BAUDSWEEP_SERIAL_PORT`
//! - `BAUDSWEEP_SERIAL_TIMEOUT_MS`
//! - `BAUDSWEEP_PROBE_DELAY_MS`
//! - `BAUDSWEEP_LOG_LEVEL`
//!
//! # Example
//!
//! ```rust,no_run
//! use baudsweep::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load(None)?;
//! let config = loader.config();
//! println!("Candidates: {}", config.candidates().len());
//! # Ok::<(), baudsweep::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LoggingConfig, ProbeConfig, SerialConfig, TracingFormat};
