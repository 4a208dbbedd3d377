//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "BAUDSWEEP";

/// Config file name inside the per-user config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name looked up in the current directory
const LOCAL_CONFIG_FILE_NAME: &str = "baudsweep.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "BAUDSWEEP_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `explicit` (the `--config` flag); it must exist
    /// 2. `BAUDSWEEP_CONFIG` environment variable; it must exist
    /// 3. `./baudsweep.toml` (current directory)
    /// 4. `config.toml` in the per-user config directory
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables override file values, and the result is validated.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match explicit {
            Some(path) => Some(require_exists(path.to_path_buf())?),
            None => resolve_config_path()?,
        };

        let mut config = match config_path {
            Some(ref path) => {
                debug!(path = %path.display(), "loading configuration");
                load_from_file(path)?
            }
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        Self {
            config_path: None,
            config: Config::default(),
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

fn require_exists(path: PathBuf) -> ConfigResult<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(ConfigError::NotFound(path))
    }
}

/// Resolve the configuration file path using standard locations.
///
/// A path named by `BAUDSWEEP_CONFIG` that does not exist is an error; the
/// implicit locations are simply skipped.
pub fn resolve_config_path() -> ConfigResult<Option<PathBuf>> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return require_exists(PathBuf::from(path)).map(Some);
    }

    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    if let Some(user_config) = get_default_config_path() {
        if user_config.exists() {
            return Ok(Some(user_config));
        }
    }

    Ok(None)
}

/// Get the per-user config directory, e.g. `~/.config/baudsweep` on Linux.
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "baudsweep").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the per-user config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_var(key: &str) -> (String, Option<String>) {
    let name = format!("{}_{}", ENV_PREFIX, key);
    let value = std::env::var(&name).ok();
    (name, value)
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `BAUDSWEEP_<SECTION>_<KEY>`
/// - `BAUDSWEEP_SERIAL_PORT=/dev/ttyUSB1`
/// - `BAUDSWEEP_SERIAL_TIMEOUT_MS=250`
/// - `BAUDSWEEP_PROBE_DELAY_MS=100`
/// - `BAUDSWEEP_LOG_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let (_, Some(val)) = env_var("SERIAL_PORT") {
        config.serial.default_port = Some(val);
    }
    if let (name, Some(val)) = env_var("SERIAL_TIMEOUT_MS") {
        config.serial.timeout_ms = val
            .parse()
            .map_err(|_| ConfigError::env_parse(name, "Invalid timeout"))?;
    }
    if let (name, Some(val)) = env_var("PROBE_DELAY_MS") {
        config.probe.command_delay_ms = val
            .parse()
            .map_err(|_| ConfigError::env_parse(name, "Invalid delay"))?;
    }
    if let (_, Some(val)) = env_var("LOG_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}
