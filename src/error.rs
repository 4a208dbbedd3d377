use crate::config::ConfigError;
use crate::port::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop the program before or around a sweep.
///
/// Faults during a sweep are not represented here; they are recorded per
/// baud rate in the summary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot open serial port {path}: {source}")]
    PortOpen {
        path: String,
        #[source]
        source: PortError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot create log file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list serial ports: {0}")]
    ListPorts(#[source] PortError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("sweep task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_open_names_path_and_cause() {
        let err = AppError::PortOpen {
            path: "/dev/ttyUSB9".to_string(),
            source: PortError::not_found("/dev/ttyUSB9"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/dev/ttyUSB9"));
        assert!(msg.contains("not found"), "{msg}");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: AppError = ConfigError::validation("probe.baud_rates", "empty").into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'probe.baud_rates': empty"
        );
    }
}
