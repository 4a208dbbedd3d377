//! Command-line arguments.
//!
//! Every line and probe option is optional here so that the configuration
//! file can supply it; flags given on the command line always win.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::port::{default_port_path, DataBits, Parity, StopBits};
use crate::probe::{ProbeCommand, ProbeSettings, MAX_READ_TIMEOUT};
use crate::report::{ConsoleOptions, LogFormat};
use crate::sweep::{parse_baud_list, SweepPlan};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Comma-separated candidate list given with `--bauds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaudList(pub Vec<u32>);

impl FromStr for BaudList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_baud_list(s).map(Self)
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid timeout '{s}' (expected seconds, e.g. 0.5)"))?;
    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("timeout must be a non-negative number of seconds, got {s}"))?;
    if timeout > MAX_READ_TIMEOUT {
        return Err(format!(
            "timeout must be at most {} seconds, got {s}",
            MAX_READ_TIMEOUT.as_secs()
        ));
    }
    Ok(timeout)
}

#[derive(Parser, Debug)]
#[command(
    name = "baudsweep",
    version,
    about = "Find the baud rate of an unknown serial device by probing every candidate rate.",
    long_about = "Opens a serial port once, then for each candidate baud rate sends a few probe \
                  commands and classifies whatever comes back. Rates that answer with printable \
                  ASCII are reported as likely matches."
)]
pub struct Args {
    /// Serial device to probe [default: from config, else a platform placeholder]
    #[arg(short, long, value_name = "PATH")]
    pub port: Option<String>,

    /// Show a raw preview of every response, not only ASCII ones
    #[arg(short, long)]
    pub all: bool,

    /// List available serial ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Data bits: 5, 6, 7 or 8 [default: 8]
    #[arg(short, long, value_name = "BITS")]
    pub data_bits: Option<DataBits>,

    /// Parity: none, even, odd, mark or space [default: none]
    #[arg(long, value_name = "MODE")]
    pub parity: Option<Parity>,

    /// Stop bits: 1, 1.5 or 2 [default: 1]
    #[arg(short, long, value_name = "BITS")]
    pub stop_bits: Option<StopBits>,

    /// Probe command, repeatable; escapes such as \r, \n and \x1B are honored
    #[arg(short = 'c', long = "command", value_name = "STR", action = ArgAction::Append)]
    pub commands: Vec<String>,

    /// Per-probe read timeout in seconds [default: 1.0]
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Write every result to a log file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Only print the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Custom candidate rates, e.g. 9600,19200,115200
    #[arg(long, value_name = "LIST")]
    pub bauds: Option<BaudList>,

    /// Try the most common rates first
    #[arg(long)]
    pub common_first: bool,

    /// Pause after each probe command, in milliseconds [default: 500]
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Layout of the --output log
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Device to open.
    pub fn port_path(&self, config: &Config) -> String {
        self.port
            .clone()
            .or_else(|| config.serial.default_port.clone())
            .unwrap_or_else(|| default_port_path().to_string())
    }

    /// Merge these flags over `config` into a sweep plan.
    pub fn sweep_plan(&self, config: &Config) -> AppResult<SweepPlan> {
        let mut line = config.line_config()?;
        if let Some(bits) = self.data_bits {
            line.data_bits = bits;
        }
        if let Some(parity) = self.parity {
            line.parity = parity;
        }
        if let Some(stop) = self.stop_bits {
            line.stop_bits = stop;
        }
        if let Some(timeout) = self.timeout {
            line.timeout = timeout;
        }

        let mut commands = if self.commands.is_empty() {
            config.probe_command()?
        } else {
            ProbeCommand::from_escaped(&self.commands)
                .map_err(AppError::InvalidArgument)?
                .with_delay(config.probe.command_delay())
        };
        if let Some(ms) = self.delay_ms {
            commands = commands.with_delay(Duration::from_millis(ms));
        }

        let mut ordering = config.clone();
        if let Some(BaudList(rates)) = &self.bauds {
            ordering.probe.baud_rates = rates.clone();
        }
        ordering.probe.common_first |= self.common_first;
        let candidates = ordering.candidates();

        let mut settings = ProbeSettings::new(line, commands);
        settings.max_read_bytes = config.probe.max_read_bytes;

        Ok(SweepPlan {
            candidates,
            settings,
        })
    }

    pub fn console_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            quiet: self.quiet,
            show_all: self.all,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn log_directive(&self, configured: &str) -> String {
        match self.verbose {
            0 => configured.to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::DEFAULT_BAUD_RATES;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("baudsweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_match_config() {
        let args = parse(&[]);
        let plan = args.sweep_plan(&Config::default()).unwrap();

        assert_eq!(plan.candidates, DEFAULT_BAUD_RATES.to_vec());
        assert_eq!(plan.settings.line.framing(), "8N1");
        assert_eq!(plan.settings.timeout(), Duration::from_secs(1));
        assert_eq!(plan.settings.commands, ProbeCommand::default());
        assert!(!plan.settings.reapply_line_config);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_line_flags_override_config() {
        let args = parse(&["-d", "7", "--parity", "even", "-s", "2", "-t", "0.25"]);
        let plan = args.sweep_plan(&Config::default()).unwrap();

        assert_eq!(plan.settings.line.framing(), "7E2");
        assert_eq!(plan.settings.timeout(), Duration::from_millis(250));
        assert!(plan.settings.reapply_line_config);
    }

    #[test]
    fn test_commands_are_unescaped_and_repeatable() {
        let args = parse(&["-c", "AT\\r", "--command", "ATI\\r\\n", "--delay-ms", "10"]);
        let plan = args.sweep_plan(&Config::default()).unwrap();

        assert_eq!(
            plan.settings.commands.payloads,
            vec![b"AT\r".to_vec(), b"ATI\r\n".to_vec()]
        );
        assert_eq!(plan.settings.commands.delay, Duration::from_millis(10));
    }

    #[test]
    fn test_bad_escape_is_invalid_argument() {
        let args = parse(&["-c", "\\xZZ"]);
        let err = args.sweep_plan(&Config::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_custom_bauds_and_common_first() {
        let args = parse(&["--bauds", "300,115200,9600", "--common-first"]);
        let plan = args.sweep_plan(&Config::default()).unwrap();
        assert_eq!(plan.candidates, vec![9600, 115200, 300]);
    }

    #[test]
    fn test_config_common_first_applies_to_cli_bauds() {
        let mut config = Config::default();
        config.probe.common_first = true;

        let plan = parse(&["--bauds", "300,115200"]).sweep_plan(&config).unwrap();
        assert_eq!(plan.candidates, vec![115200, 300]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ["baudsweep"];
        for bad in [
            &["-d", "9"][..],
            &["--parity", "sideways"][..],
            &["-s", "3"][..],
            &["-t", "-1"][..],
            &["-t", "soon"][..],
            &["-t", "1.8e19"][..],
            &["-t", "3601"][..],
            &["--bauds", "0"][..],
            &["--bauds", "9600,9600"][..],
            &["--log-format", "xml"][..],
        ] {
            let argv = base.iter().chain(bad.iter()).copied();
            assert!(Args::try_parse_from(argv).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_timeout_upper_bound() {
        let args = parse(&["-t", "3600"]);
        assert_eq!(args.timeout, Some(MAX_READ_TIMEOUT));
    }

    #[test]
    fn test_port_resolution() {
        let mut config = Config::default();
        assert_eq!(parse(&[]).port_path(&config), default_port_path());

        config.serial.default_port = Some("/dev/ttyACM0".to_string());
        assert_eq!(parse(&[]).port_path(&config), "/dev/ttyACM0");
        assert_eq!(parse(&["-p", "COM4"]).port_path(&config), "COM4");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&[]).log_directive("warn"), "warn");
        assert_eq!(parse(&["-v"]).log_directive("warn"), "debug");
        assert_eq!(parse(&["-vv"]).log_directive("warn"), "trace");
    }

    #[test]
    fn test_console_options() {
        let opts = parse(&["-a", "-q"]).console_options();
        assert!(opts.quiet);
        assert!(opts.show_all);
    }

    #[test]
    fn test_list_ports_flag() {
        assert!(parse(&["--list-ports"]).list_ports);
    }
}
