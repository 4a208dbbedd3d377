use baudsweep::cli::Args;
use baudsweep::config::{Config, ConfigLoader, LoggingConfig, TracingFormat};
use baudsweep::error::{AppError, AppResult};
use baudsweep::port::list_ports;
use baudsweep::report::{write_port_list, ConsoleReporter, LogFileReporter};
use baudsweep::sweep::{CancelFlag, Fanout, Sweeper};
use clap::Parser;
use console::style;
use std::io;
use std::process::ExitCode;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;

enum RunStatus {
    Completed,
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = ConfigLoader::load(args.config.as_deref());
    let logging = loaded
        .as_ref()
        .map(|l| l.config().logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_tracing(&args.log_directive(&logging.level), logging.format);

    let result = match loaded {
        Ok(loader) => {
            if let Some(path) = &loader.config_path {
                debug!(path = %path.display(), "using configuration file");
            }
            run(args, loader.into_config()).await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(directive: &str, format: TracingFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match format {
        TracingFormat::Pretty => builder.pretty().init(),
        TracingFormat::Compact => builder.compact().init(),
    }
}

async fn run(args: Args, config: Config) -> AppResult<RunStatus> {
    if args.list_ports {
        let ports = list_ports().map_err(AppError::ListPorts)?;
        let stdout = io::stdout();
        write_port_list(&mut stdout.lock(), &ports)?;
        return Ok(RunStatus::Completed);
    }

    let plan = args.sweep_plan(&config)?;
    let port_path = args.port_path(&config);

    let mut reporter =
        Fanout::new().with(Box::new(ConsoleReporter::new(args.console_options())));
    // Created before the port is touched so a bad path fails fast.
    if let Some(path) = &args.output {
        let log = LogFileReporter::create(path, args.log_format).map_err(|source| {
            AppError::Output {
                path: path.clone(),
                source,
            }
        })?;
        reporter = reporter.with(Box::new(log));
    }

    let cancel = CancelFlag::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let sweeper = Sweeper::new(plan);
    let sweep = tokio::task::spawn_blocking(move || {
        sweeper
            .open_and_run(&port_path, &mut reporter, &cancel)
            .map_err(|source| AppError::PortOpen {
                path: port_path,
                source,
            })
    });
    let outcome = sweep.await.map_err(|e| AppError::Task(e.to_string()));
    interrupt.abort();

    let summary = outcome??;
    if summary.interrupted {
        Ok(RunStatus::Interrupted)
    } else {
        Ok(RunStatus::Completed)
    }
}

/// Turn Ctrl+C into a cancellation request; the sweep stops after the
/// current baud rate and still releases the port.
fn spawn_interrupt_handler(cancel: CancelFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupt received, stopping after the current baud rate");
                cancel.cancel();
            }
            Err(e) => warn!(error = %e, "failed to install Ctrl+C handler"),
        }
    })
}
