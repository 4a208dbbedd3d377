//! Terminal output: progress bar, per-rate lines, final summary, port list.

use crate::port::PortListing;
use crate::probe::{display_text, ProbeOutcome};
use crate::sweep::{Reporter, SweepSummary};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

/// Bytes shown per response in `--all` mode.
pub const RAW_PREVIEW_BYTES: usize = 20;

/// Characters of ASCII text shown per hit in the summary.
const SUMMARY_PREVIEW_BYTES: usize = 60;

/// What the console prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Print only the final summary.
    pub quiet: bool,
    /// Print a raw preview of every response instead of ASCII hits only.
    pub show_all: bool,
}

/// Progress bar plus inline hit lines, then a summary on stdout.
pub struct ConsoleReporter {
    options: ConsoleOptions,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(options: ConsoleOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    fn emit(&self, line: String) {
        match &self.progress {
            // Printing through the bar keeps it pinned below the output.
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

/// Inline line for one outcome, if it gets one.
pub fn outcome_line(outcome: &ProbeOutcome, show_all: bool) -> Option<String> {
    match outcome {
        ProbeOutcome::Response(r) if show_all => Some(format!(
            "Baudrate {} raw output: {}",
            r.baud,
            display_text(&r.raw, RAW_PREVIEW_BYTES)
        )),
        ProbeOutcome::Response(r) if r.is_ascii() => Some(format!(
            "Baudrate {} returned ASCII data: {}",
            style(r.baud).green().bold(),
            r.text.trim().replace('\r', "")
        )),
        _ => None,
    }
}

impl Reporter for ConsoleReporter {
    fn on_start(&mut self, port: &str, total: usize) {
        if self.options.quiet {
            return;
        }

        println!("Starting baudrate brute-force test on {}...", style(port).cyan());

        let pb = ProgressBar::new(total as u64);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            pb.set_style(bar_style.progress_chars("=>-"));
        }
        pb.set_message("Testing baudrates");
        self.progress = Some(pb);
    }

    fn on_probe(&mut self, _index: usize, _total: usize, outcome: &ProbeOutcome) {
        if self.options.quiet {
            return;
        }

        if let Some(line) = outcome_line(outcome, self.options.show_all) {
            self.emit(line);
        }
        if let Some(pb) = &self.progress {
            pb.set_message(format!("{} baud", outcome.baud()));
            pb.inc(1);
        }
    }

    fn on_finish(&mut self, summary: &SweepSummary) {
        if let Some(pb) = self.progress.take() {
            pb.finish_with_message("done");
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = write_summary(&mut out, summary) {
            tracing::warn!(error = %e, "failed to print summary");
        }
    }
}

/// Render the end-of-run summary.
pub fn write_summary<W: Write>(out: &mut W, summary: &SweepSummary) -> io::Result<()> {
    writeln!(out)?;
    if summary.interrupted {
        writeln!(
            out,
            "{}",
            style(format!(
                "Test interrupted after {} baudrate(s).",
                summary.tested
            ))
            .yellow()
            .bold()
        )?;
    } else {
        writeln!(out, "{}", style("Test completed.").bold())?;
    }

    writeln!(
        out,
        "  {} {} ({})",
        style("Port:").bold(),
        summary.port,
        summary.framing
    )?;
    writeln!(
        out,
        "  {} tested {}, responses {}, errors {}, silent {}",
        style("Counts:").bold(),
        summary.tested,
        summary.valid(),
        summary.errors.len(),
        summary.silent
    )?;

    if summary.ascii.is_empty() {
        writeln!(out, "No baudrates returned ASCII data.")?;
    } else {
        writeln!(out, "ASCII responses (longest first):")?;
        for r in &summary.ascii {
            writeln!(
                out,
                "  {:>8}  {} bytes  \"{}\"",
                r.baud,
                r.len(),
                display_text(&r.raw, SUMMARY_PREVIEW_BYTES)
            )?;
        }
    }

    if summary.non_ascii.is_empty() {
        writeln!(out, "No baudrates with non-ASCII output detected.")?;
    } else {
        writeln!(
            out,
            "Baudrates with non-ASCII output: {:?}",
            summary.non_ascii_bauds()
        )?;
    }

    if !summary.errors.is_empty() {
        writeln!(out, "Errors:")?;
        for f in &summary.errors {
            writeln!(out, "  {:>8}  {}", f.baud, style(&f.message).red())?;
        }
    }

    Ok(())
}

/// Render the `--list-ports` table.
pub fn write_port_list<W: Write>(out: &mut W, ports: &[PortListing]) -> io::Result<()> {
    if ports.is_empty() {
        writeln!(out, "No serial ports detected on this system")?;
        return Ok(());
    }

    writeln!(out, "Found {} serial port(s):", ports.len())?;
    for port in ports {
        write!(out, "  {}  [{}]", style(&port.name).cyan(), port.kind)?;
        if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
            write!(out, "  {:04X}:{:04X}", vid, pid)?;
        }
        let label: Vec<&str> = [port.manufacturer.as_deref(), port.product.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !label.is_empty() {
            write!(out, "  {}", label.join(" "))?;
        }
        if let Some(serial) = &port.serial_number {
            write!(out, "  S/N {}", serial)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
