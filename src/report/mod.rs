//! Reporter implementations: the terminal and the result log.

pub mod console;
pub mod logfile;

pub use console::{outcome_line, write_port_list, write_summary, ConsoleOptions, ConsoleReporter};
pub use logfile::{LogFileReporter, LogFormat};
