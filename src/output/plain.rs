//! Plain text output formatting.
//!
//! Produces human-readable output with colors.

use super::{describe, format_secs, Reporter};
use crate::prober::{ProbeKind, ProbeOutcome};
use crate::scheduler::ProbeConfig;
use crate::types::ProbeTarget;
use console::style;
use std::io::{self, Write};

/// Reporter printing one colored line per outcome.
pub struct PlainReporter<W> {
    out: W,
}

impl<W: Write + Send> PlainReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for PlainReporter<W> {
    fn start(&mut self, target: &ProbeTarget, config: &ProbeConfig) -> io::Result<()> {
        writeln!(
            self.out,
            "Pinging {}:{} using {} with a timeout of {} seconds...",
            style(&target.host).cyan(),
            style(target.port).yellow(),
            style(target.protocol).green(),
            style(format_secs(config.timeout)).magenta()
        )?;
        writeln!(
            self.out,
            "{}",
            style(format!(
                "Probing every {}s. Press Ctrl+C to pause.",
                format_secs(config.interval)
            ))
            .dim()
        )?;
        self.out.flush()
    }

    fn report(
        &mut self,
        kind: ProbeKind,
        target: &ProbeTarget,
        outcome: &ProbeOutcome,
    ) -> io::Result<()> {
        let line = describe(kind, target, outcome);
        let styled = match (kind, outcome.is_success()) {
            (ProbeKind::Primary, true) => style(line).green(),
            (ProbeKind::Primary, false) => style(line).red(),
            (ProbeKind::Fallback, true) => style(line).yellow(),
            (ProbeKind::Fallback, false) => style(line).red().dim(),
        };
        writeln!(self.out, "{}", styled)?;
        self.out.flush()
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}
