//! Output formatting module.
//!
//! A [`Reporter`] receives the header of each run and every probe outcome.
//! Plain text goes to a terminal, JSON lines to anything that parses them.

mod json_format;
mod plain;

pub use json_format::JsonReporter;
pub use plain::{print_error, print_info, print_warning, PlainReporter};

use crate::prober::{ProbeKind, ProbeOutcome};
use crate::scheduler::ProbeConfig;
use crate::types::ProbeTarget;
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored text
    #[default]
    Plain,
    /// One JSON object per line
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Consumer of probe results.
pub trait Reporter: Send {
    /// Called whenever a run starts, including restarts from the pause menu.
    fn start(&mut self, target: &ProbeTarget, config: &ProbeConfig) -> io::Result<()>;

    /// Called once per outcome, primary first, then the fallback if it ran.
    fn report(
        &mut self,
        kind: ProbeKind,
        target: &ProbeTarget,
        outcome: &ProbeOutcome,
    ) -> io::Result<()>;
}

/// Create a reporter writing to stdout in the given format.
pub fn create_reporter(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Plain => Box::new(PlainReporter::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonReporter::new(io::stdout())),
    }
}

/// Describe an outcome as a single unstyled line.
pub fn describe(kind: ProbeKind, target: &ProbeTarget, outcome: &ProbeOutcome) -> String {
    match (kind, outcome) {
        (ProbeKind::Primary, ProbeOutcome::Success { .. }) => format!(
            "Success! {} ({}) response time: {:.2} ms",
            target,
            target.protocol,
            outcome.latency_ms().unwrap_or_default()
        ),
        (ProbeKind::Primary, ProbeOutcome::Failure { reason }) => {
            format!("{} is offline ({})", target, reason)
        }
        (ProbeKind::Fallback, ProbeOutcome::Success { .. }) => format!(
            "ICMP: {} is reachable, response time: {:.2} ms",
            target.host,
            outcome.latency_ms().unwrap_or_default()
        ),
        (ProbeKind::Fallback, ProbeOutcome::Failure { reason }) => {
            format!("ICMP: {} is not reachable ({})", target.host, reason)
        }
    }
}

/// Format a duration in seconds without trailing zeros.
pub(crate) fn format_secs(duration: Duration) -> String {
    format!("{}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::FailureReason;
    use crate::types::{Port, Protocol};

    fn target() -> ProbeTarget {
        ProbeTarget::new("127.0.0.1", Port::new(8080).unwrap(), Protocol::Tcp).unwrap()
    }

    #[test]
    fn test_describe_primary() {
        let ok = ProbeOutcome::success(Duration::from_micros(1_234));
        assert_eq!(
            describe(ProbeKind::Primary, &target(), &ok),
            "Success! 127.0.0.1:8080 (TCP) response time: 1.23 ms"
        );

        let refused = ProbeOutcome::failure(FailureReason::ConnectionRefused);
        assert_eq!(
            describe(ProbeKind::Primary, &target(), &refused),
            "127.0.0.1:8080 is offline (connection refused)"
        );
    }

    #[test]
    fn test_describe_fallback() {
        let ok = ProbeOutcome::success(Duration::from_micros(50));
        assert_eq!(
            describe(ProbeKind::Fallback, &target(), &ok),
            "ICMP: 127.0.0.1 is reachable, response time: 0.05 ms"
        );

        let silent = ProbeOutcome::failure(FailureReason::NoResponse);
        assert_eq!(
            describe(ProbeKind::Fallback, &target(), &silent),
            "ICMP: 127.0.0.1 is not reachable (no response)"
        );
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(Duration::from_secs(2)), "2");
        assert_eq!(format_secs(Duration::from_millis(1500)), "1.5");
        assert_eq!(format_secs(Duration::ZERO), "0");
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Plain.to_string(), "plain");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
