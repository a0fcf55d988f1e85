//! Prober module - the per-protocol reachability checks.
//!
//! Every strategy turns one attempt into a [`ProbeOutcome`]. Network errors
//! never escape a probe; they are classified into a [`FailureReason`] so the
//! scheduler can report them and carry on.

pub mod icmp;
pub mod tcp;
pub mod traits;
pub mod udp;

use serde::{Serialize, Serializer};
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::time::Instant;

pub use icmp::IcmpProber;
pub use tcp::TcpProber;
pub use traits::{create_prober, BoxedProber, Prober};
pub use udp::UdpProber;

/// Why a probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The deadline expired before the target answered.
    Timeout,
    /// The target actively refused the connection.
    ConnectionRefused,
    /// No ICMP echo reply arrived.
    NoResponse,
    /// Anything else, carrying the underlying error text.
    Other(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::ConnectionRefused => write!(f, "connection refused"),
            Self::NoResponse => write!(f, "no response"),
            Self::Other(message) => write!(f, "{}", message),
        }
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of a single probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The target answered after `latency`.
    Success { latency: Duration },
    /// The target did not answer.
    Failure { reason: FailureReason },
}

impl ProbeOutcome {
    /// Build a success outcome.
    pub fn success(latency: Duration) -> Self {
        Self::Success { latency }
    }

    /// Build a failure outcome.
    pub fn failure(reason: FailureReason) -> Self {
        Self::Failure { reason }
    }

    /// Check if the probe succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Latency in milliseconds with sub-millisecond precision.
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Self::Success { latency } => Some(latency.as_nanos() as f64 / 1_000_000.0),
            Self::Failure { .. } => None,
        }
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

/// Which probe of a tick produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// The configured TCP or UDP probe.
    Primary,
    /// The supplementary ICMP probe after a primary failure.
    Fallback,
}

/// Stand-in deadline for timeouts too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// The instant `timeout` from now. Saturates instead of overflowing, so any
/// timeout accepted at startup yields a usable deadline.
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Classify a socket error from a connect or receive call.
pub fn classify_io_error(error: &io::Error) -> FailureReason {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => FailureReason::ConnectionRefused,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FailureReason::Timeout,
        _ => {
            // Some platforms only say "refused" in the message
            if error.to_string().to_lowercase().contains("refused") {
                FailureReason::ConnectionRefused
            } else {
                FailureReason::Other(error.to_string())
            }
        }
    }
}
