//! # reachping - Continuous TCP/UDP Reachability Probe
//!
//! reachping repeatedly connects to a host over TCP or UDP, measures the round
//! trip, and reports every attempt until the operator stops it. When a probe
//! fails, an ICMP echo tells whether the host itself is still up.
//!
//! ## Features
//!
//! - **TCP Connect and UDP Probes**: one attempt per tick, no hidden retries
//! - **ICMP Fallback**: supplementary host check after each failure
//! - **Interruptible**: Ctrl+C pauses immediately, even mid-probe
//! - **Output Formats**: colored plain text or JSON lines
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use reachping::prober::{Prober, TcpProber};
//! use reachping::types::{Port, ProbeTarget, Protocol};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target = ProbeTarget::new("127.0.0.1", Port::new(22).unwrap(), Protocol::Tcp).unwrap();
//!     let outcome = TcpProber::new().probe(&target, Duration::from_secs(2)).await;
//!
//!     println!("{:?}", outcome);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports and probe targets
//! - [`prober`] - Probe strategies and the `Prober` trait
//! - [`scheduler`] - The pause/restart/stop state machine driving the probes
//! - [`output`] - Reporters for probe outcomes
//! - [`config`] - Settings file with command-line defaults
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod prober;
pub mod scheduler;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError};
pub use prober::{FailureReason, ProbeOutcome, Prober};
pub use scheduler::{ProbeConfig, Scheduler, Session};
pub use types::{Port, ProbeTarget, Protocol};
