//! Command-line interface definitions for reachping.
//!
//! Uses `clap` derive macros for declarative argument parsing. Options left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output::OutputFormat;
use crate::scheduler::ProbeConfig;
use crate::types::{Port, ProbeTarget, Protocol};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Continuously probe a host over TCP or UDP, with an ICMP fallback.
#[derive(Parser, Debug)]
#[command(name = "reachping")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TCP/UDP reachability and latency probe", long_about = None)]
pub struct Args {
    /// Target hostname or IP address
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Target port (1-65535)
    #[arg(value_name = "PORT")]
    pub port: Port,

    /// Protocol to use [default: tcp]
    #[arg(short, long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Timeout in seconds, greater than zero [default: 2]
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Pause between probes in seconds; 0 probes back-to-back [default: 1]
    #[arg(short, long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Do not send an ICMP echo after a failed probe
    #[arg(long)]
    pub no_icmp: bool,

    /// Output format for results [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "REACHPING_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Validated inputs for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub target: ProbeTarget,
    pub config: ProbeConfig,
    pub output: OutputFormat,
}

impl Args {
    /// Merge with `settings` and validate.
    pub fn into_plan(self, settings: &AppSettings) -> CliResult<RunPlan> {
        let protocol = self.protocol.unwrap_or(settings.default_protocol);
        let target = ProbeTarget::new(self.host, self.port, protocol)?;

        let timeout = self.timeout.unwrap_or(settings.default_timeout_secs);
        let interval = self.interval.unwrap_or(settings.default_interval_secs);
        let config = ProbeConfig::new(Duration::from_secs(timeout), Duration::from_secs(interval))?
            .with_icmp_fallback(settings.icmp_fallback && !self.no_icmp);

        Ok(RunPlan {
            target,
            config,
            output: self.output.unwrap_or(settings.default_output_format),
        })
    }
}
