//! JSON lines output formatting.

use super::Reporter;
use crate::prober::{FailureReason, ProbeKind, ProbeOutcome};
use crate::scheduler::ProbeConfig;
use crate::types::{Port, ProbeTarget, Protocol};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// One serialized probe outcome.
#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    timestamp: DateTime<Utc>,
    host: &'a str,
    port: Port,
    protocol: Protocol,
    probe: ProbeKind,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a FailureReason>,
}

/// Reporter emitting one JSON object per outcome.
///
/// Run headers are not written; stdout carries only records.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write + Send> JsonReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn start(&mut self, target: &ProbeTarget, config: &ProbeConfig) -> io::Result<()> {
        tracing::info!(
            probe_target = %target,
            protocol = %target.protocol,
            timeout = ?config.timeout,
            interval = ?config.interval,
            "probe run started"
        );
        Ok(())
    }

    fn report(
        &mut self,
        kind: ProbeKind,
        target: &ProbeTarget,
        outcome: &ProbeOutcome,
    ) -> io::Result<()> {
        let record = OutcomeRecord {
            timestamp: Utc::now(),
            host: &target.host,
            port: target.port,
            protocol: match kind {
                ProbeKind::Primary => target.protocol,
                ProbeKind::Fallback => Protocol::Icmp,
            },
            probe: kind,
            status: if outcome.is_success() {
                "success"
            } else {
                "failure"
            },
            latency_ms: outcome.latency_ms(),
            reason: outcome.reason(),
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_records() {
        let target = ProbeTarget::new("127.0.0.1", Port::new(53).unwrap(), Protocol::Udp).unwrap();
        let mut reporter = JsonReporter::new(Vec::new());
        reporter
            .report(
                ProbeKind::Primary,
                &target,
                &ProbeOutcome::failure(FailureReason::Timeout),
            )
            .unwrap();
        reporter
            .report(
                ProbeKind::Fallback,
                &target,
                &ProbeOutcome::success(Duration::from_micros(500)),
            )
            .unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["protocol"], "udp");
        assert_eq!(lines[0]["probe"], "primary");
        assert_eq!(lines[0]["status"], "failure");
        assert_eq!(lines[0]["reason"], "timed out");
        assert!(lines[0].get("latency_ms").is_none());

        assert_eq!(lines[1]["protocol"], "icmp");
        assert_eq!(lines[1]["probe"], "fallback");
        assert_eq!(lines[1]["status"], "success");
        assert_eq!(lines[1]["latency_ms"], 0.5);
        assert_eq!(lines[1]["port"], 53);
    }
}
