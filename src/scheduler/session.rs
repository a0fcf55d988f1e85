//! Run parameters and the session that owns them.

use crate::error::{ConfigError, ConfigResult};
use crate::prober::{FailureReason, Prober};
use crate::scheduler::InterruptSignal;
use crate::types::ProbeTarget;
use std::time::Duration;

/// Timing parameters for a run, validated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// How long a single probe may wait. Always greater than zero.
    pub timeout: Duration,
    /// Pause between ticks. Zero means back-to-back ticks.
    pub interval: Duration,
    /// Run the ICMP probe after a primary failure.
    pub icmp_fallback: bool,
}

impl ProbeConfig {
    /// Default probe timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
    /// Default pause between ticks.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Create a configuration, rejecting a zero timeout.
    pub fn new(timeout: Duration, interval: Duration) -> ConfigResult<Self> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            timeout,
            interval,
            icmp_fallback: true,
        })
    }

    /// Enable or disable the ICMP fallback probe.
    pub fn with_icmp_fallback(mut self, enabled: bool) -> Self {
        self.icmp_fallback = enabled;
        self
    }

    /// Decide once, before the first tick, whether the fallback can run.
    ///
    /// `check` runs only when the fallback is enabled and `fallback` needs
    /// privileges. If it fails the fallback is switched off for the whole run
    /// and the warning to show the operator is returned.
    pub fn resolve_icmp<F>(&mut self, fallback: &dyn Prober, check: F) -> Option<String>
    where
        F: FnOnce() -> Result<(), FailureReason>,
    {
        if !self.icmp_fallback || !fallback.requires_privileges() {
            return None;
        }
        match check() {
            Ok(()) => None,
            Err(reason) => {
                self.icmp_fallback = false;
                tracing::debug!(%reason, "icmp fallback unavailable");
                Some(format!("ICMP fallback disabled: {}", reason))
            }
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            interval: Self::DEFAULT_INTERVAL,
            icmp_fallback: true,
        }
    }
}

/// Everything one continuous run needs: what to probe, how, and the signal
/// that pauses it.
#[derive(Debug)]
pub struct Session {
    pub(crate) target: ProbeTarget,
    pub(crate) config: ProbeConfig,
    pub(crate) interrupts: InterruptSignal,
}

impl Session {
    /// Create a new session.
    pub fn new(target: ProbeTarget, config: ProbeConfig, interrupts: InterruptSignal) -> Self {
        Self {
            target,
            config,
            interrupts,
        }
    }

    /// The probed target.
    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    /// The run configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }
}
