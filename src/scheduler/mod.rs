//! Scheduler module - the continuous probing loop.
//!
//! The loop is an explicit state machine:
//!
//! - **Running**: one tick per iteration (primary probe, optional ICMP
//!   fallback, report, sleep `interval`)
//! - **PausedForInput**: entered on interrupt; the operator types `menu` to
//!   restart or anything else to stop
//! - **Stopped**: terminal
//!
//! Both suspension points of a tick (the probe and the sleep) are raced
//! against the session's interrupt signal, so an interrupt never waits for a
//! network timeout to expire.

mod interrupt;
mod prompt;
mod session;

pub use interrupt::{InterruptHandle, InterruptSignal};
pub use prompt::{Prompt, StdinPrompt};
pub use session::{ProbeConfig, Session};

use crate::output::Reporter;
use crate::prober::{BoxedProber, ProbeKind, ProbeOutcome};
use crate::types::ProbeTarget;

/// Question shown when the loop pauses.
pub const PAUSE_PROMPT: &str = "Paused. Type 'menu' to restart or press Enter to stop: ";

/// State of the probing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    PausedForInput,
    Stopped,
}

/// Operator decision while paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Restart the loop with the same session.
    Menu,
    /// Leave the loop.
    Stop,
}

impl Choice {
    /// Only an exact `menu` (any case, surrounding whitespace ignored)
    /// restarts; everything else stops.
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("menu") {
            Self::Menu
        } else {
            Self::Stop
        }
    }
}

/// Outcomes of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub primary: ProbeOutcome,
    pub fallback: Option<ProbeOutcome>,
}

/// Drives a primary prober (and optionally the ICMP fallback) until stopped.
pub struct Scheduler {
    primary: BoxedProber,
    fallback: Option<BoxedProber>,
    reporter: Box<dyn Reporter>,
}

impl Scheduler {
    /// Create a scheduler without a fallback prober.
    pub fn new(primary: BoxedProber, reporter: Box<dyn Reporter>) -> Self {
        Self {
            primary,
            fallback: None,
            reporter,
        }
    }

    /// Set the prober used after a primary failure.
    pub fn with_fallback(mut self, fallback: BoxedProber) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Run one tick's probes and report them. Does not sleep.
    pub async fn tick(&mut self, target: &ProbeTarget, config: &ProbeConfig) -> TickReport {
        let primary = self.primary.probe(target, config.timeout).await;
        emit(self.reporter.as_mut(), ProbeKind::Primary, target, &primary);

        let fallback = match &self.fallback {
            Some(prober) if config.icmp_fallback && !primary.is_success() => {
                let outcome = prober.probe(target, config.timeout).await;
                emit(self.reporter.as_mut(), ProbeKind::Fallback, target, &outcome);
                Some(outcome)
            }
            _ => None,
        };

        TickReport { primary, fallback }
    }

    /// Run the loop until the operator stops it.
    pub async fn run<P>(&mut self, mut session: Session, prompt: &mut P)
    where
        P: Prompt + ?Sized,
    {
        let mut state = SchedulerState::Running;
        let mut fresh = true;
        let mut seq: u64 = 0;

        loop {
            state = match state {
                SchedulerState::Running => {
                    if fresh {
                        fresh = false;
                        seq = 0;
                        if let Err(e) = self.reporter.start(&session.target, &session.config) {
                            tracing::warn!(error = %e, "failed to write run header");
                        }
                    }
                    seq += 1;
                    self.run_tick(&mut session, seq).await
                }
                SchedulerState::PausedForInput => match await_choice(&mut session, prompt).await {
                    Choice::Menu => {
                        tracing::debug!("restarting from menu");
                        session.interrupts.clear();
                        fresh = true;
                        SchedulerState::Running
                    }
                    Choice::Stop => SchedulerState::Stopped,
                },
                SchedulerState::Stopped => break,
            };
            tracing::trace!(?state, "scheduler transition");
        }
    }

    /// One tick plus the sleep after it, either of which an interrupt cuts short.
    async fn run_tick(&mut self, session: &mut Session, seq: u64) -> SchedulerState {
        let Session {
            target,
            config,
            interrupts,
        } = session;

        tokio::select! {
            biased;
            _ = interrupts.wait() => {
                tracing::debug!(seq, "interrupted during probe");
                return SchedulerState::PausedForInput;
            }
            report = self.tick(target, config) => {
                tracing::debug!(
                    seq,
                    primary = ?report.primary,
                    fallback = ?report.fallback,
                    "tick complete"
                );
            }
        }

        if config.interval.is_zero() {
            // Back-to-back ticks; still let the interrupt watcher run
            tokio::task::yield_now().await;
            return SchedulerState::Running;
        }

        tokio::select! {
            biased;
            _ = interrupts.wait() => SchedulerState::PausedForInput,
            _ = tokio::time::sleep(config.interval) => SchedulerState::Running,
        }
    }
}

/// Hand an outcome to the reporter. Write failures are logged, never fatal.
fn emit(
    reporter: &mut dyn Reporter,
    kind: ProbeKind,
    target: &ProbeTarget,
    outcome: &ProbeOutcome,
) {
    if let Err(e) = reporter.report(kind, target, outcome) {
        tracing::warn!(error = %e, "failed to write probe result");
    }
}

/// Ask the operator what to do. A second interrupt, end of input or a read
/// error all stop.
async fn await_choice<P>(session: &mut Session, prompt: &mut P) -> Choice
where
    P: Prompt + ?Sized,
{
    tokio::select! {
        biased;
        _ = session.interrupts.wait() => Choice::Stop,
        answer = prompt.ask(PAUSE_PROMPT) => match answer {
            Ok(Some(line)) => Choice::parse(&line),
            Ok(None) => Choice::Stop,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer");
                Choice::Stop
            }
        },
    }
}
