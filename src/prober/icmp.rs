//! ICMP echo probe.
//!
//! Used as a supplementary check after a TCP or UDP failure, to tell the
//! operator whether the host itself is up.
//!
//! # Privileges
//!
//! ICMP sockets usually need root or `CAP_NET_RAW`. Linux also allows
//! unprivileged datagram ICMP sockets for groups listed in
//! `net.ipv4.ping_group_range`.

use crate::prober::traits::Prober;
use crate::prober::{deadline_after, FailureReason, ProbeOutcome};
use crate::types::{HostResolver, ProbeTarget, Protocol};
use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};
use tokio::time::{timeout_at, Instant};

/// Echo request payload.
const ICMP_PAYLOAD: [u8; 8] = [0; 8];

/// ICMP echo prober.
///
/// **Usually requires elevated privileges (root/sudo).**
#[derive(Debug, Default)]
pub struct IcmpProber {
    resolver: HostResolver,
}

impl IcmpProber {
    /// Create a new ICMP prober.
    pub fn new() -> Self {
        Self {
            resolver: HostResolver::new(),
        }
    }

    /// Check once whether an ICMP socket can be opened at all.
    pub fn check_available() -> Result<(), FailureReason> {
        Client::new(&Config::default())
            .map(drop)
            .map_err(|e| socket_error_reason(&e))
    }

    /// Send one echo request and wait for the reply until `deadline`.
    async fn echo(&self, ip: IpAddr, timeout: Duration, deadline: Instant) -> ProbeOutcome {
        let config = match ip {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };

        let client = match Client::new(&config) {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::failure(socket_error_reason(&e)),
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match timeout_at(deadline, pinger.ping(PingSequence(0), &ICMP_PAYLOAD)).await {
            Ok(Ok((_, rtt))) => ProbeOutcome::success(rtt),
            Ok(Err(SurgeError::Timeout { .. })) | Err(_) => {
                ProbeOutcome::failure(FailureReason::NoResponse)
            }
            Ok(Err(SurgeError::IOError(e))) => ProbeOutcome::failure(socket_error_reason(&e)),
            Ok(Err(e)) => ProbeOutcome::failure(FailureReason::Other(e.to_string())),
        }
    }
}

#[async_trait]
impl Prober for IcmpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Icmp
    }

    fn requires_privileges(&self) -> bool {
        true
    }

    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
        let deadline = deadline_after(timeout);

        let ip = match timeout_at(deadline, self.resolver.lookup_first(&target.host)).await {
            Ok(Ok(ip)) => ip,
            Ok(Err(e)) => return ProbeOutcome::failure(FailureReason::Other(e.to_string())),
            Err(_) => return ProbeOutcome::failure(FailureReason::NoResponse),
        };

        let outcome = self.echo(ip, timeout, deadline).await;
        tracing::debug!(%ip, ?outcome, "icmp probe finished");
        outcome
    }
}

/// Turn an ICMP socket error into a reason the operator can act on.
fn socket_error_reason(error: &io::Error) -> FailureReason {
    if error.kind() == io::ErrorKind::PermissionDenied {
        FailureReason::Other(format!(
            "permission denied opening ICMP socket ({}); run as root or grant CAP_NET_RAW",
            error
        ))
    } else {
        FailureReason::Other(format!("ICMP socket error: {}", error))
    }
}

/// Check if running with root/admin privileges.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
