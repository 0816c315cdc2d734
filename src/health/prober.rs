//! Recovery probing for members marked down.
//!
//! # Responsibilities
//! - Poll a downed member's health endpoint until it answers 200
//! - Flip the member back to Available and exit

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::cluster::member::Member;
use crate::config::ProbeConfig;
use crate::health::registry::ProbeTicket;

/// A probe task bound to one downed member.
///
/// Retries on a fixed interval with no backoff and no attempt cap; the
/// only exits are a 200 from the health endpoint or cluster shutdown.
pub struct HealthProber {
    member: Arc<Member>,
    probe_url: String,
    interval: Duration,
    client: reqwest::Client,
}

impl HealthProber {
    /// Create a probe for `member`, polling `endpoint` + `health_check_path`.
    ///
    /// The client is shared across probers and carries the per-attempt
    /// request timeout.
    pub(crate) fn new(
        member: Arc<Member>,
        endpoint: String,
        health_check_path: &str,
        config: &ProbeConfig,
        client: reqwest::Client,
    ) -> Self {
        Self {
            probe_url: format!("{}{}", endpoint, health_check_path),
            member,
            interval: config.interval(),
            client,
        }
    }

    /// Drive the probe loop until the member recovers or the cluster
    /// shuts down. The ticket keeps the member's probe slot claimed for
    /// the lifetime of the task.
    pub(crate) async fn run(self, mut shutdown: broadcast::Receiver<()>, _ticket: ProbeTicket) {
        loop {
            tokio::select! {
                recovered = self.attempt() => {
                    if recovered {
                        self.member.mark_available();
                        tracing::info!(
                            hostname = %self.member.hostname,
                            "Member reinstated after successful health probe"
                        );
                        return;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!(hostname = %self.member.hostname, "Probe stopped by cluster shutdown");
                    return;
                }
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::debug!(hostname = %self.member.hostname, "Probe stopped by cluster shutdown");
                    return;
                }
            }
        }
    }

    /// One probe attempt. Only a 200 counts as recovery; transport
    /// errors and other status codes are retry signals, never surfaced.
    async fn attempt(&self) -> bool {
        match self.client.get(&self.probe_url).send().await {
            Ok(response) => {
                let recovered = response.status() == reqwest::StatusCode::OK;
                if !recovered {
                    tracing::debug!(
                        url = %self.probe_url,
                        status = %response.status(),
                        "Health probe answered with non-200 status"
                    );
                }
                recovered
            }
            Err(e) => {
                tracing::debug!(url = %self.probe_url, error = %e, "Health probe attempt failed");
                false
            }
        }
    }
}
