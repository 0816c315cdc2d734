//! Probe bookkeeping.
//!
//! # Responsibilities
//! - Allow at most one in-flight probe per member
//! - Fan out a shutdown signal so probers stop with their cluster

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

/// Tracks in-flight recovery probes and owns their shutdown channel.
#[derive(Debug)]
pub struct ProbeRegistry {
    /// Ring indices with a probe currently running.
    in_flight: Mutex<HashSet<usize>>,

    /// Broadcast channel closing every prober on cluster teardown.
    shutdown: broadcast::Sender<()>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            in_flight: Mutex::new(HashSet::new()),
            shutdown,
        }
    }

    /// Claim the probe slot for a member. Returns `None` when a probe
    /// for this member is already running.
    pub fn try_claim(self: &Arc<Self>, index: usize) -> Option<ProbeTicket> {
        let mut in_flight = self.in_flight.lock().expect("probe registry lock poisoned");
        if !in_flight.insert(index) {
            return None;
        }
        Some(ProbeTicket {
            registry: self.clone(),
            index,
        })
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Stop every in-flight prober.
    pub fn shutdown_all(&self) {
        let _ = self.shutdown.send(());
    }

    /// Number of probes currently running.
    pub fn probe_count(&self) -> usize {
        self.in_flight
            .lock()
            .expect("probe registry lock poisoned")
            .len()
    }

    fn release(&self, index: usize) {
        self.in_flight
            .lock()
            .expect("probe registry lock poisoned")
            .remove(&index);
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII claim on a member's probe slot, released when the probe exits.
#[derive(Debug)]
pub struct ProbeTicket {
    registry: Arc<ProbeRegistry>,
    index: usize,
}

impl Drop for ProbeTicket {
    fn drop(&mut self) {
        self.registry.release(self.index);
    }
}
