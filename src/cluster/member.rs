//! Cluster member representation.
//!
//! # Responsibilities
//! - Represent a single backend host in the ring
//! - Track availability as an atomic status flag

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Availability of a single member.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Available = 0,
    Unavailable = 1,
}

impl From<u8> for MemberStatus {
    fn from(val: u8) -> Self {
        match val {
            1 => MemberStatus::Unavailable,
            _ => MemberStatus::Available,
        }
    }
}

/// A single backend host tracked by the cluster.
#[derive(Debug)]
pub struct Member {
    /// Host name or address, possibly with a port ("10.0.0.1:8080").
    pub hostname: String,

    /// Current status (0=Available, 1=Unavailable).
    status: AtomicU8,
}

impl Member {
    /// Create a member, available by default.
    pub(crate) fn new(hostname: String) -> Self {
        Self {
            hostname,
            status: AtomicU8::new(MemberStatus::Available as u8),
        }
    }

    /// Current availability.
    pub fn status(&self) -> MemberStatus {
        self.status.load(Ordering::Relaxed).into()
    }

    /// Return true if the member can be handed out.
    pub fn is_available(&self) -> bool {
        self.status() == MemberStatus::Available
    }

    /// Put the member back into rotation. A single atomic store, so the
    /// prober never needs the ring lock.
    pub(crate) fn mark_available(&self) {
        self.status
            .store(MemberStatus::Available as u8, Ordering::Relaxed);
    }

    /// Take the member out of rotation.
    pub(crate) fn mark_unavailable(&self) {
        self.status
            .store(MemberStatus::Unavailable as u8, Ordering::Relaxed);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.status() {
            MemberStatus::Available => "UP",
            MemberStatus::Unavailable => "DOWN",
        };
        write!(f, "{}:{}", self.hostname, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_starts_available() {
        let member = Member::new("10.0.0.1:8080".into());
        assert_eq!(member.hostname, "10.0.0.1:8080");
        assert_eq!(member.status(), MemberStatus::Available);
        assert!(member.is_available());
    }

    #[test]
    fn test_status_transitions() {
        let member = Member::new("web1".into());

        member.mark_unavailable();
        assert_eq!(member.status(), MemberStatus::Unavailable);
        assert!(!member.is_available());

        // Marking an already-down member again is a no-op transition.
        member.mark_unavailable();
        assert_eq!(member.status(), MemberStatus::Unavailable);

        member.mark_available();
        assert!(member.is_available());
    }

    #[test]
    fn test_status_from_u8() {
        assert_eq!(MemberStatus::from(0), MemberStatus::Available);
        assert_eq!(MemberStatus::from(1), MemberStatus::Unavailable);
    }

    #[test]
    fn test_display() {
        let member = Member::new("web1:8080".into());
        assert_eq!(member.to_string(), "web1:8080:UP");

        member.mark_unavailable();
        assert_eq!(member.to_string(), "web1:8080:DOWN");
    }
}
