//! Recovery probing subsystem.
//!
//! # Data Flow
//! ```text
//! Cluster::mark_down
//!     → registry.rs (claim probe slot, one per member)
//!     → prober.rs (GET scheme://host + health path until 200)
//!     → member status flipped back to Available
//!     → slot released, task exits
//! ```
//!
//! # Design Decisions
//! - At most one in-flight probe per member
//! - Probers never touch the ring lock; recovery is one atomic store
//! - Cluster drop broadcasts shutdown so probers cannot leak

pub mod prober;
pub mod registry;
