//! Client-side endpoint selection for a fixed pool of HTTP hosts.
//!
//! A [`Cluster`] is built from a connection string of the form
//! `scheme://host1,host2,host3` plus a health-check path. It hands out
//! live endpoints in ring order; callers report a failed endpoint with
//! [`Cluster::mark_down`], and a background probe polls the host's
//! health-check path until it answers 200 again, at which point the
//! member goes back into rotation.
//!
//! There is no request proxying here: callers use the returned endpoint
//! string with their own HTTP client.

pub mod cluster;
pub mod config;
pub mod error;
pub mod health;

pub use cluster::member::{Member, MemberStatus};
pub use cluster::{Cluster, MemberSnapshot};
pub use config::ProbeConfig;
pub use error::{ClusterError, ClusterResult};
