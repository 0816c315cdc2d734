//! Cluster ring and endpoint selection.
//!
//! # Data Flow
//! ```text
//! Cluster::new ("scheme://host1,host2,...", health path)
//!     → ring of members in listed order, all Available, cursor at first
//! get_member
//!     → scan ring from cursor, advancing past Unavailable members
//!     → return "scheme://host", cursor stays on the returned member
//! mark_down
//!     → member at cursor marked Unavailable
//!     → recovery probe spawned (health subsystem)
//!     → cursor advances to the successor
//! ```
//!
//! # Design Decisions
//! - Ring is a fixed vector with an index cursor; advance = (i + 1) % size
//! - One RwLock guards the cursor; member status is atomic
//! - Selection is a monotonic sweep, not fair rotation: a member that is
//!   never marked down keeps being returned

pub mod member;

use std::fmt;
use std::sync::{Arc, RwLock};

use url::Url;

use crate::config::ProbeConfig;
use crate::error::{ClusterError, ClusterResult};
use crate::health::prober::HealthProber;
use crate::health::registry::ProbeRegistry;
use member::{Member, MemberStatus};

/// Fixed pool of HTTP backend hosts with ring-order selection and
/// automatic reinstatement of recovered members.
///
/// The cluster is safe to share across tasks; selection and marking
/// serialize on an internal lock.
#[derive(Debug)]
pub struct Cluster {
    /// Original connection string, returned verbatim by [`Cluster::url`].
    url: String,

    /// Scheme shared by every member (`http` or `https`).
    scheme: String,

    /// URI suffix probed on downed members.
    health_check_path: String,

    /// Ring of members in construction order.
    members: Vec<Arc<Member>>,

    /// Ring cursor: the next selection candidate.
    active: RwLock<usize>,

    /// Probe timing.
    config: ProbeConfig,

    /// Shared HTTP client for probes, carries the per-attempt timeout.
    probe_client: reqwest::Client,

    /// In-flight probe bookkeeping and shutdown fan-out.
    registry: Arc<ProbeRegistry>,
}

impl Cluster {
    /// Build a cluster from a connection string of the form
    /// `scheme://host1[,host2,...]` and a health-check path such as
    /// `/health`. Hosts may carry ports. No network I/O happens here.
    pub fn new(cluster_url: &str, health_check_path: &str) -> ClusterResult<Self> {
        Self::with_config(cluster_url, health_check_path, ProbeConfig::default())
    }

    /// Same as [`Cluster::new`] with explicit probe timing.
    pub fn with_config(
        cluster_url: &str,
        health_check_path: &str,
        config: ProbeConfig,
    ) -> ClusterResult<Self> {
        let (scheme, hostnames) = parse_connection_string(cluster_url)?;

        let members: Vec<Arc<Member>> = hostnames
            .into_iter()
            .map(|hostname| Arc::new(Member::new(hostname)))
            .collect();

        let probe_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("failed to build probe HTTP client");

        tracing::debug!(
            url = %cluster_url,
            scheme = %scheme,
            size = members.len(),
            "Cluster constructed"
        );

        Ok(Self {
            url: cluster_url.to_string(),
            scheme,
            health_check_path: health_check_path.to_string(),
            members,
            active: RwLock::new(0),
            config,
            probe_client,
            registry: Arc::new(ProbeRegistry::new()),
        })
    }

    /// Endpoint URL of the first available member at or after the
    /// cursor. The cursor is left on the returned member, so repeated
    /// calls keep returning it until it is marked down.
    ///
    /// Fails with [`ClusterError::NoMembersAvailable`] when a full scan
    /// of the ring finds no available member.
    pub fn get_member(&self) -> ClusterResult<String> {
        let mut active = self.active.write().expect("cluster lock poisoned");
        for _ in 0..self.members.len() {
            let candidate = &self.members[*active];
            if candidate.is_available() {
                return Ok(self.endpoint_url(candidate));
            }
            *active = (*active + 1) % self.members.len();
        }
        Err(ClusterError::NoMembersAvailable)
    }

    /// Mark the member at the cursor as unavailable, schedule a
    /// recovery probe for it and advance the cursor to its successor.
    ///
    /// Callers report a failure they just observed on the endpoint most
    /// recently returned by [`Cluster::get_member`]. Marking an
    /// already-down member is a harmless no-op transition, and a member
    /// with a probe already in flight does not get a second one.
    ///
    /// Must be called from within a Tokio runtime: the probe is a
    /// spawned task.
    pub fn mark_down(&self) {
        let mut active = self.active.write().expect("cluster lock poisoned");
        let index = *active;
        let member = &self.members[index];

        member.mark_unavailable();
        tracing::warn!(hostname = %member.hostname, "Member marked down");

        self.spawn_probe(index);

        *active = (index + 1) % self.members.len();
    }

    /// Hostnames of available members, in ring-traversal order starting
    /// at the cursor.
    pub fn active(&self) -> Vec<String> {
        self.collect_by_status(MemberStatus::Available)
    }

    /// Hostnames of unavailable members, in ring-traversal order
    /// starting at the cursor.
    pub fn non_active(&self) -> Vec<String> {
        self.collect_by_status(MemberStatus::Unavailable)
    }

    /// Number of members, fixed at construction.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// The connection string the cluster was built from, verbatim.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Point-in-time view of every member in construction order.
    pub fn snapshot(&self) -> Vec<MemberSnapshot> {
        self.members
            .iter()
            .map(|member| MemberSnapshot {
                hostname: member.hostname.clone(),
                status: member.status(),
            })
            .collect()
    }

    /// Number of in-flight recovery probes.
    pub fn probe_count(&self) -> usize {
        self.registry.probe_count()
    }

    fn endpoint_url(&self, member: &Member) -> String {
        format!("{}://{}", self.scheme, member.hostname)
    }

    fn collect_by_status(&self, wanted: MemberStatus) -> Vec<String> {
        let active = self.active.read().expect("cluster lock poisoned");
        let size = self.members.len();
        (0..size)
            .map(|offset| &self.members[(*active + offset) % size])
            .filter(|member| member.status() == wanted)
            .map(|member| member.hostname.clone())
            .collect()
    }

    fn spawn_probe(&self, index: usize) {
        let member = &self.members[index];
        let Some(ticket) = self.registry.try_claim(index) else {
            tracing::debug!(
                hostname = %member.hostname,
                "Probe already in flight, not spawning another"
            );
            return;
        };

        let prober = HealthProber::new(
            member.clone(),
            self.endpoint_url(member),
            &self.health_check_path,
            &self.config,
            self.probe_client.clone(),
        );
        tokio::spawn(prober.run(self.registry.subscribe(), ticket));
    }
}

impl Drop for Cluster {
    fn drop(&mut self) {
        // Probers hold no reference back to the cluster; stop them here
        // so none outlives it.
        self.registry.shutdown_all();
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active.read().expect("cluster lock poisoned");
        write!(f, "url: {}, members: [", self.url)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", member)?;
        }
        write!(
            f,
            "], size: {}, active: {}",
            self.members.len(),
            self.members[*active]
        )
    }
}

/// Point-in-time status of one member, as reported by
/// [`Cluster::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub hostname: String,
    pub status: MemberStatus,
}

/// Split a connection string into its scheme and host list.
///
/// Accepts `scheme://host1[,host2,...]` where scheme is `http` or
/// `https`; anything after the authority (path, query, fragment) is
/// ignored, as is any user-info portion. Each host is validated the
/// way a single-host URL would parse.
fn parse_connection_string(cluster_url: &str) -> ClusterResult<(String, Vec<String>)> {
    let (scheme, rest) = cluster_url
        .split_once("://")
        .ok_or_else(|| ClusterError::InvalidEndpoint(format!("missing scheme: {cluster_url}")))?;

    if scheme != "http" && scheme != "https" {
        return Err(ClusterError::InvalidEndpoint(format!(
            "unsupported scheme: {scheme}"
        )));
    }

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let hosts = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    if hosts.is_empty() {
        return Err(ClusterError::InvalidEndpoint(
            "no hosts in connection string".into(),
        ));
    }

    let mut hostnames = Vec::new();
    for host in hosts.split(',') {
        if host.is_empty() {
            return Err(ClusterError::InvalidEndpoint(
                "empty host in connection string".into(),
            ));
        }
        Url::parse(&format!("{scheme}://{host}"))
            .map_err(|e| ClusterError::InvalidEndpoint(format!("bad host {host}: {e}")))?;
        hostnames.push(host.to_string());
    }

    Ok((scheme.to_string(), hostnames))
}
