//! Error definitions for cluster construction and selection.

use thiserror::Error;

/// Errors surfaced to callers of the cluster.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The connection string was malformed or used an unsupported scheme.
    #[error("invalid cluster endpoint: {0}")]
    InvalidEndpoint(String),

    /// Every member of the cluster is currently marked down.
    #[error("no cluster members available")]
    NoMembersAvailable,
}

/// Result type for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClusterError::InvalidEndpoint("unsupported scheme: ftp".into());
        assert_eq!(
            err.to_string(),
            "invalid cluster endpoint: unsupported scheme: ftp"
        );

        let err = ClusterError::NoMembersAvailable;
        assert_eq!(err.to_string(), "no cluster members available");
    }
}
