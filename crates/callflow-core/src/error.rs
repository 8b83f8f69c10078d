//! Route graph error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or querying a route graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge references a node id that does not exist in the graph.
    ///
    /// This is a structural-integrity violation and is raised at load
    /// time, before any resolution or filter pass can run.
    #[error("malformed graph: edge '{edge}' references unknown node '{node}'")]
    MissingEndpoint { edge: String, node: String },

    /// IO error while reading graph data.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Graph data could not be parsed.
    #[error("failed to parse graph data: {0}")]
    Parse(#[from] serde_json::Error),
}
