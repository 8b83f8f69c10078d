//! The graph source seam.
//!
//! Fetching topology from the remote provisioning API is an external
//! collaborator; the engine only ever sees a one-shot, fully
//! completed sequence of [`Element`] records. [`GraphSource`] is that
//! boundary, and [`JsonFileSource`] is the implementation used by the
//! CLI and by tests, reading mocked graph data from disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::GraphError;
use crate::model::Element;

/// A one-shot producer of graph elements.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetches the full element sequence. The engine consumes the
    /// result only after the fetch has completed in its entirety.
    async fn fetch(&self) -> Result<Vec<Element>, GraphError>;
}

/// Reads a JSON array of element records from a local file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GraphSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Element>, GraphError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| GraphError::Io {
                path: self.path.clone(),
                source,
            })?;
        let elements: Vec<Element> = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            count = elements.len(),
            "fetched graph elements"
        );
        Ok(elements)
    }
}
