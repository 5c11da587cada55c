use std::path::{Path, PathBuf};

use log::debug;

use crate::core::errors::{OverseeError, Result};
use crate::core::models::query::{QueryRequest, QueryResponse};
use crate::core::traits::transport::QueryTransport;

/// Transport that answers every request from a JSON file.
///
/// The file holds one response envelope (`{"data": ..., "errors": [...]}`).
/// It is re-read on each request, so edits show up on refresh.
pub struct FixtureTransport {
    path: PathBuf,
}

impl FixtureTransport {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl QueryTransport for FixtureTransport {
    async fn send(&self, request: &QueryRequest) -> Result<QueryResponse> {
        debug!(
            "answering {} from fixture {}",
            request.document.operation_name,
            self.path.display()
        );

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| OverseeError::Transport {
                reason: format!("cannot read fixture {}: {e}", self.path.display()),
            })?;

        serde_json::from_str(&content).map_err(|e| OverseeError::Schema {
            detail: format!(
                "fixture {} is not a valid response envelope: {e}",
                self.path.display()
            ),
        })
    }
}
