use std::time::{Duration, Instant};

use log::{debug, warn};
use serde_json::json;

use crate::core::errors::{OverseeError, Result};
use crate::core::models::query::{QueryDocument, QueryRequest, QueryResponse};
use crate::core::traits::transport::QueryTransport;

/// Default collector endpoint (the collector listens on 8080).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/query";

/// Transport that posts GraphQL documents to the collector over HTTP.
pub struct GraphqlTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl GraphqlTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("oversee-view/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OverseeError::Transport {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    #[allow(dead_code)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryTransport for GraphqlTransport {
    async fn send(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let body = json!({
            "query": render_document(&request.document),
            "operationName": request.document.operation_name,
            "variables": request.variables,
        });

        let started = Instant::now();
        debug!(
            "POST {} operation={}",
            self.endpoint, request.document.operation_name
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| OverseeError::Transport {
                reason: format!("request to {} failed: {e}", self.endpoint),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| OverseeError::Transport {
            reason: format!("failed to read response body: {e}"),
        })?;
        debug!(
            "response status={} bytes={} duration_ms={}",
            status,
            text.len(),
            started.elapsed().as_millis()
        );

        let parsed = serde_json::from_str::<QueryResponse>(&text);

        if !status.is_success() {
            warn!("query service returned status {status}");
            // A GraphQL error body on a failed status is still a service answer.
            return match parsed {
                Ok(response) if !response.errors.is_empty() => Ok(response),
                _ => Err(OverseeError::Transport {
                    reason: format!("service returned status {status}"),
                }),
            };
        }

        parsed.map_err(|e| OverseeError::Schema {
            detail: format!("response is not a valid query envelope: {e}"),
        })
    }
}

/// Render a `QueryDocument` as GraphQL text.
pub fn render_document(document: &QueryDocument) -> String {
    let shape = &document.result_shape;
    let mut out = format!("query {}", document.operation_name);

    if !document.variables_schema.is_empty() {
        let declarations: Vec<String> = document
            .variables_schema
            .iter()
            .map(|v| format!("${}: {}", v.name, v.type_name))
            .collect();
        out.push_str(&format!("({})", declarations.join(", ")));
    }

    out.push_str(" {\n  ");
    out.push_str(&shape.root_field);

    if !document.variables_schema.is_empty() {
        let arguments: Vec<String> = document
            .variables_schema
            .iter()
            .map(|v| format!("{0}: ${0}", v.name))
            .collect();
        out.push_str(&format!("({})", arguments.join(", ")));
    }

    out.push_str(" {\n");
    for field in &shape.fields {
        out.push_str(&format!("    {field}\n"));
    }
    out.push_str("  }\n}\n");
    out
}
