use std::future::Future;

use crate::core::errors::Result;
use crate::core::models::query::{QueryRequest, QueryResponse};

/// Port to the remote query service.
///
/// Implementations return `Err` only for failures to obtain a response
/// envelope at all (network, unreadable body). Application errors reported by
/// the service travel inside `QueryResponse::errors`.
pub trait QueryTransport {
    fn send(&self, request: &QueryRequest) -> impl Future<Output = Result<QueryResponse>>;
}
