use serde::{Deserialize, Serialize};

/// One audit log record as served by the collector's query service.
///
/// Field names are the wire contract: a row missing any of them is rejected
/// when the response is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Epoch seconds.
    pub timestamp: i64,
    pub service_name: String,
    pub operation: String,
}
