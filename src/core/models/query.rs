use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::OverseeError;

/// A variable the query accepts, with its service-side type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDef {
    pub name: String,
    pub type_name: String,
}

impl VariableDef {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

/// Where the rows live in the response, and which fields each row carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultShape {
    pub root_field: String,
    pub fields: Vec<String>,
}

/// Declarative description of a query.
///
/// Carries no protocol detail: transports decide how to turn it into a
/// request on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    pub operation_name: String,
    pub variables_schema: Vec<VariableDef>,
    pub result_shape: ResultShape,
}

/// Identity of a cacheable result: operation plus canonical variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation_name: String,
    variables: String,
}

impl QueryKey {
    /// Build the key for `document` run with `variables`.
    ///
    /// `serde_json` objects keep their keys sorted, so two variable sets with
    /// the same entries always serialize to the same string.
    pub fn new(document: &QueryDocument, variables: &Value) -> Self {
        let variables = match variables {
            Value::Null => "{}".to_string(),
            other => other.to_string(),
        };
        Self {
            operation_name: document.operation_name.clone(),
            variables,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operation_name, self.variables)
    }
}

/// What a transport receives for a single fetch.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub document: QueryDocument,
    pub variables: Value,
}

/// Envelope returned by the query service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServiceErrorPayload>,
}

/// One application-level error reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorPayload {
    pub message: String,
}

/// Lifecycle stage of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Error,
    Success,
}

/// Which stage of a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Service,
    Schema,
}

/// A fetch failure captured as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    /// Convert back into a domain error, for callers that must fail.
    pub fn into_error(self) -> OverseeError {
        match self.kind {
            ErrorKind::Transport => OverseeError::Transport {
                reason: self.message,
            },
            ErrorKind::Service => OverseeError::Service {
                message: self.message,
            },
            ErrorKind::Schema => OverseeError::Schema {
                detail: self.message,
            },
        }
    }
}

impl From<OverseeError> for ErrorInfo {
    fn from(err: OverseeError) -> Self {
        match err {
            OverseeError::Service { message } => Self {
                kind: ErrorKind::Service,
                message,
            },
            OverseeError::Schema { detail } => Self {
                kind: ErrorKind::Schema,
                message: detail,
            },
            OverseeError::Transport { reason } => Self {
                kind: ErrorKind::Transport,
                message: reason,
            },
            other => Self {
                kind: ErrorKind::Transport,
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// State of one cache entry.
///
/// Exactly one of loading, error or success holds; rows exist only on success.
/// Rows are shared, so every reader of a cached success sees the same
/// allocation.
#[derive(Debug)]
pub enum QueryResult<T> {
    Loading,
    Error(ErrorInfo),
    Success(Rc<Vec<T>>),
}

impl<T> QueryResult<T> {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Loading => QueryStatus::Loading,
            Self::Error(_) => QueryStatus::Error,
            Self::Success(_) => QueryStatus::Success,
        }
    }

    pub fn data(&self) -> Option<&Rc<Vec<T>>> {
        match self {
            Self::Success(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Error(info) => Some(info),
            _ => None,
        }
    }
}

// Manual impl: cloning shares the rows, so `T: Clone` is not required.
impl<T> Clone for QueryResult<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Loading => Self::Loading,
            Self::Error(info) => Self::Error(info.clone()),
            Self::Success(rows) => Self::Success(Rc::clone(rows)),
        }
    }
}
