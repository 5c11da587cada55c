use serde_json::{Map, Value};

use crate::core::models::query::{QueryDocument, ResultShape, VariableDef};

/// Optional narrowing of the audit log. Set fields must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub service_name: Option<String>,
    pub operation: Option<String>,
    pub actor_id: Option<String>,
    pub actor_type: Option<String>,
}

impl LogFilter {
    pub fn is_empty(&self) -> bool {
        self.criteria().next().is_none()
    }

    /// Set criteria as `(variable name, value)`, in declaration order.
    pub fn criteria(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("service_name", &self.service_name),
            ("operation", &self.operation),
            ("actor_id", &self.actor_id),
            ("actor_type", &self.actor_type),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

const ENTRY_FIELDS: [&str; 4] = ["id", "timestamp", "service_name", "operation"];

/// Query document and variables for the audit log.
///
/// Without filters this is the plain listing; with any filter it becomes the
/// search query, sending only the variables that were set.
pub fn audit_log_query(filter: &LogFilter) -> (QueryDocument, Value) {
    let fields = ENTRY_FIELDS.iter().map(|f| f.to_string()).collect();

    if filter.is_empty() {
        let document = QueryDocument {
            operation_name: "ListAuditLogs".into(),
            variables_schema: Vec::new(),
            result_shape: ResultShape {
                root_field: "listAuditLogs".into(),
                fields,
            },
        };
        return (document, Value::Object(Map::new()));
    }

    let variables: Map<String, Value> = filter
        .criteria()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    let document = QueryDocument {
        operation_name: "SearchAuditLogs".into(),
        variables_schema: vec![
            VariableDef::new("service_name", "String"),
            VariableDef::new("operation", "String"),
            VariableDef::new("actor_id", "String"),
            VariableDef::new("actor_type", "String"),
        ],
        result_shape: ResultShape {
            root_field: "searchAuditLogs".into(),
            fields,
        },
    };
    (document, Value::Object(variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unfiltered_lists_all_logs() {
        let (doc, vars) = audit_log_query(&LogFilter::default());
        assert_eq!(doc.operation_name, "ListAuditLogs");
        assert_eq!(doc.result_shape.root_field, "listAuditLogs");
        assert_eq!(
            doc.result_shape.fields,
            ["id", "timestamp", "service_name", "operation"]
        );
        assert_eq!(vars, json!({}));
    }

    #[test]
    fn filter_switches_to_search_with_only_set_variables() {
        let filter = LogFilter {
            service_name: Some("billing".into()),
            ..LogFilter::default()
        };
        let (doc, vars) = audit_log_query(&filter);
        assert_eq!(doc.operation_name, "SearchAuditLogs");
        assert_eq!(doc.result_shape.root_field, "searchAuditLogs");
        assert_eq!(vars, json!({"service_name": "billing"}));
    }

    #[test]
    fn actor_filters_are_search_variables() {
        let filter = LogFilter {
            actor_id: Some("user-42".into()),
            actor_type: Some("user".into()),
            ..LogFilter::default()
        };
        assert!(!filter.is_empty());

        let (doc, vars) = audit_log_query(&filter);
        assert_eq!(doc.operation_name, "SearchAuditLogs");
        let declared: Vec<&str> = doc
            .variables_schema
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(
            declared,
            ["service_name", "operation", "actor_id", "actor_type"]
        );
        assert_eq!(vars, json!({"actor_id": "user-42", "actor_type": "user"}));
    }
}
