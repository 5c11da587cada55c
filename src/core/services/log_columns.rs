use chrono::DateTime;

use crate::core::errors::{OverseeError, Result};
use crate::core::models::log_entry::LogEntry;
use crate::core::models::table::{CellValue, ColumnDescriptor, ColumnHeader};

/// A column the audit table knows how to show.
pub struct ColumnInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Every available column, in default display order.
pub const AVAILABLE_COLUMNS: [ColumnInfo; 4] = [
    ColumnInfo {
        key: "id",
        label: "ID",
        description: "Unique identifier of the entry",
    },
    ColumnInfo {
        key: "operation",
        label: "Operation",
        description: "What was done",
    },
    ColumnInfo {
        key: "service_name",
        label: "Service",
        description: "Service that reported the entry",
    },
    ColumnInfo {
        key: "timestamp",
        label: "Timestamp",
        description: "When it happened (epoch seconds, or UTC with human timestamps)",
    },
];

/// Keys of the default column set.
pub fn default_column_keys() -> Vec<String> {
    AVAILABLE_COLUMNS
        .iter()
        .map(|c| c.key.to_string())
        .collect()
}

/// Build descriptors for `keys`, in the given order.
///
/// Unknown keys are a configuration error. Repeated keys are passed through
/// and rejected when the table is built.
pub fn log_columns(keys: &[String], human_timestamps: bool) -> Result<Vec<ColumnDescriptor<LogEntry>>> {
    keys.iter()
        .map(|key| column(key, human_timestamps))
        .collect()
}

fn column(key: &str, human_timestamps: bool) -> Result<ColumnDescriptor<LogEntry>> {
    let label = AVAILABLE_COLUMNS
        .iter()
        .find(|c| c.key == key)
        .map(|c| c.label)
        .ok_or_else(|| OverseeError::Configuration {
            detail: format!(
                "unknown column '{key}'. Available columns: {}",
                AVAILABLE_COLUMNS
                    .iter()
                    .map(|c| c.key)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })?;

    let descriptor = match key {
        "id" => ColumnDescriptor::new(key, label, |e: &LogEntry| e.id.as_str().into()),
        "operation" => ColumnDescriptor::new(key, label, |e: &LogEntry| e.operation.as_str().into()),
        "service_name" => {
            ColumnDescriptor::new(key, label, |e: &LogEntry| e.service_name.as_str().into())
        }
        _ if human_timestamps => ColumnDescriptor::new(
            key,
            ColumnHeader::Render(Box::new(move |_: &str| format!("{label} (UTC)"))),
            |e: &LogEntry| format_timestamp(e.timestamp),
        ),
        _ => ColumnDescriptor::new(key, label, |e: &LogEntry| CellValue::Integer(e.timestamp)),
    };
    Ok(descriptor)
}

/// Render epoch seconds as a UTC date, keeping the raw number if out of range.
pub fn format_timestamp(secs: i64) -> CellValue {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => CellValue::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => CellValue::Integer(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry {
            id: "evt-1".into(),
            timestamp: 1_700_000_000,
            service_name: "billing".into(),
            operation: "refund".into(),
        }
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn default_order_is_id_operation_service_timestamp() {
        assert_eq!(
            default_column_keys(),
            ["id", "operation", "service_name", "timestamp"]
        );
    }

    #[test]
    fn accessors_read_the_matching_field() {
        let columns = log_columns(&default_column_keys(), false).unwrap();
        let cells: Vec<CellValue> = columns.iter().map(|c| c.cell(&entry())).collect();
        assert_eq!(
            cells,
            [
                CellValue::from("evt-1"),
                CellValue::from("refund"),
                CellValue::from("billing"),
                CellValue::Integer(1_700_000_000),
            ]
        );
        assert_eq!(columns[2].render_header(), "Service");
    }

    #[test]
    fn human_timestamps_render_utc() {
        let columns = log_columns(&keys(&["timestamp"]), true).unwrap();
        assert_eq!(columns[0].render_header(), "Timestamp (UTC)");
        assert_eq!(
            columns[0].cell(&entry()),
            CellValue::from("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn custom_order_is_preserved() {
        let columns = log_columns(&keys(&["timestamp", "id"]), false).unwrap();
        let order: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(order, ["timestamp", "id"]);
    }

    #[test]
    fn unknown_column_is_configuration_error() {
        let err = log_columns(&keys(&["id", "actor"]), false).err().unwrap();
        assert!(matches!(err, OverseeError::Configuration { .. }));
        assert!(err.to_string().contains("unknown column 'actor'"));
    }

    #[test]
    fn out_of_range_timestamp_stays_numeric() {
        assert_eq!(format_timestamp(i64::MAX), CellValue::Integer(i64::MAX));
    }
}
