pub mod audit_query;
pub mod log_columns;
pub mod query_cache;
pub mod table_view;
