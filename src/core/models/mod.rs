pub mod log_entry;
pub mod query;
pub mod table;
