pub mod columns;
pub mod logs;
