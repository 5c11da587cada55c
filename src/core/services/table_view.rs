use std::collections::HashSet;
use std::rc::Rc;

use crate::core::errors::{OverseeError, Result};
use crate::core::models::table::{
    BodyRow, ColumnDescriptor, HeaderCell, PaginationConfig, PaginationState, TableModel,
};

type RowKeyFn<T> = Box<dyn Fn(&T) -> String>;

/// Paginated, column-aware view over a set of rows.
///
/// The page index is private: it only moves through `next_page`,
/// `previous_page`, and the clamp applied by `set_rows`.
pub struct TableView<T> {
    rows: Rc<Vec<T>>,
    columns: Vec<ColumnDescriptor<T>>,
    page_size: usize,
    page_index: usize,
    row_key: Option<RowKeyFn<T>>,
}

impl<T> TableView<T> {
    /// Build a view starting on the first page.
    ///
    /// Fails with `OverseeError::Configuration` if two columns share a key
    /// or the page size is zero.
    pub fn new(
        rows: impl Into<Rc<Vec<T>>>,
        columns: Vec<ColumnDescriptor<T>>,
        config: PaginationConfig,
    ) -> Result<Self> {
        if config.page_size == 0 {
            return Err(OverseeError::Configuration {
                detail: "page size must be a positive integer".into(),
            });
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(OverseeError::Configuration {
                    detail: format!("duplicate column key '{}'", column.key),
                });
            }
        }

        Ok(Self {
            rows: rows.into(),
            columns,
            page_size: config.page_size,
            page_index: 0,
            row_key: None,
        })
    }

    /// Key body rows with `key_fn` instead of their absolute index.
    pub fn with_row_key(mut self, key_fn: impl Fn(&T) -> String + 'static) -> Self {
        self.row_key = Some(Box::new(key_fn));
        self
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> &Rc<Vec<T>> {
        &self.rows
    }

    /// Number of non-empty pages: `ceil(rows / page_size)`.
    ///
    /// Zero for an empty table, which still displays one empty page.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size)
    }

    pub fn pagination_state(&self) -> PaginationState {
        PaginationState {
            page_index: self.page_index,
            page_size: self.page_size,
            total_rows: self.rows.len(),
            page_count: self.page_count(),
            has_next: self.has_next(),
            has_previous: self.page_index > 0,
        }
    }

    /// Header and body cells for the current page window.
    pub fn table_model(&self) -> TableModel {
        if self.columns.is_empty() {
            return TableModel::default();
        }

        let header_row = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.render_header(),
            })
            .collect();

        let start = self.window_start();
        let body_rows = self
            .rows
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(index, row)| BodyRow {
                row_key: match &self.row_key {
                    Some(key_fn) => key_fn(row),
                    None => index.to_string(),
                },
                cells: self.columns.iter().map(|column| column.cell(row)).collect(),
            })
            .collect();

        TableModel {
            header_row,
            body_rows,
        }
    }

    /// Advance one page. No-op on the last page; returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Go back one page. No-op on the first page; returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Replace the rows after a refresh.
    ///
    /// If the current page now starts past the end, the index drops to the
    /// last page that still has rows.
    pub fn set_rows(&mut self, rows: impl Into<Rc<Vec<T>>>) {
        self.rows = rows.into();
        let last = self.page_count().saturating_sub(1);
        if self.page_index > last {
            self.page_index = last;
        }
    }

    fn window_start(&self) -> usize {
        self.page_index * self.page_size
    }

    fn has_next(&self) -> bool {
        self.window_start() + self.page_size < self.rows.len()
    }
}
