use std::fmt;

/// A rendered cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Column header: either a fixed label or a function of the column key.
pub enum ColumnHeader {
    Label(String),
    Render(Box<dyn Fn(&str) -> String>),
}

impl From<&str> for ColumnHeader {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for ColumnHeader {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl fmt::Debug for ColumnHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// One table column: key, header and how to read a cell from a row.
///
/// Declaration order of descriptors is display order.
pub struct ColumnDescriptor<T> {
    pub key: String,
    pub header: ColumnHeader,
    accessor: Box<dyn Fn(&T) -> CellValue>,
}

impl<T> ColumnDescriptor<T> {
    pub fn new(
        key: &str,
        header: impl Into<ColumnHeader>,
        accessor: impl Fn(&T) -> CellValue + 'static,
    ) -> Self {
        Self {
            key: key.to_string(),
            header: header.into(),
            accessor: Box::new(accessor),
        }
    }

    /// Apply the accessor to a row.
    pub fn cell(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    pub fn render_header(&self) -> String {
        match &self.header {
            ColumnHeader::Label(label) => label.clone(),
            ColumnHeader::Render(render) => render(&self.key),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Pagination settings supplied when a table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub page_size: usize,
}

/// Snapshot of the pager, derived from the table's rows and page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub page_count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub row_key: String,
    pub cells: Vec<CellValue>,
}

/// Render-ready view of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub header_row: Vec<HeaderCell>,
    pub body_rows: Vec<BodyRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_display() {
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert_eq!(CellValue::from(42i64).to_string(), "42");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn header_renders_label_or_function() {
        let labeled: ColumnDescriptor<i64> =
            ColumnDescriptor::new("n", "Number", |n: &i64| (*n).into());
        assert_eq!(labeled.render_header(), "Number");

        let rendered: ColumnDescriptor<i64> = ColumnDescriptor::new(
            "n",
            ColumnHeader::Render(Box::new(|key: &str| key.to_uppercase())),
            |n: &i64| (*n).into(),
        );
        assert_eq!(rendered.render_header(), "N");
        assert_eq!(rendered.cell(&7), CellValue::Integer(7));
    }
}
