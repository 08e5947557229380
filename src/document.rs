//! Tabular documents: the rows of an uploaded CSV, as text.
//!
//! The first record is the header. It fixes the column count but is never
//! validated. Data rows shorter than the header are padded with empty cells;
//! a row wider than the header makes the whole document unreadable.

use thiserror::Error;
use tracing::debug;

/// A structural fault that prevents a document from being read as a table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{cause}")]
pub struct DocumentError {
    pub cause: String,
}

impl DocumentError {
    fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

impl From<csv::Error> for DocumentError {
    fn from(err: csv::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A rectangular table of text cells addressed by zero-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Vec<String>>,
    column_count: usize,
}

impl Document {
    /// Builds a document `column_count` cells wide, padding short rows.
    pub fn with_width(rows: Vec<Vec<String>>, column_count: usize) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| pad_row(row, column_count))
            .collect();
        Self { rows, column_count }
    }

    /// Builds a headerless document whose width is that of its widest row.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self::with_width(rows, column_count)
    }

    /// Parses comma-separated text whose first record is a header.
    pub fn parse_csv(content: impl AsRef<[u8]>) -> Result<Self, DocumentError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_ref());

        let mut records = reader.records();
        let width = match records.next() {
            Some(record) => record?.len(),
            None => return Err(DocumentError::new("No columns to parse from file")),
        };

        let mut rows = Vec::new();
        for (index, record) in records.enumerate() {
            let record = record?;
            if record.len() > width {
                let line = record
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(index as u64 + 2);
                return Err(DocumentError::new(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(rows = rows.len(), columns = width, "parsed csv document");
        Ok(Self::with_width(rows, width))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// The cell at (`row`, `column`); absent cells read as empty text.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Iterates the cells of one column in row order.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, column))
    }
}

fn pad_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() < width {
        row.resize(width, String::new());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fixes_column_count() {
        let doc = Document::parse_csv("Amount,Date,Ref\n1.5,20240101,A\n2,20240102,B\n").unwrap();
        assert_eq!(doc.column_count(), 3);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.cell(0, 0), "1.5");
        assert_eq!(doc.cell(1, 2), "B");
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let doc = Document::parse_csv("a,b,c\n1\n1,2\n").unwrap();
        assert_eq!(doc.column(2).collect::<Vec<_>>(), vec!["", ""]);
        assert_eq!(doc.cell(0, 0), "1");
        assert_eq!(doc.cell(1, 2), "");
    }

    #[test]
    fn wide_row_is_a_structural_fault() {
        let err = Document::parse_csv("a\n1\n1,2\n").unwrap_err();
        assert_eq!(err.cause, "Expected 1 fields in line 3, saw 2");
    }

    #[test]
    fn empty_content_has_no_columns() {
        let err = Document::parse_csv("").unwrap_err();
        assert_eq!(err.cause, "No columns to parse from file");
    }

    #[test]
    fn header_only_document_has_no_rows() {
        let doc = Document::parse_csv("Amount,Date\n").unwrap();
        assert_eq!((doc.row_count(), doc.column_count()), (0, 2));
    }

    #[test]
    fn quoted_empty_cell_is_a_row() {
        let doc = Document::parse_csv("Amount\n10.50\n\"\"\nabc\n").unwrap();
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.column(0).collect::<Vec<_>>(), vec!["10.50", "", "abc"]);
    }

    #[test]
    fn invalid_utf8_is_a_structural_fault() {
        assert!(Document::parse_csv(b"Amount\n\xff\xfe\n").is_err());
    }

    #[test]
    fn out_of_range_cell_reads_empty() {
        let doc = Document::from_rows(vec![vec!["x"]]);
        assert_eq!(doc.cell(0, 5), "");
        assert_eq!(doc.cell(9, 0), "");
    }

    #[test]
    fn from_rows_uses_widest_row() {
        let doc = Document::from_rows(vec![vec!["a"], vec!["b", "c"]]);
        assert_eq!(doc.column_count(), 2);
        assert_eq!(doc.column(1).collect::<Vec<_>>(), vec!["", "c"]);
    }
}
