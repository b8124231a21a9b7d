//! Render-agnostic table view model for list pages.

use aset_core::types::{DbId, Record};
use serde_json::Value;

use crate::pages::PageSpec;

/// Placeholder rows shown while the list is loading.
pub const PLACEHOLDER_ROWS: usize = 10;

/// Notice shown instead of rows when the list could not be fetched.
pub const LOAD_FAILED: &str = "Failed to load";

/// Header of the row-number column.
pub const NUMBER_HEADER: &str = "No";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based position in display order.
    pub number: usize,
    pub id: Option<DbId>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Shimmer rows; carries how many.
    Placeholder(usize),
    Failed(&'static str),
    Rows(Vec<TableRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<&'static str>,
    pub body: TableBody,
}

impl TableView {
    fn with_body(spec: &PageSpec, body: TableBody) -> Self {
        let headers = std::iter::once(NUMBER_HEADER)
            .chain(spec.columns.iter().map(|c| c.header))
            .collect();
        Self { headers, body }
    }

    pub fn pending(spec: &PageSpec) -> Self {
        Self::with_body(spec, TableBody::Placeholder(PLACEHOLDER_ROWS))
    }

    pub fn failed(spec: &PageSpec) -> Self {
        Self::with_body(spec, TableBody::Failed(LOAD_FAILED))
    }

    pub fn rows<'a>(spec: &PageSpec, records: impl IntoIterator<Item = &'a Record>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| TableRow {
                number: index + 1,
                id: record.get("id").and_then(Value::as_i64),
                cells: spec
                    .columns
                    .iter()
                    .map(|c| cell_text(record.get(c.field)))
                    .collect(),
            })
            .collect();
        Self::with_body(spec, TableBody::Rows(rows))
    }
}

/// Display text of a scalar; missing and `null` render empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
