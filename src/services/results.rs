//! Result table built from list responses.

use serde::Serialize;

use crate::domain::inventory::InventoryRecord;
use crate::forms::inventory::Attribute;

/// Column order of the result table.
pub const RESULT_COLUMNS: [Attribute; 6] = [
    Attribute::ProductId,
    Attribute::Condition,
    Attribute::Quantity,
    Attribute::RestockLevel,
    Attribute::LastUpdatedOn,
    Attribute::CanUpdate,
];

/// One table row. Cell text is escaped by the template on render.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// DOM id of the row, `row_{index}`.
    pub id: String,
    /// Cell text in [`RESULT_COLUMNS`] order.
    pub cells: Vec<String>,
}

impl ResultRow {
    fn new(index: usize, record: &InventoryRecord) -> Self {
        Self {
            id: format!("row_{index}"),
            cells: RESULT_COLUMNS
                .iter()
                .map(|column| column.text_of(record))
                .collect(),
        }
    }
}

/// Table rendered into the search results area.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<ResultRow>,
}

/// Output of [`render_results`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    pub table: ResultTable,
    /// First record received, to be mirrored into the form.
    pub first: Option<InventoryRecord>,
}

/// Build the result table for `records`, keeping the order the server sent.
pub fn render_results(records: Vec<InventoryRecord>) -> RenderedList {
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| ResultRow::new(index, record))
        .collect();

    RenderedList {
        table: ResultTable {
            headers: RESULT_COLUMNS.iter().map(|column| column.label()).collect(),
            rows,
        },
        first: records.into_iter().next(),
    }
}
