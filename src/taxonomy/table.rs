//! Taxonomy table reader.
//!
//! The table is CSV with a header line. Lines beginning with `/` (the
//! `/* ... */` banners) are comments, blank lines are ignored, and quoted
//! fields have their quotes stripped. Only the `id` column is required;
//! other columns are kept as named fields.

use std::collections::BTreeMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{AtlasError, Result};

/// One data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Dotted path, e.g. `CostumedPlay.Performance.DragQueens`.
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

/// Parse table text. Rows with a missing or empty `id` are skipped with a
/// warning, as are rows the reader cannot decode. Fails only when there is
/// no header with an `id` column or no usable row at all.
pub fn parse_table(text: &str) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .comment(Some(b'/'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers().map_err(AtlasError::Table)?.clone();
    let id_col = header
        .iter()
        .position(|h| h.eq_ignore_ascii_case("id"))
        .ok_or(AtlasError::EmptyTable)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("taxonomy row unreadable, skipped: {}", e);
                skipped += 1;
                continue;
            }
        };
        match row_from_record(&header, id_col, &record) {
            Some(row) => rows.push(row),
            None => {
                let line = record.position().map_or(0, |p| p.line());
                log::warn!("taxonomy line {}: missing id, row skipped", line);
                skipped += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(AtlasError::EmptyTable);
    }
    log::debug!("taxonomy table: {} rows, {} skipped", rows.len(), skipped);
    Ok(rows)
}

fn row_from_record(header: &StringRecord, id_col: usize, record: &StringRecord) -> Option<Row> {
    let id = record.get(id_col).filter(|id| !id.is_empty())?;
    let fields = header
        .iter()
        .zip(record.iter())
        .enumerate()
        .filter(|(i, _)| *i != id_col)
        .map(|(_, (h, v))| (h.to_string(), v.to_string()))
        .collect();
    Some(Row {
        id: id.to_string(),
        fields,
    })
}
