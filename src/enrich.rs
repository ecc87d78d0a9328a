// Table enrichment: locate the name column, resolve every row against the
// shared index, and fill the player id column.

use std::path::Path;

use tracing::{info, warn};

use crate::registry::RegistryIndex;
use crate::resolve::resolve;
use crate::table::{RosterTable, TableError};

/// Column that receives the resolved identifier. Empty string marks an
/// unresolved row.
pub const ID_COLUMN: &str = "nba_player_id";

/// Header labels accepted verbatim before the substring fallback kicks in.
const NAME_COLUMN_CANDIDATES: &[&str] = &[
    "player",
    "player_name",
    "playername",
    "name",
    "playerName",
    "PLAYER_NAME",
    "Player",
    "PLAYER",
];

/// Per-table resolution counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub updated: usize,
    pub total: usize,
}

/// Locate the column holding player names: an exact match against the known
/// labels wins, otherwise the first header containing "player" or "name"
/// case-insensitively.
pub fn find_name_column(headers: &[String]) -> Option<usize> {
    if let Some(idx) = headers
        .iter()
        .position(|h| NAME_COLUMN_CANDIDATES.contains(&h.as_str()))
    {
        return Some(idx);
    }
    headers.iter().position(|h| {
        let low = h.to_lowercase();
        low.contains("player") || low.contains("name")
    })
}

/// Resolve every row of `table` and write the id column in place.
///
/// The id column is appended at the end when absent; when already present
/// its position is preserved and its values are overwritten. A table with
/// no recognizable name column is left untouched and reported as fully
/// unresolved. Rows are independent: a row that fails to resolve gets the
/// empty sentinel and processing continues.
pub fn enrich_table(table: &mut RosterTable, index: &RegistryIndex) -> EnrichSummary {
    let total = table.rows.len();

    let Some(name_idx) = find_name_column(&table.headers) else {
        warn!(
            "no name column among {:?}; leaving table unresolved",
            table.headers
        );
        return EnrichSummary { updated: 0, total };
    };

    let id_idx = match table.headers.iter().position(|h| h == ID_COLUMN) {
        Some(idx) => idx,
        None => {
            table.headers.push(ID_COLUMN.to_string());
            table.headers.len() - 1
        }
    };
    let width = table.headers.len();

    let mut updated = 0;
    for row in &mut table.rows {
        if row.len() < width {
            row.resize(width, String::new());
        }
        let raw_name = row[name_idx].clone();
        match resolve(&raw_name, index) {
            Some(id) => {
                row[id_idx] = id;
                updated += 1;
            }
            None => row[id_idx] = String::new(),
        }
    }

    EnrichSummary { updated, total }
}

/// Enrich one CSV file in place. Files with no data rows are left as-is.
pub fn enrich_file(path: &Path, index: &RegistryIndex) -> Result<EnrichSummary, TableError> {
    let mut table = RosterTable::from_path(path)?;
    if table.rows.is_empty() {
        return Ok(EnrichSummary::default());
    }

    let summary = enrich_table(&mut table, index);
    table.save(path)?;

    info!(
        "processed {}: updated {}/{}",
        path.display(),
        summary.updated,
        summary.total
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
