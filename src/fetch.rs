// Registry retrieval from the stats API.
//
// The player index endpoint returns tabular JSON: `resultSets[0]` carries a
// `headers` array of column labels and a `rowSet` array of rows. Rows are
// mapped to canonical `PlayerRecord`s by column name, then saved as the
// snapshot the registry loader reads back.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::FetchConfig;
use crate::registry::PlayerRecord;

const PLAYER_INDEX_URL: &str = "https://stats.nba.com/stats/playerindex";

/// The stats API rejects requests that don't look like they come from the
/// league's own site.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("player index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("player index response carries no result sets")]
    MalformedResponse,

    #[error("player index response missing column {0}")]
    MissingColumn(&'static str),

    #[error("failed to encode registry snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write registry snapshot {path}: {source}")]
    Save {
        path: String,
        source: std::io::Error,
    },
}

/// Fetch the full player index for the configured season.
pub async fn fetch_registry(cfg: &FetchConfig) -> Result<Vec<PlayerRecord>, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;

    let response = client
        .get(PLAYER_INDEX_URL)
        .query(&[
            ("LeagueID", "00"),
            ("Season", cfg.season.as_str()),
            ("SeasonType", "Preseason"),
            ("Historical", "1"),
            ("TeamID", "0"),
        ])
        .header("User-Agent", USER_AGENT)
        .header("Referer", "https://www.nba.com/")
        .header("Origin", "https://www.nba.com")
        .header("Accept", "*/*")
        .send()
        .await?
        .error_for_status()?;

    let body: Value = response.json().await?;
    let records = parse_player_index(&body)?;
    info!("retrieved {} players from the stats API", records.len());
    Ok(records)
}

/// Map the tabular `resultSets` payload to canonical records. Rows without
/// a person id are dropped.
pub fn parse_player_index(body: &Value) -> Result<Vec<PlayerRecord>, FetchError> {
    let result_set = body
        .get("resultSets")
        .and_then(|v| v.get(0))
        .ok_or(FetchError::MalformedResponse)?;
    let headers = result_set
        .get("headers")
        .and_then(Value::as_array)
        .ok_or(FetchError::MalformedResponse)?;
    let rows = result_set
        .get("rowSet")
        .and_then(Value::as_array)
        .ok_or(FetchError::MalformedResponse)?;

    let column = |name: &'static str| -> Result<usize, FetchError> {
        headers
            .iter()
            .position(|h| h.as_str() == Some(name))
            .ok_or(FetchError::MissingColumn(name))
    };
    let id_col = column("PERSON_ID")?;
    let first_col = column("PLAYER_FIRST_NAME")?;
    let last_col = column("PLAYER_LAST_NAME")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(cells) = row.as_array() else {
            continue;
        };
        let id = match cells.get(id_col) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => continue,
        };
        let first_name = cell_string(cells, first_col);
        let last_name = cell_string(cells, last_col);
        let full_name = format!("{first_name} {last_name}").trim().to_string();
        records.push(PlayerRecord {
            id,
            first_name,
            last_name,
            full_name,
        });
    }
    Ok(records)
}

fn cell_string(cells: &[Value], idx: usize) -> String {
    cells
        .get(idx)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Write the snapshot the registry loader reads back.
pub fn save_registry(path: &Path, records: &[PlayerRecord]) -> Result<(), FetchError> {
    let json = serde_json::to_string(records)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FetchError::Save {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, json).map_err(|e| FetchError::Save {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(
        "saved registry snapshot ({} records) to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
