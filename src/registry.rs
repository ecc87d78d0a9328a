// Player registry: canonical records, JSON loading, and the lookup index.
//
// Registry files come from different exporters that disagree on field
// names, so each logical field is resolved through an explicit ordered
// alias list. Records that carry no identifier are skipped; that is a
// data-shape policy, not an error.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::normalize;

// ---------------------------------------------------------------------------
// Field aliases
// ---------------------------------------------------------------------------

/// Accepted keys per logical field, in resolution order. The first key
/// present with a non-empty value wins.
const ID_ALIASES: &[&str] = &["personId", "id", "playerId", "player_id", "nba_id"];
const FIRST_NAME_ALIASES: &[&str] = &["firstName", "first_name"];
const LAST_NAME_ALIASES: &[&str] = &["lastName", "last_name"];
const FULL_NAME_ALIASES: &[&str] = &["fullName", "full_name", "displayName", "name"];

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// A registry entry in canonical shape. `full_name` falls back to
/// `"{first} {last}"` when the source carries no full-name field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in registry file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("registry file {path} contains no usable player records")]
    Empty { path: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Resolve a string-or-number field through an ordered alias list.
fn field_string(map: &serde_json::Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        match map.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Convert one raw JSON record to canonical shape. Returns `None` when the
/// record is not an object or carries no identifier under any alias.
fn record_from_value(value: &Value) -> Option<PlayerRecord> {
    let map = value.as_object()?;
    let id = field_string(map, ID_ALIASES)?;
    let first_name = field_string(map, FIRST_NAME_ALIASES).unwrap_or_default();
    let last_name = field_string(map, LAST_NAME_ALIASES).unwrap_or_default();
    let full_name = field_string(map, FULL_NAME_ALIASES)
        .unwrap_or_else(|| format!("{first_name} {last_name}").trim().to_string());
    Some(PlayerRecord {
        id,
        first_name,
        last_name,
        full_name,
    })
}

/// Extract records from a parsed registry document. Accepts either a
/// top-level array of records or an object whose values are records.
fn records_from_json(root: &Value) -> Vec<PlayerRecord> {
    let raw: Vec<&Value> = match root {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for value in raw {
        match record_from_value(value) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("skipped {skipped} registry records without an identifier");
    }
    records
}

fn load_registry_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, serde_json::Error> {
    let root: Value = serde_json::from_reader(rdr)?;
    Ok(records_from_json(&root))
}

/// Load the registry from a JSON file. An unreadable or empty registry is
/// fatal to the batch; individually malformed records are not.
pub fn load_registry(path: &Path) -> Result<Vec<PlayerRecord>, RegistryError> {
    let file = std::fs::File::open(path).map_err(|e| RegistryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let records =
        load_registry_from_reader(std::io::BufReader::new(file)).map_err(|source| {
            RegistryError::Json {
                path: path.display().to_string(),
                source,
            }
        })?;
    if records.is_empty() {
        return Err(RegistryError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Identifier ordering
// ---------------------------------------------------------------------------

/// Whether id `a` orders before id `b`: numeric when both parse as
/// integers, lexicographic otherwise. Used wherever two records compete
/// for the same key, so outcomes never depend on registry iteration order.
pub(crate) fn id_precedes(a: &str, b: &str) -> bool {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x < y,
        _ => a < b,
    }
}

// ---------------------------------------------------------------------------
// RegistryIndex
// ---------------------------------------------------------------------------

/// One entry of a last-name or initial+last group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub norm_full: String,
}

/// Read-only lookup structures over the registry, built once per batch and
/// shared by reference across every resolution call.
#[derive(Debug, Default)]
pub struct RegistryIndex {
    /// Normalized full name -> id. Collisions keep the lowest id.
    exact: HashMap<String, String>,
    /// Normalized last name -> candidates in registry iteration order.
    by_last: HashMap<String, Vec<Candidate>>,
    /// "{first-initial} {last}" -> candidates in registry iteration order.
    by_initial_last: HashMap<String, Vec<Candidate>>,
}

impl RegistryIndex {
    /// Build the index from canonical records.
    pub fn build(records: &[PlayerRecord]) -> Self {
        let mut index = RegistryIndex::default();

        for record in records {
            let norm_full = normalize(&record.full_name);

            let norm_last = {
                let n = normalize(&record.last_name);
                if n.is_empty() {
                    norm_full
                        .split_whitespace()
                        .last()
                        .unwrap_or_default()
                        .to_string()
                } else {
                    n
                }
            };

            // The full-name fallback applies only when no first name exists
            // at all; a first name that normalizes away yields no initial.
            let first_initial = if record.first_name.trim().is_empty() {
                norm_full.chars().next()
            } else {
                normalize(&record.first_name).chars().next()
            };

            if !norm_full.is_empty() {
                match index.exact.entry(norm_full.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(record.id.clone());
                    }
                    Entry::Occupied(mut slot) => {
                        if slot.get() != &record.id {
                            warn!(
                                "registry homonym: '{}' carried by ids {} and {}, keeping the lowest",
                                norm_full,
                                slot.get(),
                                record.id
                            );
                            if id_precedes(&record.id, slot.get()) {
                                slot.insert(record.id.clone());
                            }
                        }
                    }
                }
            }

            if !norm_last.is_empty() {
                let candidate = Candidate {
                    id: record.id.clone(),
                    norm_full: norm_full.clone(),
                };
                index
                    .by_last
                    .entry(norm_last.clone())
                    .or_default()
                    .push(candidate.clone());

                if let Some(initial) = first_initial {
                    index
                        .by_initial_last
                        .entry(format!("{initial} {norm_last}"))
                        .or_default()
                        .push(candidate);
                }
            }
        }

        index
    }

    /// Exact lookup by normalized full name.
    pub fn exact_id(&self, norm_full: &str) -> Option<&str> {
        self.exact.get(norm_full).map(String::as_str)
    }

    /// All candidates sharing a normalized last name.
    pub fn last_name_candidates(&self, norm_last: &str) -> Option<&[Candidate]> {
        self.by_last.get(norm_last).map(Vec::as_slice)
    }

    /// All candidates under a "{first-initial} {last}" key.
    pub fn initial_last_candidates(&self, key: &str) -> Option<&[Candidate]> {
        self.by_initial_last.get(key).map(Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, first: &str, last: &str, full: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            full_name: full.into(),
        }
    }

    // -- Loading and alias resolution --

    #[test]
    fn loads_array_of_records() {
        let json = r#"[
            {"personId": 2544, "firstName": "LeBron", "lastName": "James"},
            {"id": "7", "first_name": "Luka", "last_name": "Doncic", "fullName": "Luka Doncic"}
        ]"#;
        let records = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "2544");
        assert_eq!(records[0].full_name, "LeBron James");
        assert_eq!(records[1].id, "7");
        assert_eq!(records[1].full_name, "Luka Doncic");
    }

    #[test]
    fn loads_object_of_records() {
        let json = r#"{
            "a": {"nba_id": 10, "first_name": "Stephen", "last_name": "Curry"},
            "b": {"nba_id": 11, "first_name": "Seth", "last_name": "Curry"}
        }"#;
        let records = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(records.len(), 2);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"10"));
        assert!(ids.contains(&"11"));
    }

    #[test]
    fn earlier_alias_wins() {
        let json = r#"[{"personId": 1, "playerId": 2, "name": "Somebody"}]"#;
        let records = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn records_without_id_are_skipped() {
        let json = r#"[
            {"firstName": "No", "lastName": "Id"},
            {"personId": null, "name": "Null Id"},
            {"personId": "", "name": "Empty Id"},
            {"personId": 5, "name": "Kept"}
        ]"#;
        let records = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "5");
    }

    #[test]
    fn full_name_falls_back_to_first_and_last() {
        let json = r#"[{"id": 3, "firstName": "Trae", "lastName": "Young"}]"#;
        let records = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(records[0].full_name, "Trae Young");
    }

    #[test]
    fn canonical_snapshot_shape_round_trips() {
        let original = vec![record("12", "Jalen", "Brunson", "Jalen Brunson")];
        let json = serde_json::to_string(&original).unwrap();
        let reloaded = load_registry_from_reader(json.as_bytes()).expect("should parse");
        assert_eq!(reloaded, original);
    }

    #[test]
    fn load_registry_rejects_empty_files() {
        let dir = std::env::temp_dir().join("rosterlink_registry_empty");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.json");
        std::fs::write(&path, "[]").unwrap();

        let err = load_registry(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Empty { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    // -- Identifier ordering --

    #[test]
    fn id_ordering_is_numeric_when_possible() {
        assert!(id_precedes("4", "30"));
        assert!(!id_precedes("30", "4"));
        assert!(id_precedes("abc", "abd"));
    }

    // -- Index construction --

    #[test]
    fn indexes_exact_last_and_initial_keys() {
        let records = vec![
            record("10", "Stephen", "Curry", "Stephen Curry"),
            record("11", "Seth", "Curry", "Seth Curry"),
        ];
        let index = RegistryIndex::build(&records);

        assert_eq!(index.exact_id("stephen curry"), Some("10"));
        assert_eq!(index.exact_id("seth curry"), Some("11"));

        let group = index.last_name_candidates("curry").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].id, "10");
        assert_eq!(group[1].id, "11");

        let initials = index.initial_last_candidates("s curry").unwrap();
        assert_eq!(initials.len(), 2);
    }

    #[test]
    fn exact_collision_keeps_lowest_id_regardless_of_order() {
        let a = record("30", "John", "Smith", "John Smith");
        let b = record("4", "John", "Smith", "John Smith");

        let forward = RegistryIndex::build(&[a.clone(), b.clone()]);
        let backward = RegistryIndex::build(&[b, a]);

        assert_eq!(forward.exact_id("john smith"), Some("4"));
        assert_eq!(backward.exact_id("john smith"), Some("4"));
    }

    #[test]
    fn last_name_falls_back_to_final_full_name_token() {
        let records = vec![record("8", "Zion", "", "Zion Williamson")];
        let index = RegistryIndex::build(&records);
        let group = index.last_name_candidates("williamson").unwrap();
        assert_eq!(group[0].id, "8");
    }

    #[test]
    fn initial_falls_back_to_full_name_when_first_is_absent() {
        let records = vec![record("9", "", "", "Giannis Antetokounmpo")];
        let index = RegistryIndex::build(&records);
        let group = index.initial_last_candidates("g antetokounmpo").unwrap();
        assert_eq!(group[0].id, "9");
    }

    #[test]
    fn record_with_no_names_produces_no_index_entries() {
        let records = vec![record("77", "", "", "")];
        let index = RegistryIndex::build(&records);
        assert_eq!(index.exact_id(""), None);
        assert!(index.last_name_candidates("").is_none());
    }
}
