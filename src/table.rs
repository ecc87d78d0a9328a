// Roster table CSV I/O.
//
// Tables are scraped from assorted sources, so the reader is flexible
// about ragged rows; the enricher pads rows before writing anything back.

use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// One roster table: column labels plus rows of cell values, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RosterTable { headers, rows })
    }

    /// Load a table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(file).map_err(|source| TableError::Csv {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn write_to<W: Write>(&self, wtr: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(wtr);
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table back to a CSV file, replacing its contents.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let file = std::fs::File::create(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.write_to(file).map_err(|source| TableError::Csv {
            path: path.display().to_string(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_rows() {
        let csv_data = "\
Year,Player,Pick
2003,LeBron James,1
2009,Stephen Curry,7";

        let table = RosterTable::from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Year", "Player", "Pick"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["2003", "LeBron James", "1"]);
    }

    #[test]
    fn tolerates_ragged_rows() {
        let csv_data = "\
Year,Player,Pick
2003,LeBron James
2009,Stephen Curry,7,extra";

        let table = RosterTable::from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = RosterTable::from_reader("".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn write_round_trips() {
        let table = RosterTable {
            headers: vec!["Player".into(), "Team".into()],
            rows: vec![
                vec!["Luka Doncic".into(), "DAL".into()],
                vec!["Trae Young".into(), "ATL".into()],
            ],
        };

        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let reloaded = RosterTable::from_reader(buf.as_slice()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn preserves_cells_containing_commas() {
        let table = RosterTable {
            headers: vec!["Player".into()],
            rows: vec![vec!["James, LeBron".into()]],
        };

        let mut buf = Vec::new();
        table.write_to(&mut buf).unwrap();
        let reloaded = RosterTable::from_reader(buf.as_slice()).unwrap();
        assert_eq!(reloaded, table);
    }
}
