//! Resource loading
//!
//! Parses the JSON resource into three word lists. The resource is a
//! single object with Danish key names, each an array of string rows
//! where the first row is the column headers:
//!
//! ```json
//! { "verber": [["Dansk", "Engelsk"], ["at løbe", "to run"]], ... }
//! ```
//!
//! Any structural problem is fatal: malformed JSON, a missing key, a
//! list without a header row, or a row whose cell count differs from
//! the header. No partial output is ever produced from a bad resource.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Raw shape of the JSON document, keyed exactly as on disk.
#[derive(Debug, Deserialize)]
struct RawResource {
    verber: Vec<Vec<String>>,
    substantiver: Vec<Vec<String>>,
    adjektiver: Vec<Vec<String>>,
}

/// A named table of string rows. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct WordList {
    pub name: String,
    /// Column titles; every data row has exactly this many cells.
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WordList {
    /// Split raw rows into header + data and check the cell counts.
    pub fn new(name: &str, mut raw: Vec<Vec<String>>) -> Result<Self> {
        if raw.is_empty() {
            bail!("word list '{name}' has no header row");
        }
        let header = raw.remove(0);
        if header.is_empty() {
            bail!("word list '{name}' has an empty header row");
        }
        for (index, row) in raw.iter().enumerate() {
            if row.len() != header.len() {
                bail!(
                    "word list '{name}' row {} has {} cells, header has {}",
                    index + 1,
                    row.len(),
                    header.len()
                );
            }
        }
        Ok(WordList {
            name: name.to_string(),
            header,
            rows: raw,
        })
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The three word lists of one resource file.
#[derive(Debug, Clone)]
pub struct DataResource {
    pub verbs: WordList,
    pub nouns: WordList,
    pub adjectives: WordList,
}

impl DataResource {
    /// Parse and validate a JSON byte buffer.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawResource =
            serde_json::from_slice(bytes).context("malformed word list resource")?;
        Ok(DataResource {
            verbs: WordList::new("verber", raw.verber)?,
            nouns: WordList::new("substantiver", raw.substantiver)?,
            adjectives: WordList::new("adjektiver", raw.adjektiver)?,
        })
    }

    /// Read the resource file into memory and parse it.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("reading resource file {}", path.display()))?;
        Self::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "verber": [
            ["Dansk", "Engelsk", "Eksempel"],
            ["at løbe", "to run", "Jeg <b>løber</b> hver dag"],
            ["at spise", "to eat", "Vi spiser klokken seks"]
        ],
        "substantiver": [
            ["Dansk", "Engelsk"],
            ["en hund", "a dog"],
            ["et hus", "a house"],
            ["en bog", "a book"]
        ],
        "adjektiver": [
            ["Dansk", "Engelsk"],
            ["stor", "big"]
        ]
    }"#;

    #[test]
    fn sample_round_trips_with_matching_counts() {
        let resource = DataResource::from_slice(SAMPLE.as_bytes()).unwrap();

        assert_eq!(resource.verbs.column_count(), 3);
        assert_eq!(resource.verbs.data_row_count(), 2);
        assert_eq!(resource.verbs.header, vec!["Dansk", "Engelsk", "Eksempel"]);

        assert_eq!(resource.nouns.data_row_count(), 3);
        assert_eq!(resource.adjectives.data_row_count(), 1);
        assert_eq!(resource.adjectives.rows[0], vec!["stor", "big"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DataResource::from_slice(b"{ not json").is_err());
    }

    #[test]
    fn missing_key_is_an_error() {
        let json = r#"{ "verber": [["a"]], "substantiver": [["b"]] }"#;
        assert!(DataResource::from_slice(json.as_bytes()).is_err());
    }

    #[test]
    fn ragged_row_is_an_error() {
        let json = r#"{
            "verber": [["Dansk", "Engelsk"], ["kun en celle"]],
            "substantiver": [["a"]],
            "adjektiver": [["a"]]
        }"#;
        let err = DataResource::from_slice(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("verber"));
    }

    #[test]
    fn header_only_list_is_valid_and_empty() {
        let list = WordList::new("tom", vec![vec!["A".into(), "B".into()]]).unwrap();
        assert_eq!(list.data_row_count(), 0);
        assert_eq!(list.column_count(), 2);
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(WordList::new("tom", vec![]).is_err());
    }
}
