//! Schema-checked reading of raw delimited tables
//!
//! Raw source files are read once per assembly. Their header is checked
//! against the columns a source needs before any row is decoded, so a wrong
//! file fails with the name of the missing column instead of a row error.

use super::{SourceError, SourceResult};
use flate2::read::MultiGzDecoder;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Layout of one raw table
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Source name used in errors and logs
    pub source: &'static str,
    /// Field delimiter
    pub delimiter: u8,
    /// Columns that must be present in the header
    pub required: &'static [&'static str],
}

/// Open a raw file, transparently decompressing `.gz` files
pub fn open(path: &Path) -> SourceResult<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Decode every row of a table into `T`, after checking its header.
pub fn read_records<T, R>(reader: R, spec: &TableSpec) -> SourceResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(spec.delimiter)
        .has_headers(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in spec.required {
        if !headers.iter().any(|h| h == *column) {
            return Err(SourceError::MissingColumn {
                source_name: spec.source,
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<T>().enumerate() {
        let record = result.map_err(|e| SourceError::Malformed {
            source_name: spec.source,
            // header is line 1
            line: row as u64 + 2,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    debug!(source = spec.source, rows = records.len(), "Read raw table");
    Ok(records)
}

/// Read a table from a file on disk
pub fn read_file<T: DeserializeOwned>(path: &Path, spec: &TableSpec) -> SourceResult<Vec<T>> {
    read_records(open(path)?, spec)
}

/// Parse a boolean-like cell: `1`/`0`, `true`/`false`, `t`/`f`, `yes`/`no`.
/// An empty cell is false.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Some(true),
        "0" | "false" | "f" | "no" | "" => Some(false),
        _ => None,
    }
}

pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid flag value '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        a: String,
        #[serde(deserialize_with = "deserialize_flag")]
        flag: bool,
    }

    const SPEC: TableSpec = TableSpec {
        source: "test",
        delimiter: b'\t',
        required: &["a", "flag"],
    };

    #[test]
    fn test_reads_rows_and_ignores_extra_columns() {
        let raw = "a\tflag\textra\nEGFR\t1\tx\nKRAS\tFalse\ty\n";
        let rows: Vec<Row> = read_records(raw.as_bytes(), &SPEC).unwrap();
        assert_eq!(
            rows,
            vec![
                Row { a: "EGFR".into(), flag: true },
                Row { a: "KRAS".into(), flag: false }
            ]
        );
    }

    #[test]
    fn test_missing_column_is_reported() {
        let raw = "a\tother\nEGFR\t1\n";
        let err = read_records::<Row, _>(raw.as_bytes(), &SPEC).unwrap_err();
        match err {
            SourceError::MissingColumn { column, .. } => assert_eq!(column, "flag"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_value_reports_line() {
        let raw = "a\tflag\nEGFR\t1\nKRAS\tmaybe\n";
        let err = read_records::<Row, _>(raw.as_bytes(), &SPEC).unwrap_err();
        match err {
            SourceError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_file::<Row>(Path::new("/definitely/not/here.tsv"), &SPEC).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
