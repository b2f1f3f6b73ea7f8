//! Load record sets from delimited text

use super::RecordSet;
use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use std::path::Path;

fn read_records<R: std::io::Read>(reader: R) -> Result<RecordSet> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        // Fully blank lines carry no data
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RecordSet::new(headers, rows))
}

impl RecordSet {
    /// Load from any reader (e.g., string buffer, request body)
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        read_records(reader)
    }

    /// Load from a CSV file on disk
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        read_records(file)
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        read_records(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_str() {
        let set = RecordSet::from_csv_str(
            "accidentYear, dev ,paid\n2018,12,100\n\n2018,24, 50\n2019,12\n",
        )
        .expect("Failed to parse CSV");

        assert_eq!(set.headers, vec!["accidentYear", "dev", "paid"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.cell(1, 2), "50");
        // Ragged row padded with blank
        assert_eq!(set.cell(2, 2), "");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RecordSet::from_csv_path("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, crate::error::TriangleError::Io(_)));
    }
}
