use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder};

use crate::error::Error;
use crate::types::{Result, Table};

use super::TabularReader;

const UTF8_BOM: char = '\u{feff}';

/// CSV/TSV file reader
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    /// Create a new CSV reader
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b',',
        })
    }

    /// Create a new TSV reader
    pub fn new_tsv(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b'\t',
        })
    }

    fn create_reader(&self) -> Result<Reader<BufReader<File>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Ok(csv_reader)
    }
}

impl TabularReader for CsvReader {
    fn read_table(&mut self) -> Result<Table> {
        let mut reader = self.create_reader()?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::MissingHeader(self.path.clone()));
        }

        let mut table = Table::new(headers);
        for result in reader.records() {
            let record = result?;
            table.push_row(record.iter());
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_basic_csv_read() {
        let file = create_test_file(
            ".csv",
            "Full Name,Bio\nJane Carter,\"Led growth, then sales\"\nOmar Haddad,\n",
        );
        let table = CsvReader::new(file.path()).unwrap().read_table().unwrap();

        assert_eq!(table.headers, vec!["Full Name", "Bio"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("Bio"), Some("Led growth, then sales"));
        assert_eq!(table.records[1].get("Bio"), Some(""));
    }

    #[test]
    fn test_bom_is_stripped() {
        let file = create_test_file(".csv", "\u{feff}Name,Stage\nAcme,Seed\n");
        let table = CsvReader::new(file.path()).unwrap().read_table().unwrap();
        assert_eq!(table.headers[0], "Name");
        assert_eq!(table.records[0].get("Name"), Some("Acme"));
    }

    #[test]
    fn test_tsv_read() {
        let file = create_test_file(".tsv", "Name\tStage\nAcme, Inc.\tSeed\n");
        let table = CsvReader::new_tsv(file.path()).unwrap().read_table().unwrap();
        assert_eq!(table.records[0].get("Name"), Some("Acme, Inc."));
    }

    #[test]
    fn test_ragged_rows() {
        let file = create_test_file(".csv", "a,b,c\n1\n1,2,3,4\n");
        let table = CsvReader::new(file.path()).unwrap().read_table().unwrap();
        assert_eq!(table.records[0].get("c"), Some(""));
        assert_eq!(table.records[1].values().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let file = create_test_file(".csv", "");
        let result = CsvReader::new(file.path()).unwrap().read_table();
        assert!(matches!(result, Err(Error::MissingHeader(_))));
    }
}
