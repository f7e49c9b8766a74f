pub mod csv;

use std::path::Path;

use crate::error::Error;
use crate::types::{FileFormat, Result, Table};

/// Common trait for delimited table readers
pub trait TabularReader {
    /// Read the whole file into memory, header first
    fn read_table(&mut self) -> Result<Table>;
}

/// Determine the file format from a path's extension
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    FileFormat::from_extension(ext)
        .ok_or_else(|| Error::UnsupportedFormat(format!("Unsupported file extension: .{}", ext)))
}

/// Create a reader for the given file path
pub fn create_reader(path: &Path) -> Result<Box<dyn TabularReader>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    match detect_format(path)? {
        FileFormat::Csv => Ok(Box::new(csv::CsvReader::new(path)?)),
        FileFormat::Tsv => Ok(Box::new(csv::CsvReader::new_tsv(path)?)),
    }
}

/// Read a table from a CSV or TSV file
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = create_reader(path)?;
    let table = reader.read_table()?;
    log::debug!(
        "read {} records with {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}
