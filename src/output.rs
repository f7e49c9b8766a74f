use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::types::{Result, Table};

/// Write a table as CSV: header row, then records in order
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for record in &table.records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a serializable value to a pretty-printed JSON file
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Serialize a value to a pretty-printed JSON string
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a value as JSON to stdout
pub fn write_json_stdout<T: Serialize>(value: &T) -> Result<()> {
    let json = to_json_string(value)?;
    write_stdout(&json)
}

/// Write text to a file, or to stdout when no path is given
pub fn write_text(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            Ok(())
        }
        None => write_stdout(content),
    }
}

fn write_stdout(content: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", content)?;
    Ok(())
}
