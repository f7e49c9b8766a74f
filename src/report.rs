use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::readers::{detect_format, read_table};
use crate::types::{FileFormat, Result, Table};

/// Report format version
const REPORT_VERSION: &str = "1.0.0";

/// How often one value occurs in a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequency table of one column's non-empty values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDistribution {
    pub name: String,

    /// Number of non-empty values
    pub total: usize,

    /// Number of distinct non-empty values
    pub distinct: usize,

    /// Values by descending frequency; ties keep first-seen order
    pub values: Vec<ValueCount>,
}

impl ColumnDistribution {
    /// Count the non-empty values of a column, keeping at most `top`
    pub fn from_values<I, S>(name: &str, values: I, top: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            match counts.get_mut(value) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(value.to_string(), 1);
                    order.push(value.to_string());
                }
            }
        }

        let total: usize = counts.values().sum();
        let distinct = order.len();
        let mut values: Vec<ValueCount> = order
            .into_iter()
            .map(|value| {
                let count = counts.get(&value).copied().unwrap_or_default();
                ValueCount { value, count }
            })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(top) = top {
            values.truncate(top);
        }

        Self {
            name: name.to_string(),
            total,
            distinct,
            values,
        }
    }
}

/// Value distributions of selected columns of one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Report version
    pub version: String,

    /// File name (without path)
    pub file_name: String,

    /// File hash (SHA-256)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,

    pub format: FileFormat,

    /// Generation time, UTC
    pub generated_at: String,

    pub row_count: usize,

    pub columns: Vec<ColumnDistribution>,

    /// Requested columns that the file does not have
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DistributionReport {
    /// Build a report over an in-memory table
    pub fn from_table(
        file_name: String,
        format: FileFormat,
        table: &Table,
        columns: &[String],
        top: Option<usize>,
    ) -> Self {
        let mut report = Self {
            version: REPORT_VERSION.to_string(),
            file_name,
            file_hash: None,
            format,
            generated_at: chrono::Utc::now()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            row_count: table.len(),
            columns: Vec::new(),
            warnings: Vec::new(),
        };

        for name in columns {
            match table.column(name) {
                Some(values) => report
                    .columns
                    .push(ColumnDistribution::from_values(name, values, top)),
                None => report
                    .warnings
                    .push(format!("Column '{}' not found", name)),
            }
        }
        report
    }
}

/// Read a file and report the distributions of `columns`
pub fn analyze_file(
    path: &Path,
    columns: &[String],
    top: Option<usize>,
    hash_file: bool,
) -> Result<DistributionReport> {
    let format = detect_format(path)?;
    let table = read_table(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut report = DistributionReport::from_table(file_name, format, &table, columns, top);
    if hash_file {
        report.file_hash = Some(compute_file_hash(path)?);
    }
    for warning in &report.warnings {
        log::warn!("{}", warning);
    }
    Ok(report)
}

/// Compute SHA-256 hash of a file (streaming to handle large files)
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
