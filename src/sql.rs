//! Rendering tables as SQL `INSERT` statements for seed data.

use crate::types::{Record, Table};

/// One `INSERT` statement per record, in file order
pub fn insert_statements(table: &Table, table_name: &str) -> Vec<String> {
    let columns = table.headers.join(", ");
    table
        .records
        .iter()
        .map(|record| {
            format!(
                "INSERT INTO {} ({}) VALUES ({});",
                table_name,
                columns,
                sql_values(record)
            )
        })
        .collect()
}

/// Full script: two comment lines naming the source and row count, a blank
/// line, then the statements
pub fn render_script(table: &Table, table_name: &str, source_name: &str) -> String {
    let statements = insert_statements(table, table_name);
    format!(
        "-- Auto-generated INSERT statements from {}\n-- Converted {} rows\n\n{}",
        source_name,
        statements.len(),
        statements.join("\n")
    )
}

fn sql_values(record: &Record) -> String {
    record
        .values()
        .map(sql_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote a value as a SQL string literal; empty values become `NULL`
pub fn sql_literal(value: &str) -> String {
    if value.is_empty() {
        "NULL".to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}
