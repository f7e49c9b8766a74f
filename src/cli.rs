use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{AnonymizeOptions, Profile};

/// Redact and pseudonymize identifying information in tabular records
#[derive(Parser, Debug)]
#[command(name = "record-anonymizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a CSV/TSV file
    Anonymize {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file path
        #[arg(short, long)]
        output: PathBuf,

        /// Column layout of the input
        #[arg(short, long, value_enum, default_value_t = Profile::Mentors)]
        profile: Profile,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file of extra known entities, merged over the built-in table
        #[arg(long)]
        entities: Option<PathBuf>,

        /// Free-text column to redact (repeatable; replaces the profile's list)
        #[arg(long = "text", value_name = "COLUMN")]
        text_columns: Vec<String>,

        /// Categorical column to shuffle (repeatable; replaces the profile's list)
        #[arg(long = "shuffle", value_name = "COLUMN")]
        shuffle_columns: Vec<String>,
    },

    /// Report value distributions of selected columns
    Analyze {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Column to report (repeatable)
        #[arg(short, long = "column", value_name = "COLUMN", required = true)]
        columns: Vec<String>,

        /// Keep only the N most frequent values per column
        #[arg(long)]
        top: Option<usize>,

        /// Output JSON file path (stdout if not specified)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the SHA-256 file hash
        #[arg(long)]
        no_hash: bool,
    },

    /// Convert a CSV/TSV file to SQL INSERT statements
    ToSql {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Table to insert into
        #[arg(short, long)]
        table: String,

        /// Output SQL file path (stdout if not specified)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Build run options from `anonymize` flags. Empty column lists keep the
/// profile's defaults.
pub fn anonymize_options(
    profile: Profile,
    seed: Option<u64>,
    entities: Option<PathBuf>,
    text_columns: Vec<String>,
    shuffle_columns: Vec<String>,
) -> AnonymizeOptions {
    AnonymizeOptions {
        profile,
        text_columns: (!text_columns.is_empty()).then_some(text_columns),
        shuffle_columns: (!shuffle_columns.is_empty()).then_some(shuffle_columns),
        seed,
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_anonymize() {
        let cli = Cli::parse_from([
            "record-anonymizer",
            "anonymize",
            "--input",
            "in.csv",
            "--output",
            "out.csv",
            "--profile",
            "portfolio",
            "--seed",
            "7",
            "--shuffle",
            "Stage",
            "--shuffle",
            "Industry",
        ]);
        let Commands::Anonymize {
            profile,
            seed,
            text_columns,
            shuffle_columns,
            ..
        } = cli.command
        else {
            panic!("expected anonymize");
        };
        assert_eq!(profile, Profile::Portfolio);
        assert_eq!(seed, Some(7));

        let options = anonymize_options(profile, seed, None, text_columns, shuffle_columns);
        let roles = options.column_roles();
        assert_eq!(roles.text, vec!["Description".to_string()]);
        assert_eq!(roles.shuffled, vec!["Stage".to_string(), "Industry".to_string()]);
    }

    #[test]
    fn test_parse_analyze_hash_toggle() {
        let cli = Cli::parse_from(["record-anonymizer", "analyze", "-i", "p.csv", "-c", "Stage"]);
        assert!(matches!(cli.command, Commands::Analyze { no_hash: false, .. }));

        let cli = Cli::parse_from([
            "record-anonymizer",
            "analyze",
            "-i",
            "p.csv",
            "-c",
            "Stage",
            "--no-hash",
        ]);
        assert!(matches!(cli.command, Commands::Analyze { no_hash: true, .. }));
    }

    #[test]
    fn test_parse_to_sql() {
        let cli = Cli::parse_from(["record-anonymizer", "to-sql", "-i", "m.csv", "-t", "raw_mentors"]);
        assert!(matches!(cli.command, Commands::ToSql { out: None, .. }));
    }
}
