mod anonymize;
mod cli;
mod error;
mod output;
mod privacy;
mod readers;
mod report;
mod sql;
mod types;

use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands};
use types::Result;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Anonymize {
            input,
            output,
            profile,
            seed,
            entities,
            text_columns,
            shuffle_columns,
        } => {
            let options =
                cli::anonymize_options(profile, seed, entities, text_columns, shuffle_columns);
            run_anonymize(&input, &output, &options)?;
        }
        Commands::Analyze {
            input,
            columns,
            top,
            out,
            no_hash,
        } => {
            let report = report::analyze_file(&input, &columns, top, !no_hash)?;
            if let Some(out_path) = out {
                output::write_json_file(&report, &out_path)?;
                eprintln!("Report written to: {}", out_path.display());
            } else {
                output::write_json_stdout(&report)?;
            }
        }
        Commands::ToSql { input, table, out } => {
            let data = readers::read_table(&input)?;
            let source = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");
            let script = sql::render_script(&data, &table, source);
            output::write_text(&script, out.as_deref())?;
            if let Some(out_path) = out {
                eprintln!(
                    "Generated {} INSERT statements in {}",
                    data.len(),
                    out_path.display()
                );
            }
        }
    }

    Ok(())
}

fn run_anonymize(input: &Path, output: &Path, options: &types::AnonymizeOptions) -> Result<()> {
    let mut table = readers::read_table(input)?;
    let rng = anonymize::seeded_rng(options.seed);
    let mut anonymizer = anonymize::RecordAnonymizer::from_options(options, rng)?;
    let summary = anonymizer.anonymize_table(&mut table);
    output::write_csv(&table, output)?;

    eprintln!("Anonymized {} records", summary.records);
    eprintln!("Generated {} unique names", summary.identities_issued);
    eprintln!("Output written to: {}", output.display());
    Ok(())
}
