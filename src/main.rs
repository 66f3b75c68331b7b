use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use semester_gwa::config::{Backend, StoreConfig, DEFAULT_STORE_PATH};
use semester_gwa::models::{EvaluationResult, Record};
use semester_gwa::records::RecordStore;
use semester_gwa::theme::{self, Theme};
use semester_gwa::{grading, report, transfer, validation};

#[derive(Parser)]
#[command(name = "gwa")]
#[command(about = "Semester GWA calculator with saved subject records", long_about = None)]
struct Cli {
    /// Storage backend for saved records and preferences
    #[arg(long, global = true, value_enum, env = "GWA_BACKEND", default_value_t = Backend::File)]
    backend: Backend,
    /// Store directory (file backend) or database path (sqlite backend)
    #[arg(long, global = true, env = "GWA_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store or apply its schema
    InitStore,
    /// Compute the average, GWA and remark from four component grades
    #[command(allow_negative_numbers = true)]
    Calc {
        prelim: String,
        midterm: String,
        pre_finals: String,
        finals: String,
        /// Save the result under this subject name
        #[arg(long)]
        save: Option<String>,
    },
    /// Show saved records
    List,
    /// Delete a saved record
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate a markdown report of saved records
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Evaluate and save every row of a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Write saved records to a CSV file
    Export {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show or change the display theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::new(cli.backend, cli.store);
    let store = config.open().await?;

    match cli.command {
        Commands::InitStore => {
            println!("Store ready at {}.", config.path.display());
        }
        Commands::Calc {
            prelim,
            midterm,
            pre_finals,
            finals,
            save,
        } => {
            validation::require_scores([
                prelim.as_str(),
                midterm.as_str(),
                pre_finals.as_str(),
                finals.as_str(),
            ])?;
            let evaluation = grading::evaluate(
                grading::parse_score(&prelim),
                grading::parse_score(&midterm),
                grading::parse_score(&pre_finals),
                grading::parse_score(&finals),
            );
            print_evaluation(&evaluation);

            if let Some(subject) = save {
                let subject = validation::validate_subject(&subject)?;
                validation::require_saveable(&evaluation)?;
                let records = RecordStore::new(store);
                let record = records
                    .append(evaluation, &subject)
                    .await
                    .context("record was not saved")?;
                println!("Saved \"{}\" as record {}.", record.subject, record.id);
            }
        }
        Commands::List => {
            let saved = RecordStore::new(store).list().await;
            if saved.is_empty() {
                println!("No saved records yet.");
                return Ok(());
            }

            println!("Saved records:");
            for record in saved.iter() {
                print_record(record);
            }
        }
        Commands::Delete { id, yes } => {
            let records = RecordStore::new(store);
            let Some(record) = records.get(id).await else {
                println!("No record with id {id}.");
                return Ok(());
            };

            if !yes && !confirm(&format!("Delete \"{}\" ({id})?", record.subject))? {
                println!("Cancelled.");
                return Ok(());
            }

            let remaining = records
                .remove(id)
                .await
                .context("record was not deleted")?;
            println!(
                "Deleted \"{}\". {} records remain.",
                record.subject,
                remaining.len()
            );
        }
        Commands::Report { out } => {
            let saved = RecordStore::new(store).list().await;
            let report = report::build_report(&saved, chrono::Utc::now());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv } => {
            let records = RecordStore::new(store);
            let summary = transfer::import_csv(&records, &csv).await?;
            println!(
                "Imported {} records from {} ({} skipped).",
                summary.inserted,
                csv.display(),
                summary.skipped
            );
        }
        Commands::Export { csv } => {
            let records = RecordStore::new(store);
            let written = transfer::export_csv(&records, &csv).await?;
            println!("Exported {written} records to {}.", csv.display());
        }
        Commands::Theme { action } => {
            let current = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => theme::load(&store).await,
                ThemeAction::Toggle => theme::toggle(&store)
                    .await
                    .context("theme preference was not saved")?,
                ThemeAction::Set { theme: choice } => {
                    theme::save(&store, choice)
                        .await
                        .context("theme preference was not saved")?;
                    choice
                }
            };
            println!("Theme: {current}");
        }
    }

    Ok(())
}

fn print_evaluation(evaluation: &EvaluationResult) {
    let scores = evaluation.scores();
    println!(
        "Prelim {:.2} | Midterm {:.2} | Pre-Finals {:.2} | Finals {:.2}",
        scores.prelim, scores.midterm, scores.pre_finals, scores.finals
    );
    println!("Average: {:.2}", evaluation.average());
    println!("GWA: {}", evaluation.gwa());
    println!("Remark: {}", evaluation.remark());
}

fn print_record(record: &Record) {
    let scores = record.evaluation.scores();
    println!(
        "- [{}] {}: average {:.2}, GWA {} ({}) from {} / {} / {} / {}",
        record.id,
        record.subject,
        record.evaluation.average(),
        record.evaluation.gwa(),
        record.evaluation.remark(),
        scores.prelim,
        scores.midterm,
        scores.pre_finals,
        scores.finals
    );
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
