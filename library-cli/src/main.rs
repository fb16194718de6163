#![forbid(unsafe_code)]

mod console;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use library_config::{LibraryConfig, ROOT_ENV_VAR};
use library_kernel::{AuditReport, BackfillOutcome, IngestError, Ingested, Library};
use tracing::debug;

use crate::console::ConsoleSupplier;

#[derive(Parser)]
#[command(name = "prompt-library", version)]
#[command(about = "Manage a validated catalog of reusable prompts")]
struct Cli {
    /// Library root holding the index and the prompts directory.
    #[arg(long, global = true, env = ROOT_ENV_VAR)]
    root: Option<PathBuf>,
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', global = true, action = ArgAction::Count)]
    verbosity: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a prompt from a JSON file, or field by field with --interactive.
    Ingest {
        /// JSON file describing the prompt.
        #[arg(required_unless_present = "interactive", conflicts_with = "interactive")]
        file: Option<PathBuf>,
        /// Ask for each field on the terminal.
        #[arg(short, long)]
        interactive: bool,
    },
    /// Audit the index and the generated documents.
    Validate {
        /// List every prompt with its file status.
        #[arg(long)]
        verbose: bool,
    },
    /// Write placeholder documents for index entries whose file is missing.
    Backfill,
    /// Print the next free identifier for a category.
    NextId {
        /// Category key, e.g. `dev`.
        category: String,
    },
    /// Create an empty index if none exists.
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = library_telemetry::init(cli.verbosity) {
        eprintln!("warning: {err}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match cli.root {
        Some(root) => LibraryConfig::for_root(root),
        None => LibraryConfig::from_env(),
    }
    .context("failed to resolve library configuration")?;
    debug!(root = %config.root().display(), "opening prompt library");
    let library = Library::open(config);

    match cli.command {
        Command::Ingest {
            interactive: true, ..
        } => {
            let stdin = io::stdin();
            let mut console = ConsoleSupplier::new(stdin.lock(), io::stdout());
            Ok(report_ingest(library.ingest_interactive(&mut console)))
        }
        Command::Ingest {
            file: Some(file), ..
        } => ingest_file(&library, &file),
        Command::Ingest { .. } => bail!("either a JSON file or --interactive is required"),
        Command::Validate { verbose } => {
            let report = library.audit_report().context("failed to load index")?;
            Ok(report_audit(&report, verbose))
        }
        Command::Backfill => {
            let outcomes = library.backfill().context("backfill failed")?;
            Ok(report_backfill(&outcomes))
        }
        Command::NextId { category } => {
            let id = library
                .next_id(&category)
                .with_context(|| format!("cannot allocate an id for {category}"))?;
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Init => {
            let path = library.repository().path().display().to_string();
            if library.init().context("failed to create index")? {
                println!("✓ Created {path}");
            } else {
                println!("Index already exists at {path}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn ingest_file(library: &Library, file: &Path) -> Result<ExitCode> {
    if file.extension().and_then(|ext| ext.to_str()) != Some("json") {
        bail!("{} is not a .json file", file.display());
    }
    let raw =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    Ok(report_ingest(library.ingest(&raw)))
}

fn report_ingest(result: Result<Ingested, IngestError>) -> ExitCode {
    match result {
        Ok(ingested) => {
            println!("✓ Created {}", ingested.file);
            println!("✓ Added {} to index", ingested.record.id);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Prompt rejected:");
            for message in err.messages() {
                eprintln!("  ✗ {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn report_audit(report: &AuditReport, verbose: bool) -> ExitCode {
    if verbose {
        for entry in report.index.entries() {
            let mark = if report.consistency.existing.contains(&entry.id) {
                "✓"
            } else {
                "✗"
            };
            println!("{mark} {}: {}", entry.id, entry.file);
        }
    }

    if report.is_clean() {
        let summary = report.summary();
        println!(
            "✓ Validation passed: {} prompts in {} categories",
            summary.total_prompts, summary.total_categories
        );
        return ExitCode::SUCCESS;
    }

    eprintln!("Validation failed with {} problem(s):", report.problems.len());
    for problem in &report.problems {
        eprintln!("  ✗ {problem}");
    }
    ExitCode::FAILURE
}

fn report_backfill(outcomes: &[BackfillOutcome]) -> ExitCode {
    let (mut created, mut failed) = (0, 0);
    for outcome in outcomes {
        match outcome {
            BackfillOutcome::Created(id) => {
                println!("✓ Created placeholder for {id}");
                created += 1;
            }
            BackfillOutcome::Failed { id, reason } => {
                eprintln!("  ✗ {id}: {reason}");
                failed += 1;
            }
            BackfillOutcome::Skipped(_) => {}
        }
    }
    println!(
        "Backfill complete: {created} created, {} already present, {failed} failed",
        outcomes.len() - created - failed
    );
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prompt-library",
            "validate",
            "--verbose",
            "-vv",
            "--root",
            "/tmp/lib",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/lib")));
        assert!(matches!(cli.command, Command::Validate { verbose: true }));
    }

    #[test]
    fn ingest_needs_file_or_interactive() {
        assert!(Cli::try_parse_from(["prompt-library", "ingest"]).is_err());
        assert!(
            Cli::try_parse_from(["prompt-library", "ingest", "a.json", "--interactive"]).is_err()
        );
        assert!(Cli::try_parse_from(["prompt-library", "ingest", "-i"]).is_ok());
    }

    #[test]
    fn backfill_failures_set_exit_status() {
        let outcomes = [
            BackfillOutcome::Failed {
                id: "DEV-001".into(),
                reason: "invalid artifact path".into(),
            },
            BackfillOutcome::Created("DEV-002".into()),
        ];
        assert_eq!(report_backfill(&outcomes), ExitCode::FAILURE);
        assert_eq!(
            report_backfill(&[BackfillOutcome::Skipped("DEV-002".into())]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn rejects_non_json_input() {
        let library = Library::open(LibraryConfig::for_root(std::env::temp_dir()).unwrap());
        let err = ingest_file(&library, Path::new("prompt.yaml")).expect_err("not json");
        assert!(err.to_string().contains("not a .json file"));
    }
}
