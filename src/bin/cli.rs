use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tabled::{Table, settings::Style};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use povalidate::{CheckRunner, CheckSuite, CheckTableRow, ExitStatus, ReportWriter, TableLoader, ValidationReport};
use povalidate::fixture;

const LOG_FILE: &str = "validation.log";

#[derive(Parser)]
#[command(name = "povalidate")]
#[command(about = "Data-quality validation for supplier, part and purchase-order datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check and write the reports
    Run {
        /// Folder containing the input CSVs
        #[arg(short, long, env = "POVALIDATE_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Folder to write reports to
        #[arg(short, long, env = "POVALIDATE_OUT_DIR", default_value = "reports")]
        out_dir: PathBuf,

        /// Folder to write the log file to
        #[arg(long, env = "POVALIDATE_LOG_DIR", default_value = "logs")]
        log_dir: PathBuf,

        /// YAML rule set to use instead of the built-in one
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Console output: table, json
        #[arg(long, default_value = "table")]
        output: OutputFormat,
    },

    /// Write the canonical fixture dataset as CSV files
    Generate {
        /// Folder to write the CSVs to
        #[arg(short, long, default_value = "data")]
        out_dir: PathBuf,
    },

    /// Print the built-in rule set
    Rules {
        /// Output format: yaml, json
        #[arg(long, default_value = "yaml")]
        output: RulesFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum RulesFormat {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Run { log_dir, .. } => Some(log_dir.as_path()),
        _ => None,
    };

    if let Err(e) = init_tracing(cli.verbose, log_dir) {
        print_error(e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            error!("{}", e);
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if verbose {
        EnvFilter::new("povalidate=debug,info")
    } else {
        EnvFilter::new("povalidate=info,warn")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE))?;
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn print_error(err: Box<dyn std::error::Error>) {
    eprintln!("{} {}", "✗ Error:".red(), err);
}

fn run(cli: Cli) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { data_dir, out_dir, log_dir: _, rules, output } => {
            cmd_run(&data_dir, &out_dir, rules.as_deref(), output)
        }

        Commands::Generate { out_dir } => {
            cmd_generate(&out_dir)?;
            Ok(ExitStatus::Success)
        }

        Commands::Rules { output } => {
            cmd_rules(output)?;
            Ok(ExitStatus::Success)
        }
    }
}

fn cmd_run(
    data_dir: &Path,
    out_dir: &Path,
    rules: Option<&Path>,
    output: OutputFormat,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    info!("Validating datasets in {}", data_dir.display());

    let store = TableLoader::procurement().load_dir(data_dir)?;
    let suite = match rules {
        Some(path) => {
            info!("Using rule set {}", path.display());
            CheckSuite::from_yaml_file(path)?
        }
        None => CheckSuite::procurement(),
    };

    let results = CheckRunner::new(&store).run(&suite)?;
    let report = ValidationReport::new(results);
    let summary = ReportWriter::new(out_dir).write(&report)?;

    info!(
        "{} checks: {} passed, {} failed ({} critical)",
        summary.total_checks, summary.passed, summary.failed, summary.critical_failed
    );

    if let OutputFormat::Table = output {
        let rows: Vec<CheckTableRow> = report.results.iter().map(CheckTableRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::markdown());
        println!("\n{}\n", table);

        let verdict = match report.exit_status() {
            ExitStatus::Success if report.all_passed() => "✓ All checks passed".green(),
            ExitStatus::Success => format!("⚠ {} warnings", report.warn_failed_count()).yellow(),
            ExitStatus::CriticalFailure => {
                format!("✗ {} critical checks failed", report.critical_failed_count()).red()
            }
        };
        println!("{}\n", verdict);
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(report.exit_status())
}

fn cmd_generate(out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = fixture::procurement_store()?;
    fixture::write_csv_dir(&store, out_dir)?;
    println!("✓ Wrote {} tables to {}", store.len(), out_dir.display());
    Ok(())
}

fn cmd_rules(output: RulesFormat) -> Result<(), Box<dyn std::error::Error>> {
    let suite = CheckSuite::procurement();
    match output {
        RulesFormat::Yaml => print!("{}", suite.to_yaml()?),
        RulesFormat::Json => println!("{}", serde_json::to_string_pretty(&suite)?),
    }
    Ok(())
}
