//! hmmdb CLI - load HMMER domain tables into SQLite

use clap::{Parser, Subcommand};
use hmmdb::config;
use hmmdb::storage::SqliteStore;
use hmmdb::ui::{self, Icons, Spinner};
use hmmdb::{load_files_with, DuplicateHitPolicy, LoadOptions, TableFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hmmdb")]
#[command(version)]
#[command(about = "Load HMMER3 domain-table search results into a SQLite database")]
#[command(long_about = r#"
hmmdb stores hmmsearch/hmmscan --domtblout results as four tables:
sample, query, hit and hsp.

Example usage:
  hmmdb init --database hmm.db
  hmmdb load --sample soil1 results/*.domtab
  hmmdb stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    #[command(alias = "create-db")]
    Init {
        /// Path to the database file [default: hmm.db]
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Drop existing tables first
        #[arg(long)]
        drop: bool,
    },

    /// Load one or more domain tables
    #[command(alias = "load-data")]
    Load {
        /// Sample to tag every hit with
        #[arg(short, long)]
        sample: Option<String>,

        /// Path to the database file [default: hmm.db]
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Program that wrote the tables (hmmsearch, hmmscan) [default: hmmsearch]
        #[arg(short, long)]
        format: Option<TableFormat>,

        /// What to do with hits already stored for the sample (reject, skip) [default: reject]
        #[arg(long)]
        on_duplicate_hit: Option<DuplicateHitPolicy>,

        /// Domain table files, loaded in order
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Show row counts and hits per sample
    Stats {
        /// Path to the database file [default: hmm.db]
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cfg = config::load_config(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Init { database, drop } => run_init(&cfg.database_path(database), drop),
        Commands::Load {
            sample,
            database,
            format,
            on_duplicate_hit,
            files,
        } => {
            let options = cfg.load_options(sample, format, on_duplicate_hit);
            run_load(&cfg.database_path(database), &files, options)
        }
        Commands::Stats { database, json } => run_stats(&cfg.database_path(database), json),
    };

    if let Err(e) = result {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run_init(database: &Path, drop: bool) -> anyhow::Result<()> {
    ui::header("Initializing database");
    ui::info(Icons::DATABASE, "Database", &database.display().to_string());

    let store = SqliteStore::open(database)?;
    if drop {
        ui::warn("Dropping existing tables");
        store.ensure_schema(true)?;
    }

    ui::success("Schema ready");
    Ok(())
}

fn run_load(database: &Path, files: &[PathBuf], options: LoadOptions) -> anyhow::Result<()> {
    if let Some(missing) = files.iter().find(|f| !f.is_file()) {
        anyhow::bail!("input file not found: {}", missing.display());
    }

    ui::header("Loading domain tables - this may take some time");
    ui::info(Icons::DATABASE, "Database", &database.display().to_string());
    ui::info(Icons::SAMPLE, "Sample", options.sample.as_deref().unwrap_or("(none)"));
    ui::info(Icons::GEAR, "Format", options.format.as_str());

    let mut store = SqliteStore::open(database)?;
    let spinner = Spinner::new("Starting load");
    let report = load_files_with(&mut store, files, &options, |i, file| {
        spinner.set_message(&format!("[{}/{}] {}", i + 1, files.len(), file.display()));
    })?;
    spinner.finish_and_clear();

    ui::section("Load Summary");
    ui::summary_row("Files:", report.files);
    ui::summary_row("Queries created:", report.queries_created);
    ui::summary_row("Queries reused:", report.queries_reused);
    ui::summary_row("Hits inserted:", report.hits_inserted);
    if report.hits_skipped > 0 {
        ui::summary_row("Hits skipped:", report.hits_skipped);
    }
    ui::summary_row("HSPs inserted:", report.hsps_inserted);
    ui::timing(&spinner.elapsed());
    ui::success("Finished with no errors");
    Ok(())
}

fn run_stats(database: &Path, json: bool) -> anyhow::Result<()> {
    if !database.exists() {
        anyhow::bail!("database not found: {} (run `hmmdb init` first)", database.display());
    }
    let store = SqliteStore::open(database)?;
    let stats = store.stats()?;
    let samples = store.sample_summaries()?;

    if json {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "tables": stats,
            "samples": samples,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} hmmdb Statistics ({})", Icons::STATS, database.display());
    println!("{}", ui::stats_table(&stats));
    if !samples.is_empty() {
        println!("{}", ui::samples_table(&samples));
    }
    Ok(())
}
