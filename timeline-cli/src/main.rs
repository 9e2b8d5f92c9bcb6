use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use timeline_core::TransactionRecord;
use timeline_export::{write_manifest_file, write_transactions_file};
use timeline_ingest::{
    BatchReport, ModelBuilderFactory, Pipeline, PipelineError, RawResponse, TimelineEntry, TypeResolver, normalize,
};

mod config;
mod source;

use config::{Config, DEFAULT_CONFIG_FILE, init_config, load_config};
use source::{DirectoryReader, load_known_ids, load_timeline};

#[derive(Parser, Debug)]
#[command(
    name = "timeline",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TIMELINE_BUILD_SHA"), ")"),
    about = "Classify timeline detail documents and export transactions"
)]
struct Cli {
    /// Config file (default: ./timeline.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every timeline entry through the pipeline and write CSVs
    Export {
        /// Timeline index JSON (list of {id, eventType})
        #[arg(long)]
        timeline: Option<PathBuf>,

        /// Directory of <id>.json detail documents
        #[arg(long)]
        details: Option<PathBuf>,

        /// Transactions CSV output
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Document manifest CSV output
        #[arg(long)]
        documents_csv: Option<PathBuf>,

        /// Ids exported by an earlier run; these entries are skipped
        #[arg(long)]
        known_ids: Option<PathBuf>,
    },

    /// Resolve and build a single detail document, printing the record
    Classify {
        /// Event-type tag from the timeline entry
        #[arg(long)]
        event_type: String,

        /// Detail document JSON
        file: PathBuf,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut cfg = load_config(&config_path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cfg.log.level.as_str())).init();

    match cli.command {
        Command::Export {
            timeline,
            details,
            csv,
            documents_csv,
            known_ids,
        } => {
            let paths = &mut cfg.paths;
            if let Some(p) = timeline {
                paths.timeline = p;
            }
            if let Some(p) = details {
                paths.details = p;
            }
            if let Some(p) = csv {
                paths.csv = p;
            }
            if let Some(p) = documents_csv {
                paths.documents_csv = p;
            }
            if known_ids.is_some() {
                paths.known_ids = known_ids;
            }
            export(&cfg).await?;
        }

        Command::Classify { event_type, file } => {
            classify(&event_type, &file)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                if init_config(&config_path)? {
                    println!("Wrote {}", config_path.display());
                } else {
                    println!("Config already exists: {}", config_path.display());
                }
            }
        },
    }

    Ok(())
}

async fn export(cfg: &Config) -> Result<()> {
    let paths = &cfg.paths;
    let entries = load_timeline(&paths.timeline)?;
    let known = match &paths.known_ids {
        Some(p) => load_known_ids(p)?,
        None => Default::default(),
    };
    log::info!(
        "exporting {} timeline entries from {} ({} known ids)",
        entries.len(),
        paths.details.display(),
        known.len()
    );

    let pipeline = Arc::new(Pipeline::default());
    let reader = Arc::new(DirectoryReader::new(&paths.details));
    let mut report = BatchReport::default();

    // Handles are awaited in timeline order, so output order matches the index.
    let mut handles = Vec::new();
    for entry in entries {
        if known.contains(&entry.id) {
            log::debug!("{}: exported by an earlier run", entry.id);
            report.record_known(&entry.id);
            continue;
        }
        let pipeline = Arc::clone(&pipeline);
        let reader = Arc::clone(&reader);
        handles.push(tokio::task::spawn_blocking(move || {
            let outcome = pipeline.fetch_and_process(&*reader, &entry);
            (entry, outcome)
        }));
    }

    let mut records: Vec<TransactionRecord> = Vec::new();
    for handle in handles {
        let (entry, outcome): (TimelineEntry, Result<TransactionRecord, PipelineError>) =
            handle.await.context("pipeline task panicked")?;
        report.record(&entry.id, &outcome);
        if let Ok(record) = outcome {
            records.push(record);
        }
    }

    let rows = write_transactions_file(&paths.csv, &records)?;
    let docs = write_manifest_file(&paths.documents_csv, &records)?;

    log::info!("{} built, {} skipped", records.len(), report.total_skipped());
    println!("{}", report);
    println!("Wrote {} transactions to {}", rows, paths.csv.display());
    println!("Wrote {} documents to {}", docs, paths.documents_csv.display());
    Ok(())
}

fn classify(event_type: &str, file: &Path) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let raw: RawResponse = serde_json::from_slice(&bytes).with_context(|| format!("parse {}", file.display()))?;

    let normalization = normalize(&raw)?;
    for section in &normalization.absent {
        println!("absent: {}", section);
    }

    let kind = match TypeResolver::default().resolve(event_type, &normalization.response) {
        Ok(kind) => kind,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };
    println!("kind: {}", kind);

    match ModelBuilderFactory::create(kind, &normalization.response).build() {
        Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        Err(e) => println!("not built: {}", e),
    }
    Ok(())
}
