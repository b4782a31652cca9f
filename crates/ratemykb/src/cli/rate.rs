//! Rate command: classify every new note in a vault and update the report

use crate::ai::{build_classifier, Provider};
use crate::cli::error::HelpfulError;
use crate::config::Config;
use crate::runner::{process_files, RunSummary};
use crate::scout::{ExclusionList, Scanner};
use anyhow::{Context, Result};
use ratemykb_state_store::{ReportStats, StateStore, StateStoreError, StoreConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the rate command
#[derive(Debug)]
pub struct RateArgs {
    pub target: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub json: bool,
}

/// Machine-readable result printed with `--json`
#[derive(Debug, Serialize)]
struct RateOutput {
    target: PathBuf,
    report: PathBuf,
    classifier: String,
    recovered: usize,
    summary: RunSummary,
    stats: ReportStats,
}

pub fn run(args: RateArgs) -> Result<()> {
    let target = args.target.ok_or_else(HelpfulError::missing_target)?;
    let root = validate_target(&target)?;

    let mut config = Config::load(args.config.as_deref())
        .map_err(|e| HelpfulError::config_error(&e.to_string()))?;
    if let Some(provider) = args.provider {
        config.ai_engine.provider = provider;
    }

    let store_config = StoreConfig::new(&root)
        .with_report_file_name(&config.report.file_name)
        .with_file_extension(&config.scan_settings.file_extension);

    let classifier = build_classifier(
        &config.ai_engine,
        &config.prompt_config.quality_classification_prompt,
    );

    if !args.json {
        println!("Classifier: {}", classifier.name());
        if config.ai_engine.provider == Provider::Ollama {
            println!("LLM model: {}", config.ai_engine.model);
            println!("LLM endpoint: {}", config.ai_engine.url);
        }
    }

    let mut store = match StateStore::open(&store_config) {
        Ok(store) => store,
        Err(StateStoreError::Load { path, source }) => {
            return Err(HelpfulError::report_unreadable(&path, &source.to_string()).into());
        }
        Err(err) => return Err(err.into()),
    };
    if !args.json && store.recovered_count() > 0 {
        println!(
            "Found existing report with {} processed files",
            store.recovered_count()
        );
    }

    let exclusion_path = config.exclusion_file.resolve(&root);
    let exclusions = ExclusionList::load(&exclusion_path)
        .with_context(|| format!("Failed to load exclusion file {}", exclusion_path.display()))?;

    if !args.json {
        println!("Scanning {} for notes...", root.display());
    }
    let files = Scanner::new(&config.scan_settings, exclusions)
        .skip_file(store.report_path())
        .skip_file(&exclusion_path)
        .scan(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if !args.json {
        println!("Found {} notes", files.len());
        println!("Processing {} files...", files.len());
    }

    let json = args.json;
    let summary = process_files(&mut store, &files, &classifier, |progress| {
        if !json {
            println!("{}", progress);
        }
    });
    info!(
        new = summary.newly_processed,
        already = summary.already_processed,
        failed = summary.failed,
        "Run finished"
    );

    if args.json {
        let output = RateOutput {
            target: root.clone(),
            report: store.report_path().to_path_buf(),
            classifier: classifier.name().to_string(),
            recovered: store.recovered_count(),
            stats: store.snapshot().stats(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Processing complete: {} new files processed, {} already processed, {} total",
        summary.newly_processed, summary.already_processed, summary.total_known
    );
    if summary.failed > 0 {
        println!(
            "{} files could not be classified and will be retried on the next run",
            summary.failed
        );
    }
    if summary.persist_failures > 0 {
        println!(
            "Warning: the report could not be written {} times; check {}",
            summary.persist_failures,
            store.report_path().display()
        );
    }
    println!("Report available at {}", store.report_path().display());

    Ok(())
}

/// The target must be an existing directory. Returns its canonical path so
/// scanned paths and paths decoded from the report compare equal.
fn validate_target(target: &Path) -> Result<PathBuf> {
    if !target.exists() {
        return Err(HelpfulError::path_not_found(target).into());
    }
    if !target.is_dir() {
        return Err(HelpfulError::not_a_directory(target).into());
    }
    target
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", target.display()))
}
