//! `analyze` subcommand: run the engine, optionally enrich findings with
//! AI remediation text, and render the report.

use crate::ai::{OpenAiClient, RemediationService};
use crate::analysis::{AnalyzerRegistry, Engine, Report};
use crate::analyzers;
use crate::cache::{ExplanationStore, FileStore, MemoryStore};
use crate::cli::OutputFormat;
use crate::cluster::{ClusterReader, KubeCluster};
use crate::common::cancel::{CancelHandle, CancelToken};
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use colored::Colorize;
use std::sync::Arc;

pub struct AnalyzeOptions {
    pub namespace: Option<String>,
    pub filter: Option<Vec<String>>,
    pub context: Option<String>,
    pub explain: bool,
    pub no_cache: bool,
    pub language: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub output: OutputFormat,
    pub max_concurrency: Option<usize>,
}

pub async fn handle_analyze(options: AnalyzeOptions, config: &Config) -> Result<()> {
    let cluster: Arc<dyn ClusterReader> = match &options.context {
        Some(context) => Arc::new(KubeCluster::with_context(context).await?),
        None => Arc::new(KubeCluster::new().await?),
    };

    let mut registry = AnalyzerRegistry::new();
    analyzers::register_builtins(&mut registry)?;
    let selected = registry.selected(options.filter.as_deref().unwrap_or(&[]));

    let mut engine = Engine::new(cluster);
    if let Some(max) = options.max_concurrency {
        engine = engine.with_max_concurrency(max);
    }

    let (handle, token) = CancelToken::new();
    cancel_on_ctrl_c(handle);

    let (mut report, cancelled) = match engine
        .run(&selected, options.namespace.as_deref(), &token)
        .await
    {
        Ok(report) => (report, false),
        Err(cancelled) => (cancelled.partial, true),
    };

    if options.explain && !cancelled && !report.findings.is_empty() {
        explain_findings(&mut report, &options, config, &token).await?;
    }

    match options.output {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Text => render_text(&report),
    }

    if cancelled {
        return Err(Error::Cancelled(crate::analysis::Cancelled {
            partial: report,
        }));
    }
    Ok(())
}

pub fn handle_analyzers() -> Result<()> {
    let mut registry = AnalyzerRegistry::new();
    analyzers::register_builtins(&mut registry)?;

    println!("{}", "Registered analyzers:".bold());
    for name in registry.names() {
        println!("  {} {}", "-".dimmed(), name);
    }
    Ok(())
}

/// Ask the remediation service for plain-language advice, one finding at a
/// time. A provider failure skips that finding and moves on; the rest of
/// the report is still rendered.
async fn explain_findings(
    report: &mut Report,
    options: &AnalyzeOptions,
    config: &Config,
    cancel: &CancelToken,
) -> Result<()> {
    let api_key = options
        .api_key
        .clone()
        .or_else(|| config.ai.api_key.clone())
        .ok_or(ConfigError::MissingApiKey)?;
    let model = options.model.clone().unwrap_or_else(|| config.ai.model.clone());
    let language = options
        .language
        .clone()
        .unwrap_or_else(|| config.ai.language.clone());

    let client = Arc::new(OpenAiClient::new(api_key, model, language)?);
    let store: Arc<dyn ExplanationStore> = if config.cache.enabled {
        Arc::new(FileStore::open(config.cache_path()))
    } else {
        Arc::new(MemoryStore::new())
    };
    let service = RemediationService::new(client, store);

    for finding in &mut report.findings {
        let fragments = finding.prompt_fragments();
        match service.explain(&fragments, options.no_cache, cancel).await {
            Ok(text) => finding.explanation = Some(text),
            Err(err) => log::error!(
                "failed to explain {} {}: {}",
                finding.kind,
                finding.object_identifier(),
                err
            ),
        }
    }
    Ok(())
}

fn cancel_on_ctrl_c(handle: CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, stopping analysis");
            handle.cancel();
        }
    });
}

fn render_text(report: &Report) {
    if report.is_clean() {
        println!("{}", "No problems detected".green().bold());
        return;
    }

    for (index, finding) in report.findings.iter().enumerate() {
        println!(
            "{} {} {}",
            index.to_string().dimmed(),
            finding.kind.cyan(),
            finding.object_identifier().yellow().bold()
        );
        for failure in &finding.failures {
            println!("  {} {}", "-".dimmed(), failure.text.red());
        }
        if let Some(explanation) = &finding.explanation {
            println!("{}", explanation.green());
        }
        println!();
    }

    for error in &report.errors {
        eprintln!(
            "{} {}: {}",
            "analyzer failed".red().bold(),
            error.analyzer,
            error.message
        );
    }
}
