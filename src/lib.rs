//! # kube-medic
//!
//! A Rust-based command-line tool that scans live Kubernetes resources for
//! common misconfigurations, aggregates structured findings into a report,
//! and optionally enriches each finding with plain-language remediation
//! text from an AI backend, cached across runs.
//!
//! ## Features
//!
//! - **Pluggable analyzers**: one diagnostic check per resource kind behind
//!   a single contract
//! - **Failure isolation**: a broken check is reported, never fatal to the
//!   run
//! - **Deterministic reports**: aggregation follows registration order, not
//!   completion order
//! - **Cached explanations**: identical findings are answered from disk
//!   instead of the network
//!
//! ## Example
//!
//! ```rust,no_run
//! use kube_medic::analysis::{AnalyzerRegistry, Engine};
//! use kube_medic::analyzers::register_builtins;
//! use kube_medic::cluster::KubeCluster;
//! use kube_medic::common::cancel::CancelToken;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cluster = Arc::new(KubeCluster::new().await?);
//! let mut registry = AnalyzerRegistry::new();
//! register_builtins(&mut registry)?;
//!
//! let engine = Engine::new(cluster);
//! let report = engine
//!     .run(&registry.selected(&[]), None, &CancelToken::never())
//!     .await?;
//! println!("{} findings", report.findings.len());
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod analysis;
pub mod analyzers;
pub mod cache;
pub mod cli;
pub mod cluster;
pub mod common;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use analysis::{Failure, Finding, Report};
pub use error::{Error, Result};
pub use handlers::*;
use cli::Commands;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(cli: cli::Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            namespace,
            filter,
            context,
            explain,
            no_cache,
            language,
            model,
            api_key,
            output,
            max_concurrency,
        } => {
            handlers::handle_analyze(
                AnalyzeOptions {
                    namespace,
                    filter,
                    context,
                    explain,
                    no_cache,
                    language,
                    model,
                    api_key,
                    output,
                    max_concurrency,
                },
                &config,
            )
            .await
        }
        Commands::Analyzers => handlers::handle_analyzers(),
        Commands::Cache { command } => handlers::handle_cache(command, &config),
    }
}
