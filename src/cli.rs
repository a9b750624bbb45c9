use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-medic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Diagnose cluster problems and explain them in plain language")]
#[command(
    long_about = "Scans live Kubernetes resources for common misconfigurations, aggregates the findings into a report, and optionally asks an AI backend for plain-language remediation advice, cached across runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the diagnostic analyzers against the cluster
    Analyze {
        /// Restrict the scan to one namespace (default: all namespaces)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Only run the named analyzers (e.g. Pod,Ingress)
        #[arg(short, long, value_delimiter = ',')]
        filter: Option<Vec<String>>,

        /// Kubeconfig context to use instead of the current one
        #[arg(long)]
        context: Option<String>,

        /// Ask the AI backend for remediation advice per finding
        #[arg(short, long)]
        explain: bool,

        /// Bypass the explanation cache and overwrite stored entries
        #[arg(long)]
        no_cache: bool,

        /// Language for remediation text
        #[arg(short, long)]
        language: Option<String>,

        /// Model identifier for the AI backend
        #[arg(short, long)]
        model: Option<String>,

        /// API key for the AI backend
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Maximum number of analyzers running concurrently
        #[arg(long)]
        max_concurrency: Option<usize>,
    },

    /// List the registered analyzers
    Analyzers,

    /// Manage the persisted explanation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Delete every cached explanation
    Purge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
