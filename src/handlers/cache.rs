//! `cache` subcommand: maintenance of the persisted explanation store.

use crate::cli::CacheCommand;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use std::fs;
use std::io;

pub fn handle_cache(command: CacheCommand, config: &Config) -> Result<()> {
    match command {
        CacheCommand::Purge => purge(config),
    }
}

fn purge(config: &Config) -> Result<()> {
    let path = config.cache_path();
    match fs::remove_file(&path) {
        Ok(()) => {
            println!("{} {}", "Purged explanation cache at".green(), path.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            println!("{}", "Explanation cache is already empty".dimmed());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
