//! Error types for the plugscan CLI

use plugscan_ast::ImportError;
use plugscan_config::ConfigError;
use plugscan_registry::RegistryError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to import {module}: {source}")]
    Import {
        module: String,
        #[source]
        source: ImportError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write registry: {0}")]
    Write(anyhow::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} is out of date: {missing} missing and {stale} stale entry point(s)", .path.display())]
    Drift {
        path: PathBuf,
        missing: usize,
        stale: usize,
    },
}
