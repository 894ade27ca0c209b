use std::io;
use thiserror::Error;

/// Errors that can occur while building or writing an entry point registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize registry: {0}")]
    Serialize(String),

    #[error("Plugin '{namespace}/{name}' has a factory without a stable locator: '{locator}'")]
    UnresolvableFactory {
        namespace: String,
        name: String,
        locator: String,
    },
}
