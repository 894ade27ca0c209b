//! Configuration for plugscan discovery runs
//!
//! Settings are layered, later layers winning:
//! 1. built-in defaults
//! 2. the user config file (`PLUGSCAN_CONFIG` or `<config dir>/plugscan/plugscan.toml`)
//! 3. the `[tool.plugscan]` table of `<where>/pyproject.toml`
//! 4. command line flags, applied by the caller as a [`ConfigOverlay`]

pub mod discovery;

pub use discovery::{config_path, ConfigError, ConfigOverlay, DiscoveryConfig, OutputFormat};
