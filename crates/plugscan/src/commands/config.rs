use crate::errors::CliError;
use crate::{logger, GlobalOpts};
use clap::Subcommand;
use colored::*;
use plugscan_config::{config_path, DiscoveryConfig};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective discovery configuration
    Show {
        /// Project directory whose pyproject.toml is applied
        #[arg(long = "where", value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// Print the path of the user config file
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<(), CliError> {
    match action.unwrap_or(ConfigAction::Show { root: None }) {
        ConfigAction::Show { root } => {
            let config = DiscoveryConfig::load(root.as_deref())?;
            println!("{}", "Configuration:".bold().green());
            for (key, value) in config.values_iter() {
                if value.is_empty() {
                    println!("  {}: {}", key.cyan(), "(none)".yellow());
                } else {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            if opts.verbosity_level() > 0 {
                if let Some(path) = config_path() {
                    println!("  {}: {}", "config-file".cyan(), path.display());
                }
            }
        }
        ConfigAction::Path => match config_path() {
            Some(path) => {
                logger::debug(&format!("Config file exists: {}", path.is_file()));
                println!("{}", path.display());
            }
            None => logger::warn("Could not determine the config directory"),
        },
    }
    Ok(())
}
