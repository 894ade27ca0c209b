//! `plugscan scan`: resolve the members of explicit modules
//!
//! A debugging aid for plugin authors. Unlike `discover`, a module that fails
//! to import is an error, and `-v` shows members that looked like plugins but
//! were rejected.

use crate::errors::CliError;
use crate::GlobalOpts;
use clap::Args;
use colored::Colorize;
use plugscan_ast::{ModuleLoader, ModuleScanningCollector, ResolveError};
use plugscan_config::DiscoveryConfig;
use plugscan_registry::PluginSpec;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ScanCommand {
    /// Directory modules are imported from (default: configured root)
    #[arg(long = "where", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print the resolved specifications as JSON
    #[arg(long)]
    pub json: bool,

    /// Dotted module names, e.g. `my_pkg.plugins`
    #[arg(required = true, value_name = "MODULE")]
    pub modules: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScannedSpec<'a> {
    module: &'a str,
    member: &'a str,
    #[serde(flatten)]
    spec: &'a PluginSpec,
}

pub fn handle_scan(cmd: ScanCommand, opts: &GlobalOpts) -> Result<(), CliError> {
    let root = match cmd.root {
        Some(root) => root,
        None => DiscoveryConfig::load(None)?.root,
    };

    let mut loader = ModuleLoader::new(root);
    let modules = cmd
        .modules
        .iter()
        .map(|name| {
            loader.import_module(name).map_err(|source| CliError::Import {
                module: name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let collector = ModuleScanningCollector::new(modules);
    let resolutions = collector.resolutions();
    let found: Vec<ScannedSpec<'_>> = resolutions
        .iter()
        .filter_map(|(candidate, result)| {
            result.as_ref().ok().map(|spec| ScannedSpec {
                module: candidate.module.name(),
                member: candidate.name,
                spec,
            })
        })
        .collect();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} plugin(s)", found.len()).bold().green()
    );
    for (candidate, result) in &resolutions {
        match result {
            Ok(spec) => println!(
                "  {} {} {}",
                format!("{}:{}", spec.namespace, spec.name).cyan(),
                "->".dimmed(),
                spec.factory.locator()
            ),
            // plain members are not worth reporting
            Err(ResolveError::NotAPlugin(_)) => {}
            Err(e) if opts.verbosity_level() > 0 => println!(
                "  {} {}.{}: {}",
                "skipped".yellow(),
                candidate.module.name(),
                candidate.name,
                e
            ),
            Err(_) => {}
        }
    }

    Ok(())
}
