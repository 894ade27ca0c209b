//! `plugscan discover`: build the registry for a package tree

use crate::errors::CliError;
use crate::logger;
use clap::{Args, ValueEnum};
use colored::Colorize;
use plugscan_ast::PackageFinderCollector;
use plugscan_config::{ConfigOverlay, DiscoveryConfig, OutputFormat};
use plugscan_registry::{
    parse_entry_points_txt, render, write_to_path, EntryPointDict, PluginCollector, RegistryFormat,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    /// entry_points.txt
    EntryPoints,
    /// `[project.entry-points]` tables for pyproject.toml
    Pyproject,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::EntryPoints => OutputFormat::EntryPoints,
            FormatArg::Pyproject => OutputFormat::Pyproject,
        }
    }
}

fn registry_format(format: OutputFormat) -> RegistryFormat {
    match format {
        OutputFormat::Json => RegistryFormat::Json,
        OutputFormat::EntryPoints => RegistryFormat::EntryPointsTxt,
        OutputFormat::Pyproject => RegistryFormat::Pyproject,
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DiscoverCommand {
    /// Directory to search for packages (default: current directory)
    #[arg(long = "where", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Skip packages matching PATTERN (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Only consider packages matching PATTERN (repeatable, default: *)
    #[arg(short, long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Registry output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the registry to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compare against an existing entry_points.txt and fail on differences
    #[arg(long, value_name = "FILE", conflicts_with = "output")]
    pub check: Option<PathBuf>,
}

impl DiscoverCommand {
    /// Command line flags as the last configuration layer
    ///
    /// `--where` is consumed by [`DiscoveryConfig::load`], which also applies
    /// a `where` redirect from that project's pyproject.toml.
    fn overlay(&self) -> ConfigOverlay {
        ConfigOverlay {
            root: None,
            include: (!self.include.is_empty()).then(|| self.include.clone()),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            format: self.format.map(OutputFormat::from),
            output: self.output.clone(),
        }
    }
}

pub fn handle_discover(cmd: DiscoverCommand) -> Result<(), CliError> {
    let mut config = DiscoveryConfig::load(cmd.root.as_deref())?;
    config.apply(cmd.overlay());
    debug!("Effective discovery config: {:?}", config);

    logger::spinner_start(&format!(
        "Discovering plugins under {}",
        config.root.display()
    ));
    let collector = PackageFinderCollector::new(
        &config.root,
        config.exclude.clone(),
        config.include.clone(),
    );
    logger::spinner_stop();

    logger::info(&format!(
        "Imported {} of {} package(s)",
        collector.packages().len() - collector.import_errors().len(),
        collector.packages().len()
    ));

    let dict = collector.get_entry_points()?;
    for (group, entries) in &dict {
        logger::debug(&format!("{}: {} entry point(s)", group, entries.len()));
    }

    if let Some(check) = &cmd.check {
        return check_registry(&dict, check);
    }

    let format = registry_format(config.format);
    match &config.output {
        Some(path) => {
            write_to_path(&dict, format, path).map_err(CliError::Write)?;
            logger::success(&format!(
                "Wrote {} entry point group(s) to {}",
                dict.len(),
                path.display()
            ));
        }
        None => print!("{}", render(&dict, format)?),
    }

    Ok(())
}

/// Entries only in `generated` (missing) and only in `existing` (stale)
pub fn registry_drift(
    generated: &EntryPointDict,
    existing: &EntryPointDict,
) -> (Vec<(String, String)>, Vec<(String, String)>) {
    let flatten = |dict: &EntryPointDict| -> BTreeSet<(String, String)> {
        dict.iter()
            .flat_map(|(group, entries)| {
                entries
                    .iter()
                    .map(move |entry| (group.clone(), entry.clone()))
            })
            .collect()
    };
    let generated = flatten(generated);
    let existing = flatten(existing);

    let missing = generated.difference(&existing).cloned().collect();
    let stale = existing.difference(&generated).cloned().collect();
    (missing, stale)
}

fn check_registry(dict: &EntryPointDict, path: &Path) -> Result<(), CliError> {
    let existing = parse_entry_points_txt(&fs::read_to_string(path)?);
    let (missing, stale) = registry_drift(dict, &existing);

    if missing.is_empty() && stale.is_empty() {
        logger::success(&format!("{} is up to date", path.display()));
        return Ok(());
    }

    for (group, entry) in &missing {
        eprintln!("  {} [{}] {}", "+".green().bold(), group, entry);
    }
    for (group, entry) in &stale {
        eprintln!("  {} [{}] {}", "-".red().bold(), group, entry);
    }

    Err(CliError::Drift {
        path: path.to_path_buf(),
        missing: missing.len(),
        stale: stale.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: &[(&str, Vec<&str>)]) -> EntryPointDict {
        entries
            .iter()
            .map(|(group, lines)| {
                (
                    group.to_string(),
                    lines.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_registry_drift_ignores_order() {
        let generated = dict(&[("demo", vec!["a=pkg:make_a", "b=pkg:make_b"])]);
        let existing = dict(&[("demo", vec!["b=pkg:make_b", "a=pkg:make_a"])]);
        let (missing, stale) = registry_drift(&generated, &existing);
        assert!(missing.is_empty());
        assert!(stale.is_empty());
    }

    #[test]
    fn test_registry_drift_reports_both_sides() {
        let generated = dict(&[("demo", vec!["a=pkg:make_a", "c=pkg:make_c"])]);
        let existing = dict(&[
            ("demo", vec!["a=pkg:make_a"]),
            ("console_scripts", vec!["tool=pkg.cli:main"]),
        ]);
        let (missing, stale) = registry_drift(&generated, &existing);
        assert_eq!(
            missing,
            vec![("demo".to_string(), "c=pkg:make_c".to_string())]
        );
        assert_eq!(
            stale,
            vec![(
                "console_scripts".to_string(),
                "tool=pkg.cli:main".to_string()
            )]
        );
    }

    #[test]
    fn test_overlay_only_sets_given_flags() {
        let cmd = DiscoverCommand {
            root: Some(PathBuf::from("project")),
            exclude: vec!["tests*".to_string()],
            format: Some(FormatArg::EntryPoints),
            ..Default::default()
        };
        let overlay = cmd.overlay();
        assert_eq!(overlay.root, None);
        assert_eq!(overlay.include, None);
        assert_eq!(overlay.exclude, Some(vec!["tests*".to_string()]));
        assert_eq!(overlay.format, Some(OutputFormat::EntryPoints));
    }
}
