//! Registry renderers and writer
//!
//! Renders an [`EntryPointDict`] as JSON, as an `entry_points.txt` file or as
//! `[project.entry-points]` tables for pyproject.toml.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::entry_point::EntryPointDict;
use crate::errors::RegistryError;

/// Output formats for a rendered registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Json,
    EntryPointsTxt,
    Pyproject,
}

/// Render the registry in the requested format
pub fn render(dict: &EntryPointDict, format: RegistryFormat) -> Result<String, RegistryError> {
    match format {
        RegistryFormat::Json => render_json(dict),
        RegistryFormat::EntryPointsTxt => Ok(render_entry_points_txt(dict)),
        RegistryFormat::Pyproject => render_pyproject(dict),
    }
}

pub fn render_json(dict: &EntryPointDict) -> Result<String, RegistryError> {
    let mut json =
        serde_json::to_string_pretty(dict).map_err(|e| RegistryError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Render as entry_points.txt (`[group]` followed by `name = module:attr` lines)
pub fn render_entry_points_txt(dict: &EntryPointDict) -> String {
    let mut out = String::new();
    for (group, entries) in dict {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", group));
        for entry in entries {
            match entry.split_once('=') {
                Some((name, value)) => out.push_str(&format!("{} = {}\n", name, value)),
                None => out.push_str(&format!("{}\n", entry)),
            }
        }
    }
    out
}

/// Render as `[project.entry-points."group"]` tables
///
/// TOML tables cannot repeat a key, so a name registered twice in one group
/// keeps its last locator.
pub fn render_pyproject(dict: &EntryPointDict) -> Result<String, RegistryError> {
    let mut entry_points = toml::Table::new();
    for (group, entries) in dict {
        let mut table = toml::Table::new();
        for entry in entries {
            let Some((name, value)) = entry.split_once('=') else {
                continue;
            };
            if table
                .insert(name.to_string(), toml::Value::String(value.to_string()))
                .is_some()
            {
                warn!(
                    "Duplicate entry point '{}' in group '{}'; keeping {}",
                    name, group, value
                );
            }
        }
        entry_points.insert(group.clone(), toml::Value::Table(table));
    }

    let mut project = toml::Table::new();
    project.insert("entry-points".to_string(), toml::Value::Table(entry_points));
    let mut root = toml::Table::new();
    root.insert("project".to_string(), toml::Value::Table(project));

    toml::to_string_pretty(&root).map_err(|e| RegistryError::Serialize(e.to_string()))
}

/// Render the registry and write it to `output_path`
pub fn write_to_path(
    dict: &EntryPointDict,
    format: RegistryFormat,
    output_path: &Path,
) -> Result<()> {
    debug!("Writing registry ({:?}) to: {:?}", format, output_path);

    let rendered = render(dict, format)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, rendered)?;

    info!("Registry written to: {:?}", output_path);
    info!("Total groups: {}", dict.len());

    Ok(())
}
