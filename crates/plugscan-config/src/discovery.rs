use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the user config file location
pub const CONFIG_ENV_VAR: &str = "PLUGSCAN_CONFIG";

const CONFIG_FILE_NAME: &str = "plugscan.toml";

/// Error type for configuration loading
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// A config file could not be read
    Read(PathBuf, String),
    /// A config file is not valid TOML or has unexpected fields
    Parse(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, msg) => {
                write!(f, "Failed to read config {}: {}", path.display(), msg)
            }
            ConfigError::Parse(path, msg) => {
                write!(f, "Invalid config {}: {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Format of the rendered entry point registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    /// `entry_points.txt` as found in `.dist-info` directories
    EntryPoints,
    /// `[project.entry-points]` tables for pyproject.toml
    Pyproject,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::EntryPoints => "entry-points",
            OutputFormat::Pyproject => "pyproject",
        }
    }
}

/// Effective settings for one discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Root directory packages are discovered and imported from
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            root: PathBuf::from("."),
            include: vec!["*".to_string()],
            exclude: Vec::new(),
            format: OutputFormat::default(),
            output: None,
        }
    }
}

/// A partial configuration layer; unset fields leave the lower layer alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigOverlay {
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ConfigOverlay {
    /// Read a standalone plugscan.toml
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    /// Read the `[tool.plugscan]` table of a pyproject.toml, if present
    pub fn from_pyproject(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        let parsed: toml::Value = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;

        let Some(table) = parsed.get("tool").and_then(|tool| tool.get("plugscan")) else {
            return Ok(None);
        };

        table
            .clone()
            .try_into()
            .map(Some)
            .map_err(|e: toml::de::Error| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }
}

/// Location of the user config file
///
/// Honors `PLUGSCAN_CONFIG` when set and non-empty.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = env_path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| dir.join("plugscan").join(CONFIG_FILE_NAME))
}

impl DiscoveryConfig {
    /// Load the user config and project config for the given root
    ///
    /// `root` takes precedence over any `where` found in the user config when
    /// locating pyproject.toml.
    pub fn load(root: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(config_path().as_deref(), root)
    }

    pub fn load_from(user_config: Option<&Path>, root: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = DiscoveryConfig::default();

        if let Some(path) = user_config.filter(|p| p.is_file()) {
            debug!("Loading user config from {:?}", path);
            config.apply(ConfigOverlay::from_file(path)?);
        }

        if let Some(root) = root {
            config.root = root.to_path_buf();
        }

        let pyproject = config.root.join("pyproject.toml");
        if pyproject.is_file() {
            if let Some(overlay) = ConfigOverlay::from_pyproject(&pyproject)? {
                debug!("Applying [tool.plugscan] from {:?}", pyproject);
                // `where` in pyproject is relative to the project directory
                let project_dir = config.root.clone();
                config.apply(overlay);
                if config.root.is_relative() && config.root != project_dir {
                    config.root = project_dir.join(&config.root);
                }
            }
        }

        Ok(config)
    }

    /// Apply a configuration layer on top of this one
    pub fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(root) = overlay.root {
            self.root = root;
        }
        if let Some(include) = overlay.include {
            self.include = include;
        }
        if let Some(exclude) = overlay.exclude {
            self.exclude = exclude;
        }
        if let Some(format) = overlay.format {
            self.format = format;
        }
        if let Some(output) = overlay.output {
            self.output = Some(output);
        }
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        let mut values = vec![
            ("where", self.root.display().to_string()),
            ("include", self.include.join(", ")),
            ("exclude", self.exclude.join(", ")),
            ("format", self.format.as_str().to_string()),
        ];
        if let Some(ref output) = self.output {
            values.push(("output", output.display().to_string()));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.include, vec!["*".to_string()]);
        assert!(config.exclude.is_empty());
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_overlay_only_replaces_set_fields() {
        let mut config = DiscoveryConfig::default();
        config.apply(ConfigOverlay {
            exclude: Some(vec!["tests".to_string(), "tests.*".to_string()]),
            ..Default::default()
        });
        assert_eq!(config.include, vec!["*".to_string()]);
        assert_eq!(config.exclude, vec!["tests", "tests.*"]);
    }

    #[test]
    fn test_pyproject_layer_wins_over_user_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let user_config = temp_dir.path().join("plugscan.toml");
        fs::write(&user_config, "format = \"entry-points\"\nexclude = [\"docs\"]\n")
            .unwrap_or_default();

        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap_or_default();
        fs::write(
            project.join("pyproject.toml"),
            r#"
[project]
name = "demo"

[tool.plugscan]
where = "src"
exclude = ["tests", "tests.*"]
"#,
        )
        .unwrap_or_default();

        let config = DiscoveryConfig::load_from(Some(&user_config), Some(&project));
        assert!(config.is_ok(), "config should load: {:?}", config.err());
        let config = config.unwrap_or_default();
        assert_eq!(config.format, OutputFormat::EntryPoints);
        assert_eq!(config.exclude, vec!["tests", "tests.*"]);
        assert_eq!(config.root, project.join("src"));
    }

    #[test]
    fn test_pyproject_without_tool_table() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let pyproject = temp_dir.path().join("pyproject.toml");
        fs::write(&pyproject, "[project]\nname = \"demo\"\n").unwrap_or_default();
        let overlay = ConfigOverlay::from_pyproject(&pyproject);
        assert!(matches!(overlay, Ok(None)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("plugscan.toml");
        fs::write(&path, "colour = \"blue\"\n").unwrap_or_default();
        let result = ConfigOverlay::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
    }

    #[test]
    fn test_missing_user_config_is_ignored() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let missing = temp_dir.path().join("nope.toml");
        let config = DiscoveryConfig::load_from(Some(&missing), Some(temp_dir.path()));
        assert!(config.is_ok_and(|c| c.root == temp_dir.path()));
    }
}
