//! Configuration management for syllabus.
//!
//! Parses `syllabus.toml` with serde and discovers it in the current
//! directory or its parents. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` and `${VAR:-default}`. Expanded fields:
//! - `docs.source_dir`
//! - `docs.sidebars`
//! - `placeholder.page`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override sidebar files.
    pub sidebars: Option<Vec<PathBuf>>,
    /// Override placeholder sentinel page.
    pub placeholder: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "syllabus.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Docs configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Placeholder sentinel configuration.
    pub placeholder: PlaceholderConfig,
    /// Advisory check configuration.
    pub check: CheckConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    sidebars: Option<Vec<String>>,
}

/// Resolved docs configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding the course pages.
    pub source_dir: PathBuf,
    /// Sidebar files; relative entries are relative to `source_dir`.
    pub sidebars: Vec<PathBuf>,
}

impl DocsConfig {
    /// Sidebar files as paths.
    #[must_use]
    pub fn sidebar_paths(&self) -> Vec<PathBuf> {
        self.sidebars
            .iter()
            .map(|s| self.source_dir.join(s))
            .collect()
    }
}

/// Placeholder sentinel configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Page id that stands in for unwritten lessons.
    pub page: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            page: "start.md".to_owned(),
        }
    }
}

/// Advisory check configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Report real pages that no sidebar entry links to.
    pub orphans: bool,
    /// Page ids excluded from the orphan check.
    pub ignore: Vec<String>,
    /// Placeholder ratio above which a warning is printed.
    pub max_placeholder_ratio: Option<f64>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            orphans: true,
            ignore: vec!["README.md".to_owned()],
            max_placeholder_ratio: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `syllabus.toml` in the current directory and parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(sidebars) = &settings.sidebars {
            self.docs_resolved.sidebars.clone_from(sidebars);
        }
        if let Some(placeholder) = &settings.placeholder {
            self.placeholder.page.clone_from(placeholder);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            placeholder: PlaceholderConfig::default(),
            check: CheckConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                sidebars: vec![PathBuf::from("_sidebar.md")],
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.placeholder.page, "placeholder.page")?;

        if self.docs_resolved.sidebars.is_empty() {
            return Err(ConfigError::Validation(
                "docs.sidebars must list at least one sidebar".to_owned(),
            ));
        }

        if let Some(ratio) = self.check.max_placeholder_ratio
            && !(0.0..=1.0).contains(&ratio)
        {
            return Err(ConfigError::Validation(format!(
                "check.max_placeholder_ratio must be between 0.0 and 1.0, got {ratio}"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source_dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(source_dir, "docs.source_dir")?);
        }
        if let Some(ref mut sidebars) = self.docs.sidebars {
            for sidebar in sidebars.iter_mut() {
                *sidebar = expand::expand_env(sidebar, "docs.sidebars")?;
            }
        }
        self.placeholder.page = expand::expand_env(&self.placeholder.page, "placeholder.page")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            sidebars: self.docs.sidebars.as_ref().map_or_else(
                || vec![PathBuf::from("_sidebar.md")],
                |sidebars| sidebars.iter().map(PathBuf::from).collect(),
            ),
        };
    }
}
