//! Configuration management for the tag scheme validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (tagscheme.toml)
//! - Environment variables (TAGSCHEME__*)
//!
//! ## Example config file (tagscheme.toml):
//! ```toml
//! [validator]
//! scheme = "0Y.0M.MICRO"
//! date_policy = "today"
//!
//! [repository]
//! path = "."
//!
//! [components]
//! BUILD = "numeric"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::component::{ComponentRule, DatePolicy, ValidatorRegistry};
use crate::error::Result;

const FILE_NAME: &str = "tagscheme.toml";
const ENV_PREFIX: &str = "TAGSCHEME";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagSchemeConfig {
    /// Validation settings
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Repository settings
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Extra scheme keywords
    #[serde(default)]
    pub components: ComponentConfig,
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Scheme used when none is given on the command line
    #[serde(default)]
    pub scheme: Option<String>,

    /// How `0Y` / `0M` components are judged
    #[serde(default)]
    pub date_policy: DatePolicy,
}

/// Repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Path inside the repository whose tags are checked
    #[serde(default = "default_repository_path")]
    pub path: PathBuf,
}

/// Keyword -> rule mappings added on top of the built-ins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(flatten)]
    pub mappings: BTreeMap<String, ComponentRule>,
}

fn default_repository_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: default_repository_path(),
        }
    }
}

impl TagSchemeConfig {
    /// Layer every config file found, then `explicit` (which must exist),
    /// then `TAGSCHEME__*` variables such as `TAGSCHEME__VALIDATOR__SCHEME`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let discovered = candidate_files()
            .into_iter()
            .map(|path| File::from(path).required(false));
        let chosen = explicit.map(|path| File::from(path.to_path_buf()).required(true));

        let layered = discovered
            .chain(chosen)
            .fold(Config::builder(), |builder, file| builder.add_source(file))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    /// Write this configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Registry for `today` with the configured date policy and extra keywords.
    /// Keywords are upper-cased since config sources may fold key case.
    pub fn registry(&self, today: chrono::NaiveDate) -> Result<ValidatorRegistry> {
        let mut registry = ValidatorRegistry::new(today).with_date_policy(self.validator.date_policy);
        for (keyword, rule) in &self.components.mappings {
            registry.register(keyword.to_ascii_uppercase(), *rule)?;
        }
        Ok(registry)
    }

    /// Repository path, relative paths taken from the working directory
    pub fn repository_path(&self) -> Result<PathBuf> {
        let path = &self.repository.path;
        if path.is_absolute() {
            return Ok(path.clone());
        }
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Config files searched in the working directory, then the user config dir.
/// Later entries override earlier ones.
fn candidate_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = [FILE_NAME, ".tagscheme.toml", "config/tagscheme.toml"]
        .into_iter()
        .map(PathBuf::from)
        .collect();

    if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "tagscheme") {
        let user_file = dirs.config_dir().join(FILE_NAME);
        if user_file.exists() {
            files.push(user_file);
        }
    }

    files
}
