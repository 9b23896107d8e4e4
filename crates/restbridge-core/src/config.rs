//! Generation run configuration.
//!
//! Loaded from a TOML document. Carries the package-to-module assignment,
//! type overrides, class filters, name mappers and generator options.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::filter::ClassFilter;
use crate::names::NameMapper;

/// Root configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Module assignment, one entry per backend package.
    pub modules: Vec<ModuleEntry>,

    /// Type mapping configuration.
    #[serde(default)]
    pub types: TypeConfig,

    /// Class selection.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Class naming.
    #[serde(default)]
    pub names: NameConfig,

    /// Concrete generator options.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BridgeError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// One package-to-module assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Backend package name.
    pub package: String,

    /// Target module name.
    pub name: String,

    /// Output directory, relative to the output root.
    #[serde(default)]
    pub path: PathBuf,

    /// Library-provided module: imported by name, no local file emitted.
    #[serde(default)]
    pub external: bool,
}

/// Policy for a backend type with neither a primitive mapping nor a
/// registered class or enum definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTypePolicy {
    /// Emit the permissive `any` placeholder and log a warning.
    #[default]
    Any,
    /// Reject generation.
    Fail,
}

/// Type mapping section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Custom mappings from qualified backend names to target primitive
    /// names (`"number"`, `"string"`, `"boolean"`, `"date"`, `"any"`).
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,

    /// What to do with an unmapped, unconvertible backend type.
    #[serde(default)]
    pub missing: MissingTypePolicy,
}

/// Class selection section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Condition for model classes.
    #[serde(default)]
    pub model: FilterSpec,

    /// Condition for REST classes.
    #[serde(default)]
    pub rest: FilterSpec,
}

/// Class naming section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameConfig {
    /// Name mapping for model classes.
    #[serde(default)]
    pub model: NameMapper,

    /// Name mapping for REST classes.
    #[serde(default)]
    pub rest: NameMapper,
}

/// Concrete generator section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Module name of the backend URL service; generated paths are prefixed
    /// with `this.urlService.getBackendUrl()` when set.
    #[serde(default)]
    pub url_service_module: Option<String>,

    /// Output directory of the URL service module.
    #[serde(default)]
    pub url_service_path: Option<PathBuf>,
}

/// Serializable form of a [`ClassFilter`] predicate tree.
///
/// Regex patterns are carried as strings and compiled by [`FilterSpec::build`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSpec {
    /// Accept every class.
    #[default]
    All,
    /// Accept classes carrying the named annotation.
    HasAnnotation(String),
    /// Accept classes whose simple name contains the substring.
    NameContains(String),
    /// Accept classes whose simple name matches the pattern.
    NameRegex(String),
    /// Accept classes that transitively extend the qualified type name.
    Extends(String),
    /// Accept classes matching every child.
    And(Vec<FilterSpec>),
    /// Accept classes matching any child.
    Or(Vec<FilterSpec>),
    /// Invert the child.
    Not(Box<FilterSpec>),
}

impl FilterSpec {
    /// Compile into a runtime filter, rejecting invalid regex patterns.
    pub fn build(&self) -> Result<ClassFilter> {
        Ok(match self {
            FilterSpec::All => ClassFilter::All,
            FilterSpec::HasAnnotation(name) => ClassFilter::HasAnnotation(name.clone()),
            FilterSpec::NameContains(substr) => ClassFilter::NameContains(substr.clone()),
            FilterSpec::NameRegex(pattern) => ClassFilter::name_regex(pattern)?,
            FilterSpec::Extends(name) => ClassFilter::Extends(name.clone()),
            FilterSpec::And(children) => {
                ClassFilter::And(children.iter().map(|c| c.build()).collect::<Result<_>>()?)
            }
            FilterSpec::Or(children) => {
                ClassFilter::Or(children.iter().map(|c| c.build()).collect::<Result<_>>()?)
            }
            FilterSpec::Not(child) => ClassFilter::Not(Box::new(child.build()?)),
        })
    }
}
