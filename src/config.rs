//! Identification settings and configuration file support.
//!
//! [`IdentifyConfig`] holds the policies used while building descriptors and
//! comparing them. [`FerroSrsConfig`] is the parsed form of a `.ferro-srs.toml`
//! file.
//!
//! # Example Configuration
//!
//! ```toml
//! [identify]
//! object-code-policy = "first-match"
//! assign-embedded-proj4 = false
//! assign-embedded-wkt = false
//! wkt-comparison = "composite"
//! max-object-depth = 32
//!
//! [registry]
//! definitions = ["/data/extra-epsg.json"]
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-srs.toml` in current directory
//! 2. `~/.config/ferro-srs/config.toml`
//!
//! CLI flags take precedence over config file settings.

use crate::error::SrsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which code wins when several WKT leaves of an object yield EPSG codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectCodePolicy {
    /// Each successful extraction replaces the previous one
    #[default]
    LastMatch,
    /// The first successful extraction is kept
    FirstMatch,
}

impl std::fmt::Display for ObjectCodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectCodePolicy::LastMatch => write!(f, "last-match"),
            ObjectCodePolicy::FirstMatch => write!(f, "first-match"),
        }
    }
}

impl std::str::FromStr for ObjectCodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last-match" | "last" => Ok(ObjectCodePolicy::LastMatch),
            "first-match" | "first" => Ok(ObjectCodePolicy::FirstMatch),
            _ => Err(format!("Invalid object code policy: {}", s)),
        }
    }
}

/// How the WKT tier of the equivalence check compares descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WktComparison {
    /// Compare canonicalized OGC texts, then canonicalized ESRI texts
    #[default]
    Dialects,
    /// Compare the `{ogc, esri}` pair as one value
    Composite,
}

impl std::fmt::Display for WktComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WktComparison::Dialects => write!(f, "dialects"),
            WktComparison::Composite => write!(f, "composite"),
        }
    }
}

impl std::str::FromStr for WktComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dialects" => Ok(WktComparison::Dialects),
            "composite" => Ok(WktComparison::Composite),
            _ => Err(format!("Invalid WKT comparison: {}", s)),
        }
    }
}

/// Settings for descriptor construction and equivalence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IdentifyConfig {
    /// Maximum nesting followed when walking object graphs (default: 64)
    pub max_object_depth: usize,

    /// Which WKT leaf decides the code of an object input
    pub object_code_policy: ObjectCodePolicy,

    /// Whether a `+`-prefixed leaf of an object input fills `proj4`
    pub assign_embedded_proj4: bool,

    /// Whether the first WKT leaf of an object input fills `wkt` and the
    /// parameter object when no leaf yields a code
    pub assign_embedded_wkt: bool,

    /// WKT tier comparison mode
    pub wkt_comparison: WktComparison,

    /// Log every identification branch and comparison tier at info level
    pub debug: bool,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            max_object_depth: 64,
            object_code_policy: ObjectCodePolicy::LastMatch,
            assign_embedded_proj4: true,
            assign_embedded_wkt: true,
            wkt_comparison: WktComparison::Dialects,
            debug: false,
        }
    }
}

impl IdentifyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproduce the historical behavior: last object match wins, embedded
    /// proj4 and code-less WKT leaves are not assigned, WKT pairs are compared
    /// as one value.
    pub fn legacy() -> Self {
        Self {
            object_code_policy: ObjectCodePolicy::LastMatch,
            assign_embedded_proj4: false,
            assign_embedded_wkt: false,
            wkt_comparison: WktComparison::Composite,
            ..Default::default()
        }
    }

    /// Set the object walk depth cap
    pub fn with_max_object_depth(mut self, depth: usize) -> Self {
        self.max_object_depth = depth;
        self
    }

    /// Set the object code policy
    pub fn with_object_code_policy(mut self, policy: ObjectCodePolicy) -> Self {
        self.object_code_policy = policy;
        self
    }

    /// Enable or disable assigning embedded proj4 leaves
    pub fn with_embedded_proj4(mut self, assign: bool) -> Self {
        self.assign_embedded_proj4 = assign;
        self
    }

    /// Enable or disable assigning a code-less embedded WKT leaf
    pub fn with_embedded_wkt(mut self, assign: bool) -> Self {
        self.assign_embedded_wkt = assign;
        self
    }

    /// Set the WKT tier comparison mode
    pub fn with_wkt_comparison(mut self, comparison: WktComparison) -> Self {
        self.wkt_comparison = comparison;
        self
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Log level used for branch and tier decisions.
    pub(crate) fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::INFO
        } else {
            tracing::Level::DEBUG
        }
    }
}

/// Registry section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Extra dataset files (JSON arrays of entries) loaded at startup
    pub definitions: Vec<PathBuf>,
}

/// Parsed configuration from a `.ferro-srs.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerroSrsConfig {
    pub identify: IdentifyConfig,
    pub registry: RegistryConfig,
}

impl FerroSrsConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-srs.toml` in current directory
    /// 2. `~/.config/ferro-srs/config.toml`
    ///
    /// A file that exists but does not parse is reported and skipped.
    pub fn load() -> Option<Self> {
        let home_config =
            dirs_home().map(|home| home.join(".config").join("ferro-srs").join("config.toml"));

        for path in std::iter::once(PathBuf::from(".ferro-srs.toml")).chain(home_config) {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => return Some(config),
                Err(err) => tracing::warn!("Ignoring {}: {}", path.display(), err),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, SrsError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, SrsError> {
        let config: FerroSrsConfig = toml::from_str(content)?;
        if config.identify.max_object_depth == 0 {
            return Err(SrsError::Config {
                msg: "max-object-depth must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
