//! EPSG registry lookup.
//!
//! The [`Registry`] combines two independent sources:
//!
//! - the static dataset, mapping `EPSG:<code>` to known proj4 and WKT texts
//! - the live projection definition table, mapping `EPSG:<code>` to parsed
//!   [`ProjParams`]
//!
//! The definition table is filled by [`Registry::bootstrap`], which registers
//! each dataset entry's proj4 string, falling back to its WKT text when no proj4
//! string is present. A registry is built and bootstrapped once, then shared
//! read-only behind an [`Arc`].
//!
//! # Example
//!
//! ```
//! use ferro_srs::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let bundle = registry.lookup("EPSG:4326").unwrap();
//! assert_eq!(bundle.proj4.as_deref(), Some("+proj=longlat +datum=WGS84 +no_defs"));
//! assert!(bundle.proj4js.is_some());
//!
//! assert!(registry.lookup("EPSG:1").is_none());
//! ```

mod extract;

use crate::error::SrsError;
use crate::params::ProjParams;
use crate::srs::Proj4js;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Embedded EPSG dataset.
const BUILTIN_DATASET: &str = include_str!("../../data/epsg.json");

/// Process-wide registry built from the embedded dataset.
static GLOBAL_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// One record of the static EPSG dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Canonical identifier, `EPSG:<code>`
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj4: Option<String>,
    /// OGC WKT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
    /// ESRI WKT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esriwkt: Option<String>,
}

impl DatasetEntry {
    /// The numeric code in the identifier, if it has the `EPSG:<code>` form.
    pub fn code(&self) -> Option<u32> {
        self.id.strip_prefix("EPSG:")?.parse().ok()
    }
}

/// Everything the registry knows about one identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistryBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proj4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wkt_ogc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wkt_esri: Option<String>,
    /// Present only when the live definition table has the identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proj4js: Option<Proj4js>,
}

/// Static EPSG dataset plus the live projection definition table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    dataset: HashMap<String, DatasetEntry>,
    definitions: HashMap<String, ProjParams>,
    /// Squashed WKT root names (OGC and ESRI) to EPSG code
    wkt_names: HashMap<String, extract::NamedWkt>,
    /// Normalized proj4 strings to EPSG code
    proj4_index: HashMap<String, u32>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and bootstrap a registry from dataset entries.
    pub fn from_entries(entries: impl IntoIterator<Item = DatasetEntry>) -> Self {
        let mut registry = Self::new();
        registry.insert_entries(entries);
        registry.bootstrap();
        registry
    }

    /// Build a registry from the embedded dataset.
    pub fn builtin() -> Self {
        match Self::from_json_str(BUILTIN_DATASET) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::error!("Embedded EPSG dataset could not be loaded: {}", err);
                Self::new()
            }
        }
    }

    /// The shared registry built from the embedded dataset.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(Self::builtin())))
    }

    /// Build a registry from a JSON array of dataset entries.
    pub fn from_json_str(content: &str) -> Result<Self, SrsError> {
        let entries: Vec<DatasetEntry> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    /// Build a registry from a JSON file of dataset entries.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, SrsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add the entries of a JSON file and bootstrap them.
    ///
    /// Entries with an identifier already present replace the dataset record,
    /// but a definition already registered for that identifier is kept.
    pub fn extend_from_json(&mut self, path: impl AsRef<Path>) -> Result<usize, SrsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<DatasetEntry> = serde_json::from_str(&content)?;
        let count = entries.len();
        self.insert_entries(entries);
        self.bootstrap();
        tracing::debug!(
            "Loaded {} dataset entries from {}",
            count,
            path.as_ref().display()
        );
        Ok(count)
    }

    fn insert_entries(&mut self, entries: impl IntoIterator<Item = DatasetEntry>) {
        for entry in entries {
            let Some(code) = entry.code() else {
                tracing::warn!("Dataset entry {} has no EPSG code; skipping", entry.id);
                continue;
            };
            self.index_entry(&entry, code);
            self.dataset.insert(entry.id.clone(), entry);
        }
    }

    fn index_entry(&mut self, entry: &DatasetEntry, code: u32) {
        for text in [&entry.wkt, &entry.esriwkt].into_iter().flatten() {
            if let Some(name) = extract::wkt_root_name(text) {
                self.wkt_names
                    .entry(name)
                    .or_insert_with(|| extract::NamedWkt::new(code, text));
            }
        }
        if let Some(proj4) = &entry.proj4 {
            self.proj4_index
                .entry(crate::params::normalize_proj4(proj4))
                .or_insert(code);
        }
    }

    /// Register every dataset entry that has no definition yet.
    ///
    /// Each entry contributes its proj4 string, else its OGC WKT, else its ESRI
    /// WKT. Running it again changes nothing.
    pub fn bootstrap(&mut self) -> usize {
        let mut registered = 0;
        for (id, entry) in &self.dataset {
            if self.definitions.contains_key(id) {
                continue;
            }
            let params = [&entry.proj4, &entry.wkt, &entry.esriwkt]
                .into_iter()
                .flatten()
                .find_map(|text| ProjParams::from_definition(text));
            match params {
                Some(params) => {
                    self.definitions.insert(id.clone(), params);
                    registered += 1;
                }
                None => tracing::warn!("No usable definition for {}; skipping", id),
            }
        }
        tracing::trace!("Bootstrap registered {} definitions", registered);
        registered
    }

    /// Register one definition (proj4 or WKT) under `id`, replacing any
    /// existing one.
    pub fn define(&mut self, id: impl Into<String>, text: &str) -> Result<(), SrsError> {
        let id = id.into();
        match ProjParams::from_definition(text) {
            Some(params) => {
                self.definitions.insert(id, params);
                Ok(())
            }
            None => Err(SrsError::InvalidDefinition { id }),
        }
    }

    /// Merge what both sources know about `id`.
    ///
    /// Returns `None` when neither source has the identifier.
    pub fn lookup(&self, id: &str) -> Option<RegistryBundle> {
        let entry = self.dataset.get(id);
        let definition = self.definitions.get(id);
        if entry.is_none() && definition.is_none() {
            return None;
        }
        Some(RegistryBundle {
            proj4: entry.and_then(|e| e.proj4.clone()),
            wkt_ogc: entry.and_then(|e| e.wkt.clone()),
            wkt_esri: entry.and_then(|e| e.esriwkt.clone()),
            proj4js: definition.map(|obj| Proj4js {
                name: Some(id.to_string()),
                obj: Some(obj.clone()),
            }),
        })
    }

    /// Static dataset record for `id`.
    pub fn entry(&self, id: &str) -> Option<&DatasetEntry> {
        self.dataset.get(id)
    }

    /// Live definition for `id`.
    pub fn definition(&self, id: &str) -> Option<&ProjParams> {
        self.definitions.get(id)
    }

    /// Returns true if the live definition table has `id`.
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Number of static dataset entries.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Number of live definitions.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }
}
