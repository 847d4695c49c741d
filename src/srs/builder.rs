//! Descriptor construction

use super::classify::{classify, InputClass, SrsInput};
use super::{Proj4js, Srs, SrsOverrides, WktPair, USER_DEFINED_CODE};
use crate::config::{IdentifyConfig, ObjectCodePolicy};
use crate::equivalence::{EquivalenceChecker, EquivalenceOptions, EquivalenceResult};
use crate::error::SrsError;
use crate::object::{string_leaves, ObjectValue};
use crate::params::ProjParams;
use crate::registry::Registry;
use crate::wkt::{canonicalize, is_wkt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

/// WKT2 identifier node, e.g. `ID["EPSG",4326]`.
static WKT2_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bID\s*\[").unwrap());

static DEFAULT_IDENTIFIER: OnceLock<SrsIdentifier> = OnceLock::new();

/// What one identification branch contributes.
///
/// `primary` is merged before the registry lookup; `fallback` only fills what
/// is still absent after it.
#[derive(Default)]
struct Derived {
    primary: SrsOverrides,
    fallback: SrsOverrides,
}

/// Builds [`Srs`] descriptors against a shared registry.
///
/// # Examples
///
/// ```
/// use ferro_srs::{IdentifyConfig, Registry, SrsIdentifier};
///
/// let identifier = SrsIdentifier::new(Registry::global(), IdentifyConfig::default());
/// let srs = identifier.identify("EPSG:3857").unwrap();
/// assert_eq!(srs.code(), Some(3857));
/// assert!(srs.proj4().unwrap().starts_with("+proj=merc"));
///
/// assert!(identifier.equivalent(4326, "+proj=longlat +datum=WGS84 +no_defs").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SrsIdentifier {
    registry: Arc<Registry>,
    config: IdentifyConfig,
}

impl SrsIdentifier {
    pub fn new(registry: Arc<Registry>, config: IdentifyConfig) -> Self {
        Self { registry, config }
    }

    /// The process-wide identifier: the global registry and default settings.
    pub fn global() -> &'static SrsIdentifier {
        DEFAULT_IDENTIFIER
            .get_or_init(|| SrsIdentifier::new(Registry::global(), IdentifyConfig::default()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &IdentifyConfig {
        &self.config
    }

    /// Build a descriptor from `input`.
    pub fn identify<'a>(&self, input: impl Into<SrsInput<'a>>) -> Result<Cow<'a, Srs>, SrsError> {
        self.identify_with(input, SrsOverrides::default())
    }

    /// Build a descriptor from `input`, applying `overrides` first.
    ///
    /// An already-built descriptor is returned as the same instance and the
    /// overrides are not applied to it.
    ///
    /// # Errors
    ///
    /// [`SrsError::RegistryLookup`] when proj4 text names an EPSG code that
    /// has no registered definition. Every other unusable input produces a
    /// partial or empty descriptor.
    pub fn identify_with<'a>(
        &self,
        input: impl Into<SrsInput<'a>>,
        overrides: SrsOverrides,
    ) -> Result<Cow<'a, Srs>, SrsError> {
        let level = self.config.log_level();
        let class = classify(input.into());
        event_at!(level, "Classified input as {}", class.name());

        let derived = match class {
            InputClass::Normalized(existing) => {
                if !overrides.is_empty() {
                    tracing::debug!("Overrides ignored for an already-built descriptor");
                }
                return Ok(Cow::Borrowed(existing));
            }
            InputClass::Code(code) => Derived {
                primary: SrsOverrides::new().with_code(code),
                ..Default::default()
            },
            InputClass::Wkt(text) => self.derive_from_wkt(text),
            InputClass::Proj4(text) => self.derive_from_proj4(text)?,
            InputClass::Object(value) => self.derive_from_object(&value),
            InputClass::Unclassified => Derived::default(),
        };

        let mut srs = Srs::default();
        srs.fill_absent(overrides);
        srs.fill_absent(derived.primary);
        self.merge_registry(&mut srs);
        srs.fill_absent(derived.fallback);
        srs.finish();

        event_at!(level, "Identified {}", srs);
        Ok(Cow::Owned(srs))
    }

    fn derive_from_wkt(&self, text: String) -> Derived {
        let is_ogc = text.contains("AUTHORITY") || WKT2_ID.is_match(&text);
        let code = self.registry.extract_epsg_code(&text);
        let params = ProjParams::from_wkt(&text);
        event_at!(
            self.config.log_level(),
            "WKT input: dialect={}, code={:?}, parsed={}",
            if is_ogc { "ogc" } else { "esri" },
            code,
            params.is_some()
        );

        let wkt = if is_ogc {
            WktPair {
                ogc: Some(text),
                esri: None,
            }
        } else {
            WktPair {
                ogc: None,
                esri: Some(text),
            }
        };
        let parsed = params.map(|obj| Proj4js {
            name: None,
            obj: Some(obj),
        });

        match code {
            // The registry definition, when there is one, takes precedence
            // over the parsed text.
            Some(code) => Derived {
                primary: SrsOverrides {
                    code: Some(code),
                    wkt: Some(wkt),
                    ..Default::default()
                },
                fallback: SrsOverrides {
                    proj4js: parsed,
                    ..Default::default()
                },
            },
            None => Derived {
                primary: SrsOverrides {
                    wkt: Some(wkt),
                    proj4js: parsed,
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    fn derive_from_proj4(&self, text: String) -> Result<Derived, SrsError> {
        match self.registry.extract_epsg_code(&text) {
            Some(code) => {
                let id = format!("EPSG:{}", code);
                if !self.registry.has_definition(&id) {
                    return Err(SrsError::RegistryLookup { id });
                }
                event_at!(self.config.log_level(), "proj4 input names {}", id);
                Ok(Derived {
                    primary: SrsOverrides::new().with_code(code),
                    fallback: SrsOverrides::new().with_proj4(text),
                })
            }
            None => {
                event_at!(self.config.log_level(), "proj4 input has no EPSG code");
                let obj = ProjParams::from_proj4(&text);
                Ok(Derived {
                    primary: SrsOverrides {
                        proj4: Some(text),
                        proj4js: obj.map(|obj| Proj4js {
                            name: None,
                            obj: Some(obj),
                        }),
                        ..Default::default()
                    },
                    ..Default::default()
                })
            }
        }
    }

    fn derive_from_object(&self, value: &ObjectValue) -> Derived {
        let level = self.config.log_level();
        let mut code = None;
        let mut proj4 = None;
        let mut unmatched_wkt = None;

        for leaf in string_leaves(value, self.config.max_object_depth) {
            let leaf = leaf.trim();
            if leaf.starts_with('+') {
                event_at!(level, "Object leaf looks like proj4: {}", leaf);
                if proj4.is_none() {
                    proj4 = Some(leaf.to_string());
                }
            } else if is_wkt(leaf) {
                let Some(found) = self.registry.extract_epsg_code(leaf) else {
                    if unmatched_wkt.is_none() {
                        unmatched_wkt = Some(leaf.to_string());
                    }
                    continue;
                };
                event_at!(level, "Object WKT leaf yields EPSG:{}", found);
                code = match (self.config.object_code_policy, code) {
                    (ObjectCodePolicy::FirstMatch, Some(first)) => Some(first),
                    _ => Some(found),
                };
            }
        }

        let mut derived = Derived {
            primary: SrsOverrides {
                code,
                ..Default::default()
            },
            ..Default::default()
        };
        if code.is_none() && self.config.assign_embedded_proj4 {
            if let Some(text) = proj4 {
                derived.primary.proj4js = ProjParams::from_proj4(&text).map(|obj| Proj4js {
                    name: None,
                    obj: Some(obj),
                });
                derived.primary.proj4 = Some(text);
            }
        }
        if code.is_none() && self.config.assign_embedded_wkt {
            if let Some(text) = unmatched_wkt {
                event_at!(level, "Object WKT leaf has no code; assigning its text");
                let from_wkt = self.derive_from_wkt(text).primary;
                derived.primary.wkt = from_wkt.wkt;
                if derived.primary.proj4js.is_none() {
                    derived.primary.proj4js = from_wkt.proj4js;
                }
            }
        }
        derived
    }

    /// Fill absent fields from the registry for a non-sentinel code.
    ///
    /// WKT texts taken from the registry are canonicalized so later string
    /// comparisons do not depend on child node order.
    fn merge_registry(&self, srs: &mut Srs) {
        let Some(code) = srs.code().filter(|&code| code != USER_DEFINED_CODE) else {
            return;
        };
        let id = format!("EPSG:{}", code);
        let Some(bundle) = self.registry.lookup(&id) else {
            event_at!(self.config.log_level(), "{} is not in the registry", id);
            return;
        };

        let wkt = WktPair {
            ogc: bundle
                .wkt_ogc
                .filter(|_| srs.wkt_ogc().is_none())
                .map(canonical_or_raw),
            esri: bundle
                .wkt_esri
                .filter(|_| srs.wkt_esri().is_none())
                .map(canonical_or_raw),
        };
        srs.fill_absent(SrsOverrides {
            proj4: bundle.proj4,
            proj4js: bundle.proj4js,
            wkt: (!wkt.is_empty()).then_some(wkt),
            ..Default::default()
        });
    }

    /// Build both inputs and compare them.
    pub fn compare<'a, 'b>(
        &self,
        a: impl Into<SrsInput<'a>>,
        b: impl Into<SrsInput<'b>>,
    ) -> Result<EquivalenceResult, SrsError> {
        self.compare_with(a, b, EquivalenceOptions::default())
    }

    /// Build both inputs and compare them with explicit options.
    pub fn compare_with<'a, 'b>(
        &self,
        a: impl Into<SrsInput<'a>>,
        b: impl Into<SrsInput<'b>>,
        options: EquivalenceOptions,
    ) -> Result<EquivalenceResult, SrsError> {
        let a = self.identify(a)?;
        let b = self.identify(b)?;
        Ok(self.checker(options).check(&a, &b))
    }

    /// Returns true if both inputs denote the same coordinate system.
    pub fn equivalent<'a, 'b>(
        &self,
        a: impl Into<SrsInput<'a>>,
        b: impl Into<SrsInput<'b>>,
    ) -> Result<bool, SrsError> {
        Ok(self.compare(a, b)?.is_equivalent())
    }

    /// Compare an already-built descriptor with another input.
    pub fn eq_input<'b>(&self, srs: &Srs, other: impl Into<SrsInput<'b>>) -> Result<bool, SrsError> {
        let other = self.identify(other)?;
        Ok(self
            .checker(EquivalenceOptions::default())
            .check(srs, &other)
            .is_equivalent())
    }

    fn checker(&self, options: EquivalenceOptions) -> EquivalenceChecker {
        EquivalenceChecker::new(self.config.wkt_comparison)
            .with_debug(options.debug || self.config.debug)
    }
}

fn canonical_or_raw(text: String) -> String {
    canonicalize(&text).unwrap_or(text)
}
