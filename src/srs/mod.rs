//! SRS descriptors.
//!
//! An [`Srs`] is the normalized record for one coordinate reference system. It
//! is produced by [`SrsIdentifier::identify`] from any supported input shape
//! and never changes afterwards.
//!
//! # Examples
//!
//! ```
//! use ferro_srs::srs;
//!
//! let wgs84 = srs(4326).unwrap();
//! assert_eq!(wgs84.id(), Some("EPSG:4326"));
//! assert_eq!(wgs84.prj(), srs("EPSG:4326").unwrap().prj());
//! ```
//!
//! Passing a descriptor back in returns the same instance:
//!
//! ```
//! use std::borrow::Cow;
//! use ferro_srs::srs;
//!
//! let built = srs("EPSG:3857").unwrap().into_owned();
//! let again = srs(&built).unwrap();
//! assert!(matches!(again, Cow::Borrowed(r) if std::ptr::eq(r, &built)));
//! ```

mod builder;
mod classify;

pub use builder::SrsIdentifier;
pub use classify::{classify, InputClass, SrsInput};

use crate::error::SrsError;
use crate::params::ProjParams;
use serde::{Deserialize, Serialize};

/// Code meaning "user-defined projection": no registry lookup, no code-based
/// equivalence.
pub const USER_DEFINED_CODE: u32 = 32767;

/// OGC and ESRI WKT texts, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WktPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ogc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esri: Option<String>,
}

impl WktPair {
    pub fn is_empty(&self) -> bool {
        self.ogc.is_none() && self.esri.is_none()
    }
}

/// Parsed projection parameters plus the registry key they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proj4js {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obj: Option<ProjParams>,
}

/// Explicit field values applied before any derivation.
///
/// Every field set here survives identification unchanged. The same shape
/// is used internally for each derivation stage's contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsOverrides {
    pub code: Option<u32>,
    pub prj: Option<String>,
    pub proj4: Option<String>,
    pub proj4js: Option<Proj4js>,
    pub wkt: Option<WktPair>,
}

impl SrsOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_prj(mut self, prj: impl Into<String>) -> Self {
        self.prj = Some(prj.into());
        self
    }

    pub fn with_proj4(mut self, proj4: impl Into<String>) -> Self {
        self.proj4 = Some(proj4.into());
        self
    }

    pub fn with_proj4js(mut self, proj4js: Proj4js) -> Self {
        self.proj4js = Some(proj4js);
        self
    }

    pub fn with_wkt(mut self, wkt: WktPair) -> Self {
        self.wkt = Some(wkt);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A normalized spatial reference system descriptor.
///
/// Fields are read-only; build descriptors with [`SrsIdentifier`] or
/// [`srs`](crate::srs()).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Srs {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proj4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proj4js: Option<Proj4js>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wkt: Option<WktPair>,
}

impl Srs {
    /// Identify `input` with the default identifier, returning an owned
    /// descriptor.
    ///
    /// An already-built descriptor is cloned; use [`srs`](crate::srs()) to
    /// get the same instance back instead.
    pub fn new<'a>(input: impl Into<SrsInput<'a>>) -> Result<Srs, SrsError> {
        SrsIdentifier::global()
            .identify(input)
            .map(|srs| srs.into_owned())
    }

    /// Numeric EPSG code (may be [`USER_DEFINED_CODE`]).
    pub fn code(&self) -> Option<u32> {
        self.code
    }

    /// `EPSG:<code>`, present only for a non-sentinel code.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Preferred WKT text, OGC over ESRI.
    pub fn prj(&self) -> Option<&str> {
        self.prj.as_deref()
    }

    pub fn proj4(&self) -> Option<&str> {
        self.proj4.as_deref()
    }

    pub fn proj4js(&self) -> Option<&Proj4js> {
        self.proj4js.as_ref()
    }

    pub fn wkt(&self) -> Option<&WktPair> {
        self.wkt.as_ref()
    }

    pub fn wkt_ogc(&self) -> Option<&str> {
        self.wkt.as_ref()?.ogc.as_deref()
    }

    pub fn wkt_esri(&self) -> Option<&str> {
        self.wkt.as_ref()?.esri.as_deref()
    }

    /// The parsed projection parameter object, if any.
    pub fn params(&self) -> Option<&ProjParams> {
        self.proj4js.as_ref()?.obj.as_ref()
    }

    /// Returns true if the code is the user-defined sentinel.
    pub fn is_user_defined(&self) -> bool {
        self.code == Some(USER_DEFINED_CODE)
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Srs::default()
    }

    /// Compare this descriptor with any other input using the default
    /// identifier.
    pub fn eq_input<'a>(&self, other: impl Into<SrsInput<'a>>) -> Result<bool, SrsError> {
        SrsIdentifier::global().eq_input(self, other)
    }

    /// Fill every absent field from `patch`; fields already set are kept.
    ///
    /// `wkt.ogc`, `wkt.esri`, `proj4js.name` and `proj4js.obj` are filled
    /// independently of their siblings.
    pub(crate) fn fill_absent(&mut self, patch: SrsOverrides) {
        if self.code.is_none() {
            self.code = patch.code;
        }
        if self.prj.is_none() {
            self.prj = patch.prj;
        }
        if self.proj4.is_none() {
            self.proj4 = patch.proj4;
        }
        if let Some(incoming) = patch.proj4js {
            let current = self.proj4js.get_or_insert_with(Proj4js::default);
            if current.name.is_none() {
                current.name = incoming.name;
            }
            if current.obj.is_none() {
                current.obj = incoming.obj;
            }
        }
        if let Some(incoming) = patch.wkt {
            let current = self.wkt.get_or_insert_with(WktPair::default);
            if current.ogc.is_none() {
                current.ogc = incoming.ogc;
            }
            if current.esri.is_none() {
                current.esri = incoming.esri;
            }
        }
    }

    /// Derive `id` and `prj` once every other field is settled.
    pub(crate) fn finish(&mut self) {
        if self.id.is_none() {
            self.id = self
                .code
                .filter(|&code| code != USER_DEFINED_CODE)
                .map(|code| format!("EPSG:{}", code));
        }
        if self.prj.is_none() {
            self.prj = self
                .wkt
                .as_ref()
                .and_then(|wkt| wkt.ogc.clone().or_else(|| wkt.esri.clone()));
        }
    }
}

impl std::fmt::Display for Srs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.id, self.code, &self.proj4) {
            (Some(id), _, _) => write!(f, "{}", id),
            (None, Some(code), _) => write!(f, "custom ({})", code),
            (None, None, Some(proj4)) => write!(f, "{}", proj4),
            (None, None, None) if self.wkt.is_some() => write!(f, "WKT definition"),
            _ => write!(f, "unidentified"),
        }
    }
}
