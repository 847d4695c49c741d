//! Parsed projection parameters.
//!
//! [`ProjParams`] is the structured, in-memory form of a projection definition
//! (the "proj4js object"). It can be built from a proj4 definition string or
//! from WKT text, and both routes normalize names, units and ellipsoid axes so
//! that the same coordinate system yields the same [`ComparisonKey`].
//!
//! # Example
//!
//! ```
//! use ferro_srs::params::ProjParams;
//!
//! let from_proj4 = ProjParams::from_proj4("+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs").unwrap();
//! assert_eq!(from_proj4.proj_name.as_deref(), Some("tmerc"));
//! assert_eq!(from_proj4.long0, Some(15.0));
//! ```

mod ellipsoid;
mod from_wkt;
mod proj4;

pub use ellipsoid::{datum_ellipsoid, normalize_datum, Ellipsoid, ELLIPSOIDS};
pub use proj4::{init_code, normalize_proj4};

use serde::{Deserialize, Serialize};

/// Structured projection parameters.
///
/// Angles are in degrees. Field names follow the keys used by proj4js so that
/// serialized parameter objects are familiar to users of that library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjParams {
    /// Short projection name (`longlat`, `tmerc`, `merc`, `lcc`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proj_name: Option<String>,
    /// Ellipsoid name as given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellps: Option<String>,
    /// Normalized datum name (`wgs84`, `nad83`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum_code: Option<String>,
    /// Semi-major axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    /// Semi-minor axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    /// Inverse flattening
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rf: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat2: Option<f64>,
    /// Latitude of true scale
    #[serde(rename = "lat_ts", skip_serializing_if = "Option::is_none")]
    pub lat_ts: Option<f64>,
    /// Central meridian
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long0: Option<f64>,
    /// False easting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,
    /// False northing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
    /// Scale factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k0: Option<f64>,
    /// Linear or angular unit (`m`, `degrees`, `us-ft`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "to_meter", skip_serializing_if = "Option::is_none")]
    pub to_meter: Option<f64>,
    /// Seven- or three-parameter datum shift (`+towgs84`, `TOWGS84`)
    #[serde(rename = "datum_params", skip_serializing_if = "Option::is_none")]
    pub datum_params: Option<Vec<f64>>,
    /// UTM zone, when the definition used one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub utm_south: bool,
}

/// The ordered tuple compared by the deep-parameter equivalence tier:
/// `[projName, a, b, lat_ts, long0, x0, y0, k0, units, datumCode]`.
pub type ComparisonKey<'a> = (
    Option<&'a str>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<&'a str>,
    Option<&'a str>,
);

impl ProjParams {
    /// Parse a proj4 definition string.
    ///
    /// Returns `None` when the text has no `+proj` token.
    pub fn from_proj4(text: &str) -> Option<Self> {
        proj4::parse_proj4(text)
    }

    /// Parse WKT text into projection parameters.
    ///
    /// Malformed WKT, or WKT whose root is not a geographic, projected or
    /// compound coordinate system, yields `None`.
    pub fn from_wkt(text: &str) -> Option<Self> {
        let node = crate::wkt::parse_wkt(text).ok()?;
        from_wkt::params_from_node(&node)
    }

    /// Parse either a proj4 string or WKT text, choosing by the leading character.
    pub fn from_definition(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.starts_with('+') {
            Self::from_proj4(trimmed)
        } else {
            Self::from_wkt(trimmed)
        }
    }

    /// The tuple of parameters that decide whether two projections match.
    pub fn comparison_key(&self) -> ComparisonKey<'_> {
        (
            self.proj_name.as_deref(),
            self.a,
            self.b,
            self.lat_ts,
            self.long0,
            self.x0,
            self.y0,
            self.k0,
            self.units.as_deref(),
            self.datum_code.as_deref(),
        )
    }

    /// Serialized [`comparison_key`](Self::comparison_key).
    pub fn comparison_string(&self) -> String {
        serde_json::to_string(&self.comparison_key()).unwrap_or_default()
    }

    /// Fill `a`, `b` and `rf` from whatever ellipsoid information is present.
    ///
    /// Precedence: explicit axes, then the named ellipsoid, then the ellipsoid
    /// implied by the datum.
    pub(crate) fn resolve_ellipsoid(&mut self) {
        if self.a.is_none() {
            let named = self
                .ellps
                .as_deref()
                .and_then(Ellipsoid::lookup)
                .or_else(|| self.datum_code.as_deref().and_then(datum_ellipsoid));
            if let Some(ellipsoid) = named {
                self.a = Some(ellipsoid.a);
                if self.rf.is_none() && self.b.is_none() {
                    self.rf = ellipsoid.rf;
                    self.b = ellipsoid.b;
                }
            }
        }

        if let (Some(a), None) = (self.a, self.b) {
            self.b = Some(match self.rf {
                Some(rf) if rf != 0.0 => a * (1.0 - 1.0 / rf),
                _ => a,
            });
        }
    }

    /// Expand a UTM zone into explicit transverse Mercator parameters.
    pub(crate) fn expand_utm(&mut self) {
        if self.proj_name.as_deref() != Some("utm") {
            return;
        }
        self.proj_name = Some("tmerc".to_string());
        if let Some(zone) = self.zone {
            self.long0 = Some(f64::from(zone) * 6.0 - 183.0);
        }
        self.lat0 = Some(0.0);
        self.k0 = Some(0.9996);
        self.x0 = Some(500_000.0);
        self.y0 = Some(if self.utm_south { 10_000_000.0 } else { 0.0 });
    }

    /// Apply default units: degrees for geographic systems, metres otherwise.
    pub(crate) fn default_units(&mut self) {
        if self.units.is_none() {
            let units = if self.proj_name.as_deref() == Some("longlat") {
                "degrees"
            } else {
                "m"
            };
            self.units = Some(units.to_string());
        }
    }
}

/// Map a unit name from proj4 or WKT onto the short proj4 unit code.
pub fn normalize_unit(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    match lower.as_str() {
        "m" | "metre" | "meter" | "metres" | "meters" => "m".to_string(),
        "degree" | "degrees" | "deg" | "decimal_degree" => "degrees".to_string(),
        "us_ft" | "foot_us" | "us_survey_foot" | "foot_us_survey" => "us-ft".to_string(),
        "ft" | "foot" | "international_foot" | "foot_international" => "ft".to_string(),
        "km" | "kilometre" | "kilometer" => "km".to_string(),
        "radian" | "radians" | "rad" => "radians".to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_expansion() {
        let mut params = ProjParams {
            proj_name: Some("utm".to_string()),
            zone: Some(17),
            ..Default::default()
        };
        params.expand_utm();
        assert_eq!(params.proj_name.as_deref(), Some("tmerc"));
        assert_eq!(params.long0, Some(-81.0));
        assert_eq!(params.k0, Some(0.9996));
        assert_eq!(params.x0, Some(500_000.0));
        assert_eq!(params.y0, Some(0.0));
    }

    #[test]
    fn test_utm_south() {
        let mut params = ProjParams {
            proj_name: Some("utm".to_string()),
            zone: Some(56),
            utm_south: true,
            ..Default::default()
        };
        params.expand_utm();
        assert_eq!(params.long0, Some(153.0));
        assert_eq!(params.y0, Some(10_000_000.0));
    }

    #[test]
    fn test_resolve_ellipsoid_from_datum() {
        let mut params = ProjParams {
            datum_code: Some("wgs84".to_string()),
            ..Default::default()
        };
        params.resolve_ellipsoid();
        assert_eq!(params.a, Some(6_378_137.0));
        assert_eq!(params.rf, Some(298.257223563));
        let b = params.b.unwrap();
        assert!((b - 6_356_752.314_245).abs() < 1e-3);
    }

    #[test]
    fn test_resolve_ellipsoid_explicit_axes_win() {
        let mut params = ProjParams {
            ellps: Some("WGS84".to_string()),
            a: Some(6_378_137.0),
            b: Some(6_378_137.0),
            ..Default::default()
        };
        params.resolve_ellipsoid();
        assert_eq!(params.b, Some(6_378_137.0));
        assert_eq!(params.rf, None);
    }

    #[test]
    fn test_default_units() {
        let mut geographic = ProjParams {
            proj_name: Some("longlat".to_string()),
            ..Default::default()
        };
        geographic.default_units();
        assert_eq!(geographic.units.as_deref(), Some("degrees"));

        let mut projected = ProjParams {
            proj_name: Some("merc".to_string()),
            ..Default::default()
        };
        projected.default_units();
        assert_eq!(projected.units.as_deref(), Some("m"));
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("metre"), "m");
        assert_eq!(normalize_unit("Meter"), "m");
        assert_eq!(normalize_unit("Degree"), "degrees");
        assert_eq!(normalize_unit("US survey foot"), "us-ft");
        assert_eq!(normalize_unit("Foot_US"), "us-ft");
        assert_eq!(normalize_unit("link"), "link");
    }

    #[test]
    fn test_comparison_string_shape() {
        let params = ProjParams {
            proj_name: Some("longlat".to_string()),
            a: Some(1.0),
            units: Some("degrees".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.comparison_string(),
            r#"["longlat",1.0,null,null,null,null,null,null,"degrees",null]"#
        );
    }

    #[test]
    fn test_serde_keys() {
        let params = ProjParams {
            proj_name: Some("merc".to_string()),
            lat_ts: Some(0.0),
            datum_code: Some("wgs84".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["projName"], "merc");
        assert_eq!(json["lat_ts"], 0.0);
        assert_eq!(json["datumCode"], "wgs84");
        assert!(json.get("utmSouth").is_none());
    }

    #[test]
    fn test_from_definition_dispatch() {
        assert!(ProjParams::from_definition("  +proj=longlat +datum=WGS84").is_some());
        assert!(ProjParams::from_definition(
            r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],UNIT["degree",0.0174532925199433]]"#
        )
        .is_some());
        assert!(ProjParams::from_definition("nonsense").is_none());
    }
}
