//! EPSG code extraction from definition text

use super::Registry;
use crate::params::{init_code, normalize_proj4, ProjParams};
use crate::wkt::{parse_wkt, WktNode, WktValue};
use once_cell::sync::Lazy;
use regex::Regex;

/// `EPSG:4326`, `epsg:4326`, `urn:ogc:def:crs:EPSG::4326`
static EPSG_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bepsg::?(\d+)\b").unwrap());

/// Lowercase and keep only letters and digits.
fn squash(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Squashed name of the WKT root node, used to match against dataset entries.
pub(super) fn wkt_root_name(text: &str) -> Option<String> {
    let node = parse_wkt(text).ok()?;
    node.name().map(squash).filter(|name| !name.is_empty())
}

/// `AUTHORITY["EPSG","4326"]` or `ID["EPSG",4326]` directly under the root.
fn root_authority(root: &WktNode) -> Option<u32> {
    root.children()
        .filter(|child| child.is("AUTHORITY") || child.is("ID"))
        .find_map(|authority| {
            let name = authority.name()?;
            if !name.eq_ignore_ascii_case("EPSG") {
                return None;
            }
            match authority.args.get(1)? {
                WktValue::Text(code) | WktValue::Number(code) => code.trim().parse().ok(),
                _ => None,
            }
        })
}

fn marker(text: &str) -> Option<u32> {
    EPSG_MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|code| code.as_str().parse().ok())
}

impl Registry {
    /// Find the EPSG code a definition text refers to.
    ///
    /// proj4 text is matched by an `+init=epsg:<n>` token, then against the
    /// dataset's proj4 strings (ignoring token order and descriptive tokens).
    /// WKT is matched by a root-level authority node, then by its root name
    /// against the dataset's OGC and ESRI texts. A root name match counts only
    /// when the parsed parameters equal those of the dataset text it names.
    /// Anything else is searched for an `EPSG:<n>` marker.
    pub fn extract_epsg_code(&self, text: &str) -> Option<u32> {
        let text = text.trim();

        if text.starts_with('+') {
            let code =
                init_code(text).or_else(|| self.proj4_index.get(&normalize_proj4(text)).copied());
            tracing::trace!("proj4 code extraction: {:?}", code);
            return code;
        }

        if let Ok(root) = parse_wkt(text) {
            let code = root_authority(&root).or_else(|| self.code_by_root_name(&root, text));
            tracing::trace!("WKT code extraction: {:?}", code);
            return code;
        }

        marker(text)
    }

    fn code_by_root_name(&self, root: &WktNode, text: &str) -> Option<u32> {
        let name = squash(root.name()?);
        let named = self.wkt_names.get(&name)?;
        let params = ProjParams::from_wkt(text).map(|p| p.comparison_string());
        if params != named.params {
            tracing::debug!(
                "WKT root name {} matches EPSG:{} but its parameters differ",
                name,
                named.code
            );
            return None;
        }
        Some(named.code)
    }
}

/// Dataset code for one WKT root name, with the parameters of the text
/// that carried the name.
#[derive(Debug, Clone)]
pub(super) struct NamedWkt {
    pub code: u32,
    pub params: Option<String>,
}

impl NamedWkt {
    pub(super) fn new(code: u32, text: &str) -> Self {
        Self {
            code,
            params: ProjParams::from_wkt(text).map(|p| p.comparison_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::builtin()
    }

    #[test]
    fn test_root_authority_wins_over_nested() {
        let registry = registry();
        let wkt = registry.entry("EPSG:3857").unwrap().wkt.clone().unwrap();
        assert_eq!(registry.extract_epsg_code(&wkt), Some(3857));
    }

    #[test]
    fn test_wkt2_id() {
        let wkt = r#"GEOGCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]],ID["EPSG",4326]]"#;
        assert_eq!(registry().extract_epsg_code(wkt), Some(4326));
    }

    #[test]
    fn test_esri_wkt_by_root_name() {
        let registry = registry();
        let esri = registry.entry("EPSG:32617").unwrap().esriwkt.clone().unwrap();
        assert_eq!(registry.extract_epsg_code(&esri), Some(32617));
    }

    #[test]
    fn test_reordered_esri_wkt_keeps_code() {
        let wkt = r#"GEOGCS["GCS_WGS_1984",UNIT["Degree",0.017453292519943295],PRIMEM["Greenwich",0],DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]]]"#;
        assert_eq!(registry().extract_epsg_code(wkt), Some(4326));
    }

    #[test]
    fn test_reused_name_with_other_datum_has_no_code() {
        let wkt = r#"GEOGCS["WGS 84",DATUM["OSGB_1936",SPHEROID["Airy 1830",6377563.396,299.3249646]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;
        assert_eq!(registry().extract_epsg_code(wkt), None);
    }

    #[test]
    fn test_unknown_wkt_has_no_code() {
        let wkt = r#"GEOGCS["My Local System",DATUM["local",SPHEROID["x",6378000,298]]]"#;
        assert_eq!(registry().extract_epsg_code(wkt), None);
    }

    #[test]
    fn test_proj4_init_marker() {
        assert_eq!(
            registry().extract_epsg_code("+init=epsg:27700"),
            Some(27700)
        );
    }

    #[test]
    fn test_proj4_title_is_not_a_code() {
        assert_eq!(
            registry().extract_epsg_code("+proj=longlat +datum=WGS84 +title=epsg:9999"),
            Some(4326)
        );
        assert_eq!(
            registry().extract_epsg_code("+proj=merc +lon_0=10 +title=EPSG:3857"),
            None
        );
    }

    #[test]
    fn test_proj4_matches_dataset_ignoring_order() {
        assert_eq!(
            registry().extract_epsg_code("+no_defs +datum=WGS84 +proj=longlat"),
            Some(4326)
        );
        assert_eq!(
            registry().extract_epsg_code("+proj=utm +zone=17 +datum=WGS84 +units=m +type=crs"),
            Some(32617)
        );
    }

    #[test]
    fn test_proj4_without_match() {
        assert_eq!(
            registry().extract_epsg_code("+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs"),
            None
        );
    }

    #[test]
    fn test_plain_marker() {
        assert_eq!(
            registry().extract_epsg_code("urn:ogc:def:crs:EPSG::2154"),
            Some(2154)
        );
        assert_eq!(registry().extract_epsg_code("nothing here"), None);
    }

    #[test]
    fn test_wkt_root_name() {
        assert_eq!(
            wkt_root_name(r#"GEOGCS["GCS_WGS_1984",UNIT["Degree",1]]"#).as_deref(),
            Some("gcswgs1984")
        );
        assert_eq!(wkt_root_name("nope"), None);
    }
}
