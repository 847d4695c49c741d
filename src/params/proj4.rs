//! proj4 definition string parsing

use super::{normalize_datum, normalize_unit, ProjParams};

/// Tokens that carry no information about the coordinate system itself.
const IGNORED_KEYS: &[&str] = &["no_defs", "type", "wktext", "title", "nadgrids"];

/// Split a proj4 string into `(key, value)` pairs.
///
/// Tokens without a leading `+` are skipped. Keys are lowercased.
fn tokens(text: &str) -> impl Iterator<Item = (String, Option<&str>)> {
    text.split_whitespace().filter_map(|token| {
        let body = token.strip_prefix('+')?;
        if body.is_empty() {
            return None;
        }
        Some(match body.split_once('=') {
            Some((key, value)) => (key.to_ascii_lowercase(), Some(value)),
            None => (body.to_ascii_lowercase(), None),
        })
    })
}

/// Reduce a proj4 string to a comparable form: sorted tokens, lowercased keys,
/// descriptive tokens (`+no_defs`, `+type=crs`, `+title=...`, ...) removed.
pub fn normalize_proj4(text: &str) -> String {
    let mut parts: Vec<String> = tokens(text)
        .filter(|(key, _)| !IGNORED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| match value {
            Some(value) => format!("+{}={}", key, value),
            None => format!("+{}", key),
        })
        .collect();
    parts.sort();
    parts.join(" ")
}

/// The EPSG code named by an `+init=epsg:<n>` token.
///
/// Other tokens are never searched, so `+title=epsg:9999` names no code.
pub fn init_code(text: &str) -> Option<u32> {
    tokens(text)
        .filter(|(key, _)| key == "init")
        .find_map(|(_, value)| {
            let (authority, code) = value?.split_once(':')?;
            if !authority.eq_ignore_ascii_case("epsg") {
                return None;
            }
            code.trim().parse().ok()
        })
}

fn number(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

pub(super) fn parse_proj4(text: &str) -> Option<ProjParams> {
    let mut params = ProjParams::default();

    for (key, value) in tokens(text) {
        match key.as_str() {
            "proj" => {
                params.proj_name = value.map(|v| match v.to_ascii_lowercase().as_str() {
                    "latlong" | "lonlat" | "latlon" => "longlat".to_string(),
                    other => other.to_string(),
                })
            }
            "ellps" => params.ellps = value.map(str::to_string),
            "datum" => params.datum_code = value.map(normalize_datum),
            "a" => params.a = number(value),
            "b" => params.b = number(value),
            "rf" => params.rf = number(value),
            "r" => {
                params.a = number(value);
                params.b = params.a;
            }
            "lat_0" => params.lat0 = number(value),
            "lat_1" => params.lat1 = number(value),
            "lat_2" => params.lat2 = number(value),
            "lat_ts" => params.lat_ts = number(value),
            "lon_0" => params.long0 = number(value),
            "x_0" => params.x0 = number(value),
            "y_0" => params.y0 = number(value),
            "k" | "k_0" => params.k0 = number(value),
            "units" => params.units = value.map(normalize_unit),
            "to_meter" => params.to_meter = number(value),
            "towgs84" => {
                params.datum_params = value.and_then(|v| {
                    v.split(',')
                        .map(|p| p.trim().parse::<f64>().ok())
                        .collect::<Option<Vec<f64>>>()
                })
            }
            "zone" => params.zone = value.and_then(|v| v.parse().ok()),
            "south" => params.utm_south = true,
            _ => {}
        }
    }

    params.proj_name.as_ref()?;

    params.expand_utm();
    params.resolve_ellipsoid();
    params.default_units();
    Some(params)
}
