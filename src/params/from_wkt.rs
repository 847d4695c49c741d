//! Projection parameters from a WKT node tree

use super::{normalize_datum, normalize_unit, ProjParams};
use crate::wkt::WktNode;

const GEOGRAPHIC: &[&str] = &[
    "GEOGCS",
    "GEOGCRS",
    "GEODCRS",
    "GEODETICCRS",
    "GEOGRAPHICCRS",
];
const BASE_GEOGRAPHIC: &[&str] = &["GEOGCS", "BASEGEOGCRS", "BASEGEODCRS"];
const PROJECTED: &[&str] = &["PROJCS", "PROJCRS", "PROJECTEDCRS"];
const COMPOUND: &[&str] = &["COMPD_CS", "COMPOUNDCRS"];

/// Map a WKT projection (method) name onto a proj short name.
fn projection_name(name: &str) -> String {
    let key = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    let short = match key.as_str() {
        "transverse_mercator" | "gauss_kruger" | "transverse_mercator_south_orientated" => "tmerc",
        "mercator" | "mercator_1sp" | "mercator_2sp" | "mercator_auxiliary_sphere"
        | "popular_visualisation_pseudo_mercator" | "mercator_(variant_a)"
        | "mercator_(variant_b)" => "merc",
        "lambert_conformal_conic"
        | "lambert_conformal_conic_1sp"
        | "lambert_conformal_conic_2sp"
        | "lambert_conic_conformal_(1sp)"
        | "lambert_conic_conformal_(2sp)" => "lcc",
        "albers_conic_equal_area" | "albers" | "albers_equal_area" => "aea",
        "polar_stereographic" => "stere",
        "oblique_stereographic" | "double_stereographic" => "sterea",
        "lambert_azimuthal_equal_area" => "laea",
        "equirectangular" | "equidistant_cylindrical" | "plate_carree" => "eqc",
        "hotine_oblique_mercator" | "hotine_oblique_mercator_azimuth_center" => "omerc",
        "cassini_soldner" | "cassini" => "cass",
        _ => return key,
    };
    short.to_string()
}

/// Read the datum, ellipsoid and datum shift from a geographic CRS node.
fn apply_geographic(params: &mut ProjParams, geog: &WktNode) {
    if let Some(datum) = geog.find(&["DATUM", "GEODETICDATUM", "TRF"]) {
        if let Some(name) = datum.name() {
            params.datum_code = Some(normalize_datum(name));
        }
        if let Some(spheroid) = datum.child(&["SPHEROID", "ELLIPSOID"]) {
            params.ellps = spheroid.name().map(str::to_string);
            params.a = spheroid.number_at(1);
            params.rf = spheroid.number_at(2);
        }
        if let Some(shift) = datum.child(&["TOWGS84"]) {
            let values: Option<Vec<f64>> = shift
                .args
                .iter()
                .map(crate::wkt::WktValue::as_f64)
                .collect();
            params.datum_params = values;
        }
    }
}

/// `PARAMETER` nodes directly under the root, or under its `CONVERSION` (WKT2).
fn parameters(root: &WktNode) -> Vec<&WktNode> {
    let mut found: Vec<&WktNode> = root.children().filter(|c| c.is("PARAMETER")).collect();
    if let Some(conversion) = root.child(&["CONVERSION"]) {
        found.extend(conversion.children().filter(|c| c.is("PARAMETER")));
    }
    found
}

fn apply_parameter(params: &mut ProjParams, name: &str, value: f64) {
    let key = name.trim().to_ascii_lowercase().replace(' ', "_");
    match key.as_str() {
        "central_meridian" | "longitude_of_center" | "longitude_of_origin"
        | "longitude_of_natural_origin" | "longitude_of_false_origin" => params.long0 = Some(value),
        "latitude_of_origin" | "latitude_of_center" | "latitude_of_natural_origin"
        | "latitude_of_false_origin" => params.lat0 = Some(value),
        "standard_parallel_1" | "latitude_of_1st_standard_parallel" => params.lat1 = Some(value),
        "standard_parallel_2" | "latitude_of_2nd_standard_parallel" => params.lat2 = Some(value),
        "scale_factor" | "scale_factor_at_natural_origin" => params.k0 = Some(value),
        "false_easting" | "easting_at_false_origin" => params.x0 = Some(value),
        "false_northing" | "northing_at_false_origin" => params.y0 = Some(value),
        _ => {}
    }
}

pub(super) fn params_from_node(root: &WktNode) -> Option<ProjParams> {
    if COMPOUND.iter().any(|k| root.is(k)) {
        return root
            .children()
            .filter(|child| child.is_crs())
            .find_map(params_from_node);
    }

    let mut params = ProjParams::default();

    if GEOGRAPHIC.iter().any(|k| root.is(k)) {
        params.proj_name = Some("longlat".to_string());
        apply_geographic(&mut params, root);
    } else if PROJECTED.iter().any(|k| root.is(k)) {
        if let Some(geog) = root.child(BASE_GEOGRAPHIC) {
            apply_geographic(&mut params, geog);
        }
        let method = root
            .child(&["PROJECTION"])
            .or_else(|| root.find(&["METHOD"]))
            .and_then(WktNode::name)?;
        let short = projection_name(method);
        let auxiliary_sphere = method.eq_ignore_ascii_case("Mercator_Auxiliary_Sphere");
        params.proj_name = Some(short);

        for parameter in parameters(root) {
            if let (Some(name), Some(value)) = (parameter.name(), parameter.number_at(1)) {
                apply_parameter(&mut params, name, value);
            }
        }

        if params.proj_name.as_deref() == Some("merc") && params.lat_ts.is_none() {
            params.lat_ts = params.lat1.take();
        }
        if auxiliary_sphere {
            params.b = params.a;
            params.rf = None;
        }
    } else {
        return None;
    }

    if let Some(unit) = root.child(&["UNIT", "LENGTHUNIT", "ANGLEUNIT"]) {
        if let Some(name) = unit.name() {
            params.units = Some(normalize_unit(name));
        }
    }

    params.resolve_ellipsoid();
    params.default_units();
    Some(params)
}
