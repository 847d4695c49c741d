//! Reference ellipsoids and datum names.

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// proj4 `+ellps` code
    pub code: &'static str,
    /// Semi-major axis in metres
    pub a: f64,
    /// Inverse flattening (absent for spheres)
    pub rf: Option<f64>,
    /// Semi-minor axis when defined directly instead of through `rf`
    pub b: Option<f64>,
}

/// Known ellipsoids, keyed by proj4 code.
pub const ELLIPSOIDS: &[Ellipsoid] = &[
    Ellipsoid {
        code: "WGS84",
        a: 6_378_137.0,
        rf: Some(298.257223563),
        b: None,
    },
    Ellipsoid {
        code: "GRS80",
        a: 6_378_137.0,
        rf: Some(298.257222101),
        b: None,
    },
    Ellipsoid {
        code: "WGS72",
        a: 6_378_135.0,
        rf: Some(298.26),
        b: None,
    },
    Ellipsoid {
        code: "clrk66",
        a: 6_378_206.4,
        rf: None,
        b: Some(6_356_583.8),
    },
    Ellipsoid {
        code: "clrk80",
        a: 6_378_249.145,
        rf: Some(293.4663),
        b: None,
    },
    Ellipsoid {
        code: "airy",
        a: 6_377_563.396,
        rf: Some(299.3249646),
        b: None,
    },
    Ellipsoid {
        code: "mod_airy",
        a: 6_377_340.189,
        rf: None,
        b: Some(6_356_034.446),
    },
    Ellipsoid {
        code: "bessel",
        a: 6_377_397.155,
        rf: Some(299.1528128),
        b: None,
    },
    Ellipsoid {
        code: "intl",
        a: 6_378_388.0,
        rf: Some(297.0),
        b: None,
    },
    Ellipsoid {
        code: "krass",
        a: 6_378_245.0,
        rf: Some(298.3),
        b: None,
    },
    Ellipsoid {
        code: "sphere",
        a: 6_370_997.0,
        rf: None,
        b: Some(6_370_997.0),
    },
];

impl Ellipsoid {
    /// Look up an ellipsoid by proj4 code or WKT spheroid name.
    pub fn lookup(name: &str) -> Option<Ellipsoid> {
        let key = squash(name);
        let code = match key.as_str() {
            "wgs84" | "wgs1984" => "WGS84",
            "grs80" | "grs1980" => "GRS80",
            "wgs72" | "wgs1972" => "WGS72",
            "clrk66" | "clarke1866" => "clrk66",
            "clrk80" | "clarke1880" | "clarke1880rgs" => "clrk80",
            "airy" | "airy1830" => "airy",
            "modairy" | "airymodified1849" | "airymodified" => "mod_airy",
            "bessel" | "bessel1841" => "bessel",
            "intl" | "international1924" | "international1909" | "hayford" => "intl",
            "krass" | "krassowsky1940" | "krasovsky1940" => "krass",
            "sphere" => "sphere",
            _ => return None,
        };
        ELLIPSOIDS.iter().copied().find(|e| e.code == code)
    }
}

/// Normalize a datum name from proj4 (`WGS84`) or WKT (`WGS_1984`,
/// `D_North_American_1983`) into a short lowercase code.
pub fn normalize_datum(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let stripped = lower.strip_prefix("d_").unwrap_or(&lower);
    let key = squash(stripped);
    let code = match key.as_str() {
        "wgs84" | "wgs1984" => "wgs84",
        "wgs72" | "wgs1972" => "wgs72",
        "nad83" | "northamericandatum1983" | "northamerican1983" => "nad83",
        "nad27" | "northamericandatum1927" | "northamerican1927" => "nad27",
        "osgb36" | "osgb1936" => "osgb36",
        "etrs89" | "europeanterrestrialreferencesystem1989" => "etrs89",
        "ed50" | "european1950" | "europeandatum1950" => "ed50",
        "ggrs87" | "greekgeodeticreferencesystem1987" => "ggrs87",
        "potsdam" | "deutscheshauptdreiecksnetz" => "potsdam",
        "ch1903" => "ch1903",
        "nzgd49" | "newzealandgeodeticdatum1949" | "newzealand1949" => "nzgd49",
        "rgf93" | "rgf1993" | "reseaugeodesiquefrancais1993" => "rgf93",
        _ => return stripped.replace(' ', "_"),
    };
    code.to_string()
}

/// Ellipsoid implied by a normalized datum code.
pub fn datum_ellipsoid(datum: &str) -> Option<Ellipsoid> {
    let code = match normalize_datum(datum).as_str() {
        "wgs84" => "WGS84",
        "nad83" | "etrs89" | "rgf93" => "GRS80",
        "wgs72" => "WGS72",
        "nad27" => "clrk66",
        "osgb36" => "airy",
        "ed50" => "intl",
        "ggrs87" => "GRS80",
        "potsdam" | "ch1903" => "bessel",
        "nzgd49" => "intl",
        _ => return None,
    };
    Ellipsoid::lookup(code)
}

/// Lowercase and drop everything but letters and digits.
fn squash(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
