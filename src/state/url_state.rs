//! URL query parameters recognized by the web build.
//!
//! `backend` overrides the analysis service origin; `lat`/`lon` recenter the
//! map on load.

/// Largest latitude accepted as a map center.
const MAX_CENTER_LAT: f64 = 85.0;

/// Parsed URL parameters.
#[derive(Debug, Default, PartialEq)]
pub struct UrlParams {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))] // read by the web config loader
    pub backend: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Parses a query string, with or without the leading `?`.
pub fn parse_query(search: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        match key {
            "backend" if !value.is_empty() => params.backend = Some(value.to_string()),
            "lat" => params.lat = parse_bounded(value, MAX_CENTER_LAT),
            "lon" => params.lon = parse_bounded(value, 180.0),
            _ => {}
        }
    }

    params
}

/// Parses a finite number within `[-limit, limit]`.
fn parse_bounded(value: &str, limit: f64) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    let Ok(search) = window.location().search() else {
        return UrlParams::default();
    };
    parse_query(&search)
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}
