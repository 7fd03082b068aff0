//! Externally supplied configuration.
//!
//! The backend origin, the basemap tile URL and the map provider key are
//! never embedded in code paths as fixed values. Native builds read an optional `workbench.toml` and
//! `WORKBENCH_*` environment variables; web builds take the key from the
//! build environment and allow the backend origin to be overridden from the
//! page URL.

use serde::Deserialize;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://127.0.0.1:5000";

/// Path of the analysis endpoint, relative to the backend origin.
pub const FETCH_IMAGE_PATH: &str = "/fetch-image";

/// Satellite basemap tiles used when no tile URL is configured.
pub const DEFAULT_TILE_URL: &str =
    "https://api.maptiler.com/maps/satellite/256/{z}/{x}/{y}.jpg?key={key}";

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "workbench";

#[cfg(not(target_arch = "wasm32"))]
const ENV_PREFIX: &str = "WORKBENCH";

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to load configuration: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("backend origin must be an http(s) URL, got {0:?}")]
    InvalidOrigin(String),

    #[error("tile URL must be an http(s) template with {{z}}, {{x}} and {{y}}, got {0:?}")]
    InvalidTileUrl(String),
}

/// Runtime configuration for the workbench.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkbenchConfig {
    /// Origin of the analysis service, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_backend_origin")]
    pub backend_origin: String,
    /// Map provider key. Absent (or blank) keys make the map fail to load.
    #[serde(default)]
    pub maps_api_key: Option<String>,
    /// Basemap tile template with `{z}`, `{x}`, `{y}` and `{key}` placeholders.
    #[serde(default = "default_tile_url")]
    pub maps_tile_url: String,
}

fn default_backend_origin() -> String {
    DEFAULT_BACKEND_ORIGIN.to_string()
}

fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_string()
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            backend_origin: default_backend_origin(),
            maps_api_key: None,
            maps_tile_url: default_tile_url(),
        }
    }
}

impl WorkbenchConfig {
    /// Loads configuration from `workbench.toml` (optional) and the
    /// `WORKBENCH_` environment, later sources overriding earlier ones.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ::config::Config::builder()
            .add_source(::config::File::with_name(CONFIG_FILE).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX));
        Self::from_builder(builder)
    }

    /// Loads configuration from the build environment and the page URL.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        let params = crate::state::url_state::parse_from_url();
        let config = Self {
            backend_origin: params.backend.unwrap_or_else(default_backend_origin),
            maps_api_key: option_env!("WORKBENCH_MAPS_API_KEY").map(str::to_string),
            maps_tile_url: option_env!("WORKBENCH_MAPS_TILE_URL")
                .map(str::to_string)
                .unwrap_or_else(default_tile_url),
        };
        config.validated()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Normalizes blank values and checks the backend origin and tile URL.
    fn validated(mut self) -> Result<Self, ConfigError> {
        self.maps_api_key = self
            .maps_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let origin = self.backend_origin.trim().trim_end_matches('/').to_string();
        if !is_http(&origin) {
            return Err(ConfigError::InvalidOrigin(self.backend_origin));
        }
        self.backend_origin = origin;

        let tile_url = self.maps_tile_url.trim();
        let has_placeholders = ["{z}", "{x}", "{y}"].iter().all(|p| tile_url.contains(p));
        if !(is_http(tile_url) && has_placeholders) {
            return Err(ConfigError::InvalidTileUrl(self.maps_tile_url));
        }
        self.maps_tile_url = tile_url.to_string();

        Ok(self)
    }

    /// Full URL of the analysis endpoint.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.backend_origin.trim_end_matches('/'),
            FETCH_IMAGE_PATH
        )
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use ::config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> Result<WorkbenchConfig, ConfigError> {
        WorkbenchConfig::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = from_toml("").unwrap();
        assert_eq!(config.backend_origin, DEFAULT_BACKEND_ORIGIN);
        assert_eq!(config.maps_api_key, None);
        assert_eq!(config.maps_tile_url, DEFAULT_TILE_URL);
        assert_eq!(config.endpoint_url(), "http://127.0.0.1:5000/fetch-image");
    }

    #[test]
    fn test_file_values_are_used() {
        let config = from_toml(
            r#"
            backend_origin = "https://analysis.example.org/"
            maps_api_key = "abc123"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_origin, "https://analysis.example.org");
        assert_eq!(config.maps_api_key.as_deref(), Some("abc123"));
        assert_eq!(
            config.endpoint_url(),
            "https://analysis.example.org/fetch-image"
        );
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = from_toml(r#"maps_api_key = "   ""#).unwrap();
        assert_eq!(config.maps_api_key, None);
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let result = from_toml(r#"backend_origin = "ftp://127.0.0.1""#);
        assert!(matches!(result, Err(ConfigError::InvalidOrigin(_))));
    }

    #[test]
    fn test_tile_url_needs_placeholders() {
        let config =
            from_toml(r#"maps_tile_url = " https://tiles.example/{z}/{x}/{y}.png ""#).unwrap();
        assert_eq!(config.maps_tile_url, "https://tiles.example/{z}/{x}/{y}.png");

        let result = from_toml(r#"maps_tile_url = "https://tiles.example/{z}/{x}.png""#);
        assert!(matches!(result, Err(ConfigError::InvalidTileUrl(_))));

        let result = from_toml(r#"maps_tile_url = "file:///{z}/{x}/{y}.png""#);
        assert!(matches!(result, Err(ConfigError::InvalidTileUrl(_))));
    }
}
