//! Runtime settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logo::DEFAULT_MAX_LOGO_BYTES;

/// Overrides [`Settings::convert_endpoint`].
pub const ENV_CONVERT_URL: &str = "QRSTYLE_CONVERT_URL";
/// Overrides [`Settings::preview_px`].
pub const ENV_PREVIEW_PX: &str = "QRSTYLE_PREVIEW_PX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Width the art is laid out at before export scaling.
    pub preview_px: u32,
    /// Smallest capture handed to the EPS converter.
    pub eps_min_px: u32,
    pub logo_max_bytes: usize,
    pub jpeg_quality: u8,
    pub convert_endpoint: String,
    pub convert_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_px: 300,
            eps_min_px: 1000,
            logo_max_bytes: DEFAULT_MAX_LOGO_BYTES,
            jpeg_quality: 92,
            convert_endpoint: "http://127.0.0.1:8001/api/convert/image-to-eps".to_string(),
            convert_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Defaults, or `path` when given, with environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        settings.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = var(ENV_CONVERT_URL) {
            self.convert_endpoint = url;
        }
        if let Some(px) = var(ENV_PREVIEW_PX) {
            self.preview_px = px
                .trim()
                .parse()
                .ok()
                .filter(|&px: &u32| px > 0)
                .ok_or(ConfigError::UnknownVariant {
                    kind: "preview size",
                    value: px,
                })?;
        }
        Ok(self)
    }

    pub fn convert_timeout(&self) -> Duration {
        Duration::from_secs(self.convert_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"eps_min_px": 1200}}"#).unwrap();
        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.eps_min_px, 1200);
        assert_eq!(settings.preview_px, 300);
        assert_eq!(settings.jpeg_quality, 92);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default()
            .with_env_overrides(|key| match key {
                ENV_CONVERT_URL => Some("http://converter.local/eps".to_string()),
                ENV_PREVIEW_PX => Some("256".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(settings.convert_endpoint, "http://converter.local/eps");
        assert_eq!(settings.preview_px, 256);
    }

    #[test]
    fn test_bad_preview_override_is_rejected() {
        let result = Settings::default().with_env_overrides(|key| (key == ENV_PREVIEW_PX).then(|| "0".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::from_json_file("/nonexistent/qrstyle.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
