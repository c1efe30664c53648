use pixel_dither::{DitherMode, Palette, PaletteAssignmentMode};
use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Rendering parameters used when a request leaves them out
    #[serde(default)]
    pub defaults: RenderDefaults,

    /// Request and resource limits
    #[serde(default)]
    pub limits: Limits,
}

/// Default rendering parameters
#[derive(Debug, Deserialize, Clone)]
pub struct RenderDefaults {
    /// Working-grid scale in percent (10-100)
    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,

    /// Dithering algorithm name ("floyd-steinberg" or "ordered")
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Palette assignment mode name
    #[serde(default = "default_palette_mode")]
    pub palette_mode: String,

    /// Palette as hex strings, dark to light
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Number of colors for automatic palette extraction (2-16)
    #[serde(default = "default_color_count")]
    pub color_count: usize,

    /// Per-frame delay for animations, in milliseconds
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,

    /// Whether the palette stage runs at all
    #[serde(default = "default_dither")]
    pub dither: bool,
}

fn default_pixel_size() -> u32 {
    50
}

fn default_algorithm() -> String {
    DitherMode::default().as_str().to_string()
}

fn default_palette_mode() -> String {
    PaletteAssignmentMode::default().as_str().to_string()
}

fn default_palette() -> Vec<String> {
    Palette::fallback().to_hex_strings()
}

fn default_color_count() -> usize {
    8
}

fn default_frame_delay_ms() -> u32 {
    100
}

fn default_dither() -> bool {
    true
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            pixel_size: default_pixel_size(),
            algorithm: default_algorithm(),
            palette_mode: default_palette_mode(),
            palette: default_palette(),
            color_count: default_color_count(),
            frame_delay_ms: default_frame_delay_ms(),
            dither: default_dither(),
        }
    }
}

/// Request and resource limits
#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    /// Maximum request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Maximum decoded image width or height in pixels
    #[serde(default = "default_max_dimension")]
    pub max_dimension: usize,

    /// Number of rendered results kept in memory
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_max_dimension() -> usize {
    4096
}

fn default_cache_entries() -> usize {
    64
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            max_dimension: default_max_dimension(),
            cache_entries: default_cache_entries(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing path, unreadable file or invalid YAML falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        pixel_size = config.defaults.pixel_size,
                        algorithm = %config.defaults.algorithm,
                        palette_colors = config.defaults.palette.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML text.
    ///
    /// Unknown algorithm or palette mode names are replaced by the defaults
    /// with a warning, so a typo in the file never breaks every request.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.sanitize();
        Ok(config)
    }

    fn sanitize(&mut self) {
        let d = &mut self.defaults;
        if d.algorithm.parse::<DitherMode>().is_err() {
            tracing::warn!(algorithm = %d.algorithm, "Unknown algorithm in config, using default");
            d.algorithm = default_algorithm();
        }
        if d.palette_mode.parse::<PaletteAssignmentMode>().is_err() {
            tracing::warn!(palette_mode = %d.palette_mode, "Unknown palette mode in config, using default");
            d.palette_mode = default_palette_mode();
        }
        if d.palette.iter().all(|s| s.trim().is_empty()) {
            tracing::warn!("Empty palette in config, using default");
            d.palette = default_palette();
        }
    }

    /// The configured default palette.
    pub fn default_palette(&self) -> Palette {
        Palette::from_hex(&self.defaults.palette).unwrap_or_else(|_| Palette::fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.defaults.pixel_size, 50);
        assert_eq!(config.defaults.algorithm, "floyd-steinberg");
        assert_eq!(config.defaults.palette_mode, "nearest");
        assert_eq!(
            config.defaults.palette,
            vec!["#000000", "#555555", "#aaaaaa", "#ffffff"]
        );
        assert_eq!(config.defaults.color_count, 8);
        assert_eq!(config.defaults.frame_delay_ms, 100);
        assert!(config.defaults.dither);
        assert_eq!(config.limits.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.limits.max_dimension, 4096);
        assert_eq!(config.limits.cache_entries, 64);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r##"
defaults:
  pixel_size: 25
  algorithm: ordered
  palette_mode: gradient-vertical
  palette: ["#1a1c2c", "#5d275d", "#b13e53", "#ef7d57"]
  color_count: 6
limits:
  max_dimension: 1024
"##;

        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.defaults.pixel_size, 25);
        assert_eq!(config.defaults.algorithm, "ordered");
        assert_eq!(config.defaults.palette_mode, "gradient-vertical");
        assert_eq!(config.defaults.palette.len(), 4);
        assert_eq!(config.defaults.color_count, 6);
        // Unset fields keep their defaults
        assert_eq!(config.defaults.frame_delay_ms, 100);
        assert_eq!(config.limits.max_dimension, 1024);
        assert_eq!(config.limits.cache_entries, 64);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let yaml = "defaults:\n  algorithm: atkinson\n  palette_mode: random\n  palette: []\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.defaults.algorithm, "floyd-steinberg");
        assert_eq!(config.defaults.palette_mode, "nearest");
        assert_eq!(config.defaults.palette.len(), 4);
    }

    #[test]
    fn test_empty_document() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config.defaults.pixel_size, 50);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/pixelator.yaml")));
        assert_eq!(config.defaults.pixel_size, 50);
    }

    #[test]
    fn test_load_invalid_yaml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaults: [unclosed").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.defaults.algorithm, "floyd-steinberg");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaults:\n  pixel_size: 80").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.defaults.pixel_size, 80);
    }

    #[test]
    fn test_default_palette() {
        let config = AppConfig::default();
        assert_eq!(config.default_palette(), Palette::fallback());
    }
}
