//! Shape of the JSON configuration file.
//!
//! Every section and key is optional, so `{}` is a valid file.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ipc7351::density::DensityLevel;
use crate::ipc7351::packages::DEFAULT_SILKSCREEN_WIDTH;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Generator defaults.
    #[serde(default)]
    pub defaults: GeneratorDefaults,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks values that deserialise fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.density_level()?;
        positive("defaults.silkscreen_width", self.defaults.silkscreen_width)?;
        positive("defaults.png_scale", self.defaults.png_scale)?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::validation(format!(
            "{key} must be a positive number, got {value}"
        )))
    }
}

/// Values used when neither the package name nor the command line sets them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorDefaults {
    /// Density level: "L", "N", "M" or "0".
    /// Default: "N"
    #[serde(default = "default_density")]
    pub density: String,

    /// Silkscreen line width in mm.
    #[serde(default = "default_silkscreen_width")]
    pub silkscreen_width: f64,

    /// Preview resolution in pixels per mm.
    #[serde(default = "default_png_scale")]
    pub png_scale: f64,
}

impl GeneratorDefaults {
    /// Returns the configured density level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an unknown level.
    pub fn density_level(&self) -> Result<DensityLevel, ConfigError> {
        DensityLevel::from_str_loose(&self.density).ok_or_else(|| {
            ConfigError::validation(format!(
                "defaults.density '{}' is not one of L, N, M, 0",
                self.density
            ))
        })
    }
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        Self {
            density: default_density(),
            silkscreen_width: default_silkscreen_width(),
            png_scale: default_png_scale(),
        }
    }
}

fn default_density() -> String {
    "N".to_string()
}

const fn default_silkscreen_width() -> f64 {
    DEFAULT_SILKSCREEN_WIDTH
}

const fn default_png_scale() -> f64 {
    8.0
}

/// The `logging` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level used when neither `-v` nor `-q` is given.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_valid() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.defaults.density_level().unwrap(), DensityLevel::Nominal);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "defaults": {
                "density": "M",
                "silkscreen_width": 0.12,
                "png_scale": 20
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.defaults.density_level().unwrap(), DensityLevel::Most);
        assert!((config.defaults.silkscreen_width - 0.12).abs() < f64::EPSILON);
        assert!((config.defaults.png_scale - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn generator_defaults() {
        let defaults = GeneratorDefaults::default();
        assert_eq!(defaults.density, "N");
        assert!((defaults.silkscreen_width - 0.15).abs() < f64::EPSILON);
        assert!((defaults.png_scale - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quiet_by_default() {
        assert_eq!(LoggingConfig::default().level, "warn");
    }

    #[test]
    fn density_zero_accepted() {
        let json = r#"{ "defaults": { "density": "0" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.defaults.density_level().unwrap(), DensityLevel::Zero);
    }

    #[test]
    fn reject_invalid_density() {
        let json = r#"{ "defaults": { "density": "X" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn reject_non_positive_scale() {
        let json = r#"{ "defaults": { "png_scale": 0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{ "logging": { "level": "loud" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_misspelt_keys() {
        for json in [r#"{ "default": {} }"#, r#"{ "defaults": { "densty": "L" } }"#] {
            assert!(serde_json::from_str::<Config>(json).is_err(), "{json}");
        }
    }
}
