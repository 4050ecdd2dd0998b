//! TOML configuration with layered command-line overrides.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::ColorSpace;
use crate::distance::{DEFAULT_MIN_DIFFERENCE, DistanceMethod};
use crate::error::ColorError;
use crate::wcag::{TextSize, WcagLevel};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading/writing file
    Io(std::io::Error),
    /// Configuration could not be merged or extracted
    Extract(Box<figment::Error>),
    /// TOML serialization error
    Serialize(toml::ser::Error),
    /// Invalid value inside an otherwise well-formed file
    Invalid(ColorError),
    /// Numeric setting outside its allowed range
    OutOfRange(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Extract(e) => write!(f, "Configuration error: {}", e),
            Self::Serialize(e) => write!(f, "TOML serialize error: {}", e),
            Self::Invalid(e) => write!(f, "Invalid configuration: {}", e),
            Self::OutOfRange(s) => write!(f, "Invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Extract(Box::new(e))
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<ColorError> for ConfigError {
    fn from(e: ColorError) -> Self {
        Self::Invalid(e)
    }
}

/// Output serialization format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Root configuration structure for TOML files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Output settings
    pub output: OutputConfig,
    /// Analysis defaults
    pub analysis: AnalysisConfig,
    /// Log settings
    pub logging: LoggingConfig,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Defaults applied when a subcommand does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Metric for `distance`, `nearest` and duplicate detection
    pub distance_method: DistanceMethod,
    /// Minimum Lab distance for two colors to count as distinct
    pub distinct_threshold: f64,
    /// Number of pairs listed as best text combinations
    pub top_combinations: usize,
    /// WCAG level checked by `contrast`
    pub level: WcagLevel,
    /// Text size checked by `contrast`
    pub text_size: TextSize,
    /// Color spaces printed by `convert` (names, validated on load)
    pub spaces: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            distance_method: DistanceMethod::default(),
            distinct_threshold: DEFAULT_MIN_DIFFERENCE,
            top_combinations: 5,
            level: WcagLevel::default(),
            text_size: TextSize::default(),
            spaces: ColorSpace::ALL.iter().map(|s| s.name().to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    /// Parse the configured color-space names.
    pub fn color_spaces(&self) -> Result<Vec<ColorSpace>, ConfigError> {
        self.spaces
            .iter()
            .map(|s| s.parse::<ColorSpace>().map_err(ConfigError::from))
            .collect()
    }

    /// Check names and numeric ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.color_spaces()?;
        if !(self.distinct_threshold.is_finite() && self.distinct_threshold >= 0.0) {
            return Err(ConfigError::OutOfRange(format!(
                "distinct_threshold {} must be a finite, non-negative Lab distance",
                self.distinct_threshold
            )));
        }
        Ok(())
    }
}

/// Log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path
    pub file: PathBuf,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("chromawise.log"),
            level: "info".to_string(),
        }
    }
}

/// Command-line values that override the file. Unset fields are skipped so
/// they do not mask lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingOverrides>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl ToolConfig {
    /// Merge defaults, an optional TOML file and command-line overrides.
    pub fn layered(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ToolConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file {} not found", path.display()),
                )));
            }
            debug!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment.merge(Serialized::defaults(overrides)).extract()?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::layered(Some(path), &ConfigOverrides::default())
    }

    /// Parse configuration from a TOML string on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(ToolConfig::default()))
            .merge(Toml::string(content))
            .extract()?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
