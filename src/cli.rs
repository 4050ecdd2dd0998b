//! CLI argument parsing and output rendering.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;

use crate::config::{ConfigOverrides, LoggingOverrides, OutputFormat, OutputOverrides};
use crate::convert::ColorSpace;
use crate::distance::DistanceMethod;
use crate::vision::Deficiency;
use crate::wcag::{TextSize, WcagLevel};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// YAML (default)
    Yaml,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// WCAG level selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    #[value(name = "AA", alias = "aa")]
    Aa,
    #[value(name = "AAA", alias = "aaa")]
    Aaa,
}

impl From<LevelArg> for WcagLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Aa => WcagLevel::Aa,
            LevelArg::Aaa => WcagLevel::Aaa,
        }
    }
}

/// Text size selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizeArg {
    /// Body text
    Normal,
    /// 18pt, or 14pt bold, and above
    Large,
}

impl From<SizeArg> for TextSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Normal => TextSize::Normal,
            SizeArg::Large => TextSize::Large,
        }
    }
}

/// Distance metric selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Redmean-weighted RGB (fast approximation)
    WeightedRgb,
    /// Euclidean distance in CIE Lab
    LabEuclidean,
}

impl From<MethodArg> for DistanceMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::WeightedRgb => DistanceMethod::WeightedRgb,
            MethodArg::LabEuclidean => DistanceMethod::LabEuclidean,
        }
    }
}

/// Color space selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpaceArg {
    Hex,
    Rgb,
    Hsl,
    Hsv,
    Cmyk,
    Lab,
}

impl From<SpaceArg> for ColorSpace {
    fn from(arg: SpaceArg) -> Self {
        match arg {
            SpaceArg::Hex => ColorSpace::Hex,
            SpaceArg::Rgb => ColorSpace::Rgb,
            SpaceArg::Hsl => ColorSpace::Hsl,
            SpaceArg::Hsv => ColorSpace::Hsv,
            SpaceArg::Cmyk => ColorSpace::Cmyk,
            SpaceArg::Lab => ColorSpace::Lab,
        }
    }
}

/// Color vision deficiency selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeficiencyArg {
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
}

impl From<DeficiencyArg> for Deficiency {
    fn from(arg: DeficiencyArg) -> Self {
        match arg {
            DeficiencyArg::Protanopia => Deficiency::Protanopia,
            DeficiencyArg::Deuteranopia => Deficiency::Deuteranopia,
            DeficiencyArg::Tritanopia => Deficiency::Tritanopia,
            DeficiencyArg::Achromatopsia => Deficiency::Achromatopsia,
        }
    }
}

/// Color conversion, WCAG contrast checks and color-vision simulation.
#[derive(Parser, Debug)]
#[command(name = "chromawise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Load configuration from TOML file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Save the effective configuration to TOML file
    #[arg(long, value_name = "FILE", global = true)]
    pub save_config: Option<PathBuf>,

    /// Output format (default: yaml, or the config file setting)
    #[arg(long, value_enum, global = true)]
    pub format: Option<FormatArg>,

    /// Log file path (default: chromawise.log)
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (default: info)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

/// Colors accept hex (`#abc`, `#aabbcc`) and any CSS color syntax.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a color in every supported color space
    Convert {
        /// Color to convert
        color: String,
        /// Only print these color spaces (repeatable)
        #[arg(long = "to", value_enum)]
        to: Vec<SpaceArg>,
    },
    /// Check the WCAG contrast of a text/background pair (fails if it does not pass)
    Contrast {
        /// Text color
        foreground: String,
        /// Background color
        background: String,
        /// Conformance level to enforce
        #[arg(long, value_enum)]
        level: Option<LevelArg>,
        /// Text size context
        #[arg(long, value_enum)]
        size: Option<SizeArg>,
    },
    /// Accessibility report over every pair of a palette
    Palette {
        /// Palette colors
        #[arg(required = true, num_args = 1..)]
        colors: Vec<String>,
        /// Number of best text combinations to list
        #[arg(long)]
        top: Option<usize>,
    },
    /// Perceptual distance between two colors
    Distance {
        first: String,
        second: String,
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
    },
    /// Find the candidate closest to a color
    Nearest {
        /// Color to match
        color: String,
        /// Candidate colors
        #[arg(long, required = true, num_args = 1..)]
        candidates: Vec<String>,
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
    },
    /// Simulate color vision deficiencies
    Simulate {
        #[arg(required = true, num_args = 1..)]
        colors: Vec<String>,
        /// Only simulate this deficiency
        #[arg(long, value_enum)]
        deficiency: Option<DeficiencyArg>,
    },
    /// Check that palette colors stay distinguishable, including under color blindness
    Distinct {
        #[arg(required = true, num_args = 1..)]
        colors: Vec<String>,
        /// Minimum Lab distance between any two colors
        #[arg(long)]
        threshold: Option<f64>,
    },
}

impl Cli {
    /// Flags that override the config file. Unset flags leave the file alone.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let output = self.format.map(|f| OutputOverrides {
            format: Some(f.into()),
        });
        let logging = if self.log_file.is_some() || self.log_level.is_some() {
            Some(LoggingOverrides {
                file: self.log_file.clone(),
                level: self.log_level.clone(),
            })
        } else {
            None
        };
        ConfigOverrides { output, logging }
    }
}

/// Serialize a command result in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).wrap_err("Failed to serialize to YAML"),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .wrap_err("Failed to serialize to JSON"),
    }
}
