//! WCAG 2.x compliance evaluation for color pairs and palettes.

use std::fmt;
use std::str::FromStr;

use float_cmp::approx_eq;
use palette::Srgb;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use tracing::instrument;

use crate::contrast::{contrast_from_luminances, contrast_ratio, relative_luminance};
use crate::convert::{hex_serde, parse_hex};
use crate::error::Result;

/// WCAG contrast thresholds
pub mod thresholds {
    /// Level AA, normal text
    pub const AA_NORMAL: f64 = 4.5;
    /// Level AA, large text (18pt, or 14pt bold)
    pub const AA_LARGE: f64 = 3.0;
    /// Level AAA, normal text
    pub const AAA_NORMAL: f64 = 7.0;
    /// Level AAA, large text
    pub const AAA_LARGE: f64 = 4.5;
}

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    #[default]
    #[serde(rename = "AA", alias = "aa")]
    Aa,
    #[serde(rename = "AAA", alias = "aaa")]
    Aaa,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aa => f.write_str("AA"),
            Self::Aaa => f.write_str("AAA"),
        }
    }
}

impl FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AA" => Ok(Self::Aa),
            "AAA" => Ok(Self::Aaa),
            _ => Err(format!("Invalid WCAG level '{}': expected AA or AAA", s)),
        }
    }
}

/// Text size context, declared by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    Large,
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Large => f.write_str("large"),
        }
    }
}

impl FromStr for TextSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "large" => Ok(Self::Large),
            _ => Err(format!("Invalid text size '{}': expected normal or large", s)),
        }
    }
}

/// Minimum contrast ratio required for a level and text size.
pub fn minimum_contrast_ratio(level: WcagLevel, size: TextSize) -> f64 {
    match (level, size) {
        (WcagLevel::Aa, TextSize::Normal) => thresholds::AA_NORMAL,
        (WcagLevel::Aa, TextSize::Large) => thresholds::AA_LARGE,
        (WcagLevel::Aaa, TextSize::Normal) => thresholds::AAA_NORMAL,
        (WcagLevel::Aaa, TextSize::Large) => thresholds::AAA_LARGE,
    }
}

/// Whether `ratio` reaches `threshold`, ignoring a few ULPs of float noise.
fn reaches(ratio: f64, threshold: f64) -> bool {
    ratio >= threshold || approx_eq!(f64, ratio, threshold, ulps = 4)
}

/// Whether a contrast ratio meets the given level for the given text size.
pub fn meets_wcag(ratio: f64, level: WcagLevel, size: TextSize) -> bool {
    reaches(ratio, minimum_contrast_ratio(level, size))
}

/// Highest level `ratio` reaches for the given text size, `None` if it fails AA.
pub fn achieved_level(ratio: f64, size: TextSize) -> Option<WcagLevel> {
    [WcagLevel::Aaa, WcagLevel::Aa]
        .into_iter()
        .find(|&level| meets_wcag(ratio, level, size))
}

/// Contrast ratio of a pair with pass/fail for every WCAG threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastResult {
    pub ratio: f64,
    pub passes_aa_normal: bool,
    pub passes_aa_large: bool,
    pub passes_aaa_normal: bool,
    pub passes_aaa_large: bool,
    /// Highest level reached for normal text (null when failing)
    pub level_normal: Option<WcagLevel>,
    /// Highest level reached for large text (null when failing)
    pub level_large: Option<WcagLevel>,
}

impl ContrastResult {
    pub fn from_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            passes_aa_normal: reaches(ratio, thresholds::AA_NORMAL),
            passes_aa_large: reaches(ratio, thresholds::AA_LARGE),
            passes_aaa_normal: reaches(ratio, thresholds::AAA_NORMAL),
            passes_aaa_large: reaches(ratio, thresholds::AAA_LARGE),
            level_normal: achieved_level(ratio, TextSize::Normal),
            level_large: achieved_level(ratio, TextSize::Large),
        }
    }

    pub fn level(&self, size: TextSize) -> Option<WcagLevel> {
        match size {
            TextSize::Normal => self.level_normal,
            TextSize::Large => self.level_large,
        }
    }

    pub fn passes(&self, level: WcagLevel, size: TextSize) -> bool {
        match (level, size) {
            (WcagLevel::Aa, TextSize::Normal) => self.passes_aa_normal,
            (WcagLevel::Aa, TextSize::Large) => self.passes_aa_large,
            (WcagLevel::Aaa, TextSize::Normal) => self.passes_aaa_normal,
            (WcagLevel::Aaa, TextSize::Large) => self.passes_aaa_large,
        }
    }
}

/// Evaluate a color pair against all WCAG thresholds.
pub fn evaluate_pair(a: Srgb<u8>, b: Srgb<u8>) -> ContrastResult {
    ContrastResult::from_ratio(contrast_ratio(a, b))
}

/// Evaluate a pair of hex strings.
pub fn evaluate_pair_hex(a: &str, b: &str) -> Result<ContrastResult> {
    Ok(evaluate_pair(parse_hex(a)?, parse_hex(b)?))
}

/// Contrast result tagged with the two palette entries it compares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairResult {
    pub first_index: usize,
    pub second_index: usize,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub first: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub second: Srgb<u8>,
    #[serde(flatten)]
    pub result: ContrastResult,
}

/// Pairwise accessibility report for a palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccessibilityReport {
    /// One entry per unordered pair, in (i, j) order with i < j
    pub pairs: Vec<PairResult>,
    /// Percent of pairs passing AA for normal text, one decimal
    pub score: f64,
}

impl AccessibilityReport {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs that fail the given level and text size.
    pub fn failing(&self, level: WcagLevel, size: TextSize) -> impl Iterator<Item = &PairResult> {
        self.pairs
            .iter()
            .filter(move |p| !p.result.passes(level, size))
    }
}

/// Evaluate every unordered pair of `colors`.
///
/// Fewer than two colors yields an empty report with a score of 0.
///
/// # Example
///
/// ```
/// use chromawise::convert::parse_hex;
/// use chromawise::wcag::evaluate_palette;
///
/// let colors: Vec<_> = ["#000000", "#ffffff", "#777777"]
///     .iter()
///     .map(|s| parse_hex(s).unwrap())
///     .collect();
/// let report = evaluate_palette(&colors);
/// assert_eq!(report.pairs.len(), 3);
/// ```
#[cfg_attr(debug_assertions, instrument(skip(colors), fields(colors = colors.len())))]
pub fn evaluate_palette(colors: &[Srgb<u8>]) -> AccessibilityReport {
    let n = colors.len();
    if n < 2 {
        return AccessibilityReport::default();
    }

    let luminances: Vec<f64> = colors.iter().map(|c| relative_luminance(*c)).collect();
    let indices: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let pairs: Vec<PairResult> = indices
        .par_iter()
        .map(|&(i, j)| PairResult {
            first_index: i,
            second_index: j,
            first: colors[i],
            second: colors[j],
            result: ContrastResult::from_ratio(contrast_from_luminances(
                luminances[i],
                luminances[j],
            )),
        })
        .collect();

    let passing = pairs.iter().filter(|p| p.result.passes_aa_normal).count();
    let score = (passing as f64 * 1000.0 / pairs.len() as f64).round() / 10.0;

    AccessibilityReport { pairs, score }
}

/// The `top_n` highest-contrast pairs, best first. Ties keep palette order.
#[cfg_attr(debug_assertions, instrument(skip(colors), fields(colors = colors.len())))]
pub fn best_text_combinations(colors: &[Srgb<u8>], top_n: usize) -> Vec<PairResult> {
    let mut pairs = evaluate_palette(colors).pairs;
    pairs.sort_by(|a, b| b.result.ratio.total_cmp(&a.result.ratio));
    pairs.truncate(top_n);
    pairs
}

/// Black or white, whichever reads better on `background`. Black wins ties.
pub fn readable_text_color(background: Srgb<u8>) -> Srgb<u8> {
    let black = Srgb::new(0u8, 0, 0);
    let white = Srgb::new(255u8, 255, 255);
    if contrast_ratio(black, background) >= contrast_ratio(white, background) {
        black
    } else {
        white
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_tolerates_float_noise() {
        assert!(reaches(4.499_999_999_999_999, 4.5));
        assert!(!reaches(4.478, 4.5));
        assert!(reaches(4.5, 4.5));
    }

    #[test]
    fn level_and_size_parse_case_insensitively() {
        assert_eq!("aaa".parse::<WcagLevel>().unwrap(), WcagLevel::Aaa);
        assert_eq!(" AA ".parse::<WcagLevel>().unwrap(), WcagLevel::Aa);
        assert_eq!("LARGE".parse::<TextSize>().unwrap(), TextSize::Large);
        assert!("A".parse::<WcagLevel>().is_err());
        assert!("huge".parse::<TextSize>().is_err());
    }
}
