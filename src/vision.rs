//! Color vision deficiency simulation.
//!
//! Dichromacies use fixed 3x3 transforms applied directly to gamma-encoded
//! 8-bit RGB. These are coarse approximations suited to palette previews,
//! not to colorimetric work.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use tracing::instrument;

use crate::contrast::{contrast_from_luminances, contrast_ratio, relative_luminance};
use crate::convert::hex_serde;
use crate::distance::{DistanceMethod, NearDuplicate, near_duplicates};
use crate::wcag::{TextSize, WcagLevel, meets_wcag};

/// Type of color vision deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deficiency {
    /// Red-blind
    Protanopia,
    /// Green-blind
    Deuteranopia,
    /// Blue-blind
    Tritanopia,
    /// Total color blindness
    Achromatopsia,
}

impl Deficiency {
    pub const ALL: [Deficiency; 4] = [
        Deficiency::Protanopia,
        Deficiency::Deuteranopia,
        Deficiency::Tritanopia,
        Deficiency::Achromatopsia,
    ];

    /// The three dichromacies, the default set for friendliness checks.
    pub const DICHROMACIES: [Deficiency; 3] = [
        Deficiency::Protanopia,
        Deficiency::Deuteranopia,
        Deficiency::Tritanopia,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Achromatopsia => "achromatopsia",
        }
    }

    fn matrix(self) -> Option<[[f64; 3]; 3]> {
        match self {
            Self::Protanopia => Some([
                [0.567, 0.433, 0.0],
                [0.558, 0.442, 0.0],
                [0.0, 0.242, 0.758],
            ]),
            Self::Deuteranopia => Some([
                [0.625, 0.375, 0.0],
                [0.7, 0.3, 0.0],
                [0.0, 0.3, 0.7],
            ]),
            Self::Tritanopia => Some([
                [0.95, 0.05, 0.0],
                [0.0, 0.433, 0.567],
                [0.0, 0.475, 0.525],
            ]),
            Self::Achromatopsia => None,
        }
    }
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Deficiency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| format!("Unknown color vision deficiency '{}'", s))
    }
}

#[inline]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Approximate how `color` appears with the given deficiency.
///
/// # Example
///
/// ```
/// use palette::Srgb;
/// use chromawise::vision::{Deficiency, simulate};
///
/// let gray = simulate(Srgb::new(255u8, 255, 255), Deficiency::Achromatopsia);
/// assert_eq!(gray, Srgb::new(255u8, 255, 255));
/// ```
pub fn simulate(color: Srgb<u8>, deficiency: Deficiency) -> Srgb<u8> {
    let rgb = [color.red as f64, color.green as f64, color.blue as f64];

    match deficiency.matrix() {
        Some(m) => {
            let row = |r: [f64; 3]| to_channel(r[0] * rgb[0] + r[1] * rgb[1] + r[2] * rgb[2]);
            Srgb::new(row(m[0]), row(m[1]), row(m[2]))
        }
        None => {
            let gray = to_channel(0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]);
            Srgb::new(gray, gray, gray)
        }
    }
}

/// One color as seen with each deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulatedColorSet {
    #[serde(serialize_with = "hex_serde::serialize")]
    pub original: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub protanopia: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub deuteranopia: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub tritanopia: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub achromatopsia: Srgb<u8>,
}

impl SimulatedColorSet {
    pub fn get(&self, deficiency: Deficiency) -> Srgb<u8> {
        match deficiency {
            Deficiency::Protanopia => self.protanopia,
            Deficiency::Deuteranopia => self.deuteranopia,
            Deficiency::Tritanopia => self.tritanopia,
            Deficiency::Achromatopsia => self.achromatopsia,
        }
    }
}

pub fn simulate_all(color: Srgb<u8>) -> SimulatedColorSet {
    SimulatedColorSet {
        original: color,
        protanopia: simulate(color, Deficiency::Protanopia),
        deuteranopia: simulate(color, Deficiency::Deuteranopia),
        tritanopia: simulate(color, Deficiency::Tritanopia),
        achromatopsia: simulate(color, Deficiency::Achromatopsia),
    }
}

/// Contrast of a pair as seen with one deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulatedContrast {
    pub deficiency: Deficiency,
    pub ratio: f64,
    pub passes_aa_normal: bool,
}

/// Contrast ratio between two colors after simulating `deficiency` on both.
pub fn simulated_contrast(a: Srgb<u8>, b: Srgb<u8>, deficiency: Deficiency) -> f64 {
    contrast_ratio(simulate(a, deficiency), simulate(b, deficiency))
}

/// Text/background contrast under each deficiency.
pub fn simulated_contrasts(
    foreground: Srgb<u8>,
    background: Srgb<u8>,
    deficiencies: &[Deficiency],
) -> Vec<SimulatedContrast> {
    deficiencies
        .iter()
        .map(|&deficiency| {
            let ratio = simulated_contrast(foreground, background, deficiency);
            SimulatedContrast {
                deficiency,
                ratio,
                passes_aa_normal: meets_wcag(ratio, WcagLevel::Aa, TextSize::Normal),
            }
        })
        .collect()
}

/// Pair that passes AA for normal text but falls below it once simulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastLoss {
    pub first_index: usize,
    pub second_index: usize,
    pub original: f64,
    pub simulated: f64,
}

fn contrast_losses(colors: &[Srgb<u8>], simulated: &[Srgb<u8>]) -> Vec<ContrastLoss> {
    let passes = |ratio: f64| meets_wcag(ratio, WcagLevel::Aa, TextSize::Normal);
    let original_lum: Vec<f64> = colors.iter().map(|c| relative_luminance(*c)).collect();
    let simulated_lum: Vec<f64> = simulated.iter().map(|c| relative_luminance(*c)).collect();

    let mut losses = Vec::new();
    for i in 0..colors.len() {
        for j in i + 1..colors.len() {
            let original = contrast_from_luminances(original_lum[i], original_lum[j]);
            let after = contrast_from_luminances(simulated_lum[i], simulated_lum[j]);
            if passes(original) && !passes(after) {
                losses.push(ContrastLoss {
                    first_index: i,
                    second_index: j,
                    original,
                    simulated: after,
                });
            }
        }
    }
    losses
}

/// Outcome of checking a palette under one deficiency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficiencyCheck {
    pub deficiency: Deficiency,
    /// True when no simulated pair falls below the minimum difference
    pub distinguishable: bool,
    /// Palette index pairs that become too similar
    pub conflicts: Vec<NearDuplicate>,
    /// True when every AA-normal pair still passes AA-normal after simulation
    pub keeps_contrast: bool,
    pub contrast_losses: Vec<ContrastLoss>,
}

/// Check whether a palette stays distinguishable under each deficiency, and
/// whether readable pairs stay readable.
#[cfg_attr(debug_assertions, instrument(skip(colors, deficiencies), fields(colors = colors.len())))]
pub fn colorblind_friendly(
    colors: &[Srgb<u8>],
    deficiencies: &[Deficiency],
    min_difference: f64,
) -> Vec<DeficiencyCheck> {
    deficiencies
        .iter()
        .map(|&deficiency| {
            let simulated: Vec<Srgb<u8>> =
                colors.iter().map(|c| simulate(*c, deficiency)).collect();
            let conflicts =
                near_duplicates(&simulated, DistanceMethod::LabEuclidean, min_difference);
            let contrast_losses = contrast_losses(colors, &simulated);
            DeficiencyCheck {
                deficiency,
                distinguishable: conflicts.is_empty(),
                conflicts,
                keeps_contrast: contrast_losses.is_empty(),
                contrast_losses,
            }
        })
        .collect()
}
