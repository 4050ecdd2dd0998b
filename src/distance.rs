//! Perceptual color distance and nearest-color matching.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::convert::{CieLab, hex_serde, rgb_to_lab};
use crate::error::{ColorError, Result};

/// Minimum Lab distance for two palette entries to count as distinct.
pub const DEFAULT_MIN_DIFFERENCE: f64 = 25.0;

/// Distance metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMethod {
    /// "Redmean" weighted Euclidean distance in RGB.
    ///
    /// A cheap approximation of perceived difference, not a standard metric.
    WeightedRgb,
    /// Euclidean distance in CIE Lab (CIE76 delta E).
    #[default]
    LabEuclidean,
}

impl fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightedRgb => f.write_str("weighted-rgb"),
            Self::LabEuclidean => f.write_str("lab-euclidean"),
        }
    }
}

impl FromStr for DistanceMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "weighted-rgb" => Ok(Self::WeightedRgb),
            "lab-euclidean" => Ok(Self::LabEuclidean),
            _ => Err(format!(
                "Invalid distance method '{}': expected weighted-rgb or lab-euclidean",
                s
            )),
        }
    }
}

fn weighted_rgb(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    let (r1, g1, b1) = (a.red as f64, a.green as f64, a.blue as f64);
    let (r2, g2, b2) = (b.red as f64, b.green as f64, b.blue as f64);

    let rmean = (r1 + r2) / 2.0;
    let dr = r1 - r2;
    let dg = g1 - g2;
    let db = b1 - b2;

    ((2.0 + rmean / 256.0) * dr * dr + 4.0 * dg * dg + (2.0 + (255.0 - rmean) / 256.0) * db * db)
        .sqrt()
}

fn lab_euclidean(a: CieLab, b: CieLab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Distance between two colors, always `>= 0` and `0` for identical colors.
pub fn distance(a: Srgb<u8>, b: Srgb<u8>, method: DistanceMethod) -> f64 {
    if a == b {
        return 0.0;
    }
    match method {
        DistanceMethod::WeightedRgb => weighted_rgb(a, b),
        DistanceMethod::LabEuclidean => lab_euclidean(rgb_to_lab(a), rgb_to_lab(b)),
    }
}

/// Closest candidate to a color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    /// Position of the candidate in the input list
    pub index: usize,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub color: Srgb<u8>,
    pub distance: f64,
}

/// Find the candidate closest to `color`. The first candidate wins ties.
///
/// # Example
///
/// ```
/// use palette::Srgb;
/// use chromawise::distance::{DistanceMethod, nearest};
///
/// let candidates = [Srgb::new(255u8, 0, 0), Srgb::new(0u8, 0, 255)];
/// let hit = nearest(Srgb::new(200u8, 30, 30), &candidates, DistanceMethod::LabEuclidean).unwrap();
/// assert_eq!(hit.index, 0);
/// ```
pub fn nearest(color: Srgb<u8>, candidates: &[Srgb<u8>], method: DistanceMethod) -> Result<Match> {
    let mut best: Option<Match> = None;

    for (index, &candidate) in candidates.iter().enumerate() {
        let d = distance(color, candidate, method);
        if best.is_none_or(|b| d < b.distance) {
            best = Some(Match {
                index,
                color: candidate,
                distance: d,
            });
        }
    }

    best.ok_or(ColorError::EmptyCandidateSet)
}

/// Pair of palette entries closer than a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearDuplicate {
    pub first_index: usize,
    pub second_index: usize,
    pub distance: f64,
}

/// Unordered pairs whose distance is below `threshold`, in (i, j) order.
pub fn near_duplicates(
    colors: &[Srgb<u8>],
    method: DistanceMethod,
    threshold: f64,
) -> Vec<NearDuplicate> {
    let mut found = Vec::new();
    for (i, &a) in colors.iter().enumerate() {
        for (j, &b) in colors.iter().enumerate().skip(i + 1) {
            let d = distance(a, b, method);
            if d < threshold {
                found.push(NearDuplicate {
                    first_index: i,
                    second_index: j,
                    distance: d,
                });
            }
        }
    }
    found
}

/// Whether every pair is at least `min_difference` apart in Lab space.
pub fn are_colors_distinct(colors: &[Srgb<u8>], min_difference: f64) -> bool {
    near_duplicates(colors, DistanceMethod::LabEuclidean, min_difference).is_empty()
}

/// Mean pairwise Lab distance, capped at 100. Zero for fewer than two colors.
pub fn distinctiveness_score(colors: &[Srgb<u8>]) -> f64 {
    let labs: Vec<CieLab> = colors.iter().map(|c| rgb_to_lab(*c)).collect();
    let mut total = 0.0;
    let mut count = 0usize;

    for (i, a) in labs.iter().enumerate() {
        for b in &labs[i + 1..] {
            total += lab_euclidean(*a, *b);
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        (total / count as f64).min(100.0)
    }
}
