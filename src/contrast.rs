//! WCAG 2.x relative luminance and contrast ratio.

use palette::Srgb;

use crate::convert::parse_hex;
use crate::error::Result;

/// Luminance coefficients for sRGB primaries (ITU-R BT.709)
const COEF_R: f64 = 0.2126;
const COEF_G: f64 = 0.7152;
const COEF_B: f64 = 0.0722;

/// Linear segment cutoff of the WCAG 2.x sRGB transfer function
const LINEAR_CUTOFF: f64 = 0.03928;

/// Flare term added to both luminances
const FLARE: f64 = 0.05;

#[inline]
fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= LINEAR_CUTOFF {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in [0, 1].
pub fn relative_luminance(color: Srgb<u8>) -> f64 {
    COEF_R * linearize(color.red) + COEF_G * linearize(color.green) + COEF_B * linearize(color.blue)
}

/// Contrast ratio from two precomputed luminances. Order does not matter.
pub fn contrast_from_luminances(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + FLARE) / (darker + FLARE)
}

/// WCAG contrast ratio between two colors, in [1, 21].
///
/// # Example
///
/// ```
/// use palette::Srgb;
/// use chromawise::contrast::contrast_ratio;
///
/// let black = Srgb::new(0u8, 0, 0);
/// let white = Srgb::new(255u8, 255, 255);
/// assert!((contrast_ratio(black, white) - 21.0).abs() < 1e-6);
/// assert_eq!(contrast_ratio(black, white), contrast_ratio(white, black));
/// ```
pub fn contrast_ratio(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    contrast_from_luminances(relative_luminance(a), relative_luminance(b))
}

/// Contrast ratio between two hex strings.
pub fn contrast_ratio_hex(a: &str, b: &str) -> Result<f64> {
    Ok(contrast_ratio(parse_hex(a)?, parse_hex(b)?))
}
