//! Color space conversion between hex, RGB, HSL, HSV, CMYK and CIE Lab.
//!
//! The canonical form of a color is `Srgb<u8>`. Every other representation is
//! derived from it and validated on the way back in: out-of-range input is an
//! error, only output is rounded and clamped.
//!
//! HSL and HSV are reported as whole degrees and whole percents (rounded half
//! away from zero). The `_exact` variants keep full precision for callers that
//! chain conversions.

use std::fmt;
use std::str::FromStr;

use csscolorparser::Color as CssColor;
use palette::encoding::Srgb as SrgbStandard;
use palette::white_point::D65;
use palette::{FromColor, IntoColor, LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

use crate::contrast::relative_luminance;
use crate::error::{ColorError, Result};

/// Parse a hex color (`#abc`, `abc`, `#aabbcc` or `aabbcc`, any case).
///
/// # Example
///
/// ```
/// use chromawise::convert::parse_hex;
///
/// assert_eq!(parse_hex("#ABC").unwrap(), parse_hex("aabbcc").unwrap());
/// assert!(parse_hex("#abcd").is_err());
/// ```
pub fn parse_hex(input: &str) -> Result<Srgb<u8>> {
    let digits = input.strip_prefix('#').unwrap_or(input);

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidColorFormat(format!(
            "'{}' contains non-hex characters",
            input
        )));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => {
            return Err(ColorError::InvalidColorFormat(format!(
                "'{}' must have 3 or 6 hex digits",
                input
            )));
        }
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|e| ColorError::InvalidColorFormat(format!("'{}': {}", input, e)))
    };

    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format a color as lowercase `#rrggbb`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Build a color from integer channels, rejecting anything outside 0-255.
pub fn rgb_from_components(r: i64, g: i64, b: i64) -> Result<Srgb<u8>> {
    let channel = |name: &str, v: i64| {
        u8::try_from(v).map_err(|_| {
            ColorError::InvalidColorFormat(format!("{} channel {} is outside 0-255", name, v))
        })
    };
    Ok(Srgb::new(channel("red", r)?, channel("green", g)?, channel("blue", b)?))
}

/// Format integer channels as lowercase `#rrggbb`.
pub fn rgb_to_hex(r: i64, g: i64, b: i64) -> Result<String> {
    rgb_from_components(r, g, b).map(to_hex)
}

/// Parse any opaque CSS color (hex, `rgb()`, `hsl()`, named colors).
///
/// Anything made only of hex digits is held to the strict `parse_hex` rules,
/// so `#abcd` or `#11223344` never reach the CSS parser. Colors with an alpha
/// below 1 (including `transparent`) are rejected rather than flattened.
pub fn parse_color(input: &str) -> Result<Srgb<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let all_hex = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit());
    if trimmed.starts_with('#') || all_hex {
        return parse_hex(trimmed);
    }

    let css: CssColor = trimmed
        .parse()
        .map_err(|e| ColorError::InvalidColorFormat(format!("'{}': {}", input, e)))?;
    if css.a < 1.0 {
        return Err(ColorError::InvalidColorFormat(format!(
            "'{}' is not opaque (alpha {})",
            input, css.a
        )));
    }
    let [r, g, b, _] = css.to_rgba8();
    Ok(Srgb::new(r, g, b))
}

fn to_unit(color: Srgb<u8>) -> Srgb<f64> {
    color.into_format()
}

fn from_unit(color: Srgb<f64>) -> Srgb<u8> {
    let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(color.red), channel(color.green), channel(color.blue))
}

fn check_range(name: &str, value: f64, min: f64, max: f64, max_inclusive: bool) -> Result<()> {
    let upper_ok = if max_inclusive { value <= max } else { value < max };
    if value.is_finite() && value >= min && upper_ok {
        Ok(())
    } else {
        let close = if max_inclusive { ']' } else { ')' };
        Err(ColorError::InvalidColorFormat(format!(
            "{} {} is outside [{}, {}{}",
            name, value, min, max, close
        )))
    }
}

fn round_hue(hue: f64) -> f64 {
    let h = hue.round();
    if h >= 360.0 { h - 360.0 } else { h }
}

fn normalize_hue(hue: f64) -> f64 {
    if hue >= 360.0 { hue - 360.0 } else { hue }
}

/// HSL color: hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Round to whole degrees and percents.
    pub fn rounded(self) -> Self {
        Self {
            h: round_hue(self.h),
            s: self.s.round(),
            l: self.l.round(),
        }
    }

    fn validate(&self) -> Result<()> {
        check_range("hue", self.h, 0.0, 360.0, false)?;
        check_range("saturation", self.s, 0.0, 100.0, true)?;
        check_range("lightness", self.l, 0.0, 100.0, true)
    }
}

/// HSV color: hue in degrees [0, 360), saturation and value in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Round to whole degrees and percents.
    pub fn rounded(self) -> Self {
        Self {
            h: round_hue(self.h),
            s: self.s.round(),
            v: self.v.round(),
        }
    }

    fn validate(&self) -> Result<()> {
        check_range("hue", self.h, 0.0, 360.0, false)?;
        check_range("saturation", self.s, 0.0, 100.0, true)?;
        check_range("value", self.v, 0.0, 100.0, true)
    }
}

/// CMYK color, each component a percent in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Cmyk {
    pub fn new(c: f64, m: f64, y: f64, k: f64) -> Self {
        Self { c, m, y, k }
    }

    fn validate(&self) -> Result<()> {
        check_range("cyan", self.c, 0.0, 100.0, true)?;
        check_range("magenta", self.m, 0.0, 100.0, true)?;
        check_range("yellow", self.y, 0.0, 100.0, true)?;
        check_range("key", self.k, 0.0, 100.0, true)
    }
}

/// CIE L*a*b* color relative to the D65 white point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CieLab {
    /// Lightness, 0-100
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl CieLab {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    fn validate(&self) -> Result<()> {
        check_range("L*", self.l, 0.0, 100.0, true)?;
        if self.a.is_finite() && self.b.is_finite() {
            Ok(())
        } else {
            Err(ColorError::InvalidColorFormat(format!(
                "a*/b* must be finite, got ({}, {})",
                self.a, self.b
            )))
        }
    }
}

/// Integer RGB triple in serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Srgb<u8>> for Rgb8 {
    fn from(c: Srgb<u8>) -> Self {
        Self {
            r: c.red,
            g: c.green,
            b: c.blue,
        }
    }
}

impl From<Rgb8> for Srgb<u8> {
    fn from(c: Rgb8) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

/// Convert to HSL without rounding. Achromatic colors get hue 0.
pub fn rgb_to_hsl_exact(color: Srgb<u8>) -> Hsl {
    let hsl: palette::Hsl<SrgbStandard, f64> = palette::Hsl::from_color(to_unit(color));
    let achromatic = color.red == color.green && color.green == color.blue;
    Hsl {
        h: if achromatic {
            0.0
        } else {
            normalize_hue(hsl.hue.into_positive_degrees())
        },
        s: if achromatic { 0.0 } else { hsl.saturation * 100.0 },
        l: hsl.lightness * 100.0,
    }
}

/// Convert to HSL in whole degrees and percents.
///
/// Whole-unit output is lossy: `hsl_to_rgb` restores each channel within 6
/// (grays within 1). Use [`rgb_to_hsl_exact`] for a round-trip within 1.
pub fn rgb_to_hsl(color: Srgb<u8>) -> Hsl {
    rgb_to_hsl_exact(color).rounded()
}

/// Convert HSL back to RGB, rounding and clamping each channel.
pub fn hsl_to_rgb(hsl: Hsl) -> Result<Srgb<u8>> {
    hsl.validate()?;
    let rgb = Srgb::<f64>::from_color(palette::Hsl::new_srgb(
        hsl.h,
        hsl.s / 100.0,
        hsl.l / 100.0,
    ));
    Ok(from_unit(rgb))
}

/// Convert to HSV without rounding. Achromatic colors get hue 0.
pub fn rgb_to_hsv_exact(color: Srgb<u8>) -> Hsv {
    let hsv: palette::Hsv<SrgbStandard, f64> = palette::Hsv::from_color(to_unit(color));
    let achromatic = color.red == color.green && color.green == color.blue;
    Hsv {
        h: if achromatic {
            0.0
        } else {
            normalize_hue(hsv.hue.into_positive_degrees())
        },
        s: if achromatic { 0.0 } else { hsv.saturation * 100.0 },
        v: hsv.value * 100.0,
    }
}

/// Convert to HSV in whole degrees and percents.
///
/// `hsv_to_rgb` restores each channel within 4; use [`rgb_to_hsv_exact`] for
/// a round-trip within 1.
pub fn rgb_to_hsv(color: Srgb<u8>) -> Hsv {
    rgb_to_hsv_exact(color).rounded()
}

/// Convert HSV back to RGB, rounding and clamping each channel.
pub fn hsv_to_rgb(hsv: Hsv) -> Result<Srgb<u8>> {
    hsv.validate()?;
    let rgb = Srgb::<f64>::from_color(palette::Hsv::new_srgb(
        hsv.h,
        hsv.s / 100.0,
        hsv.v / 100.0,
    ));
    Ok(from_unit(rgb))
}

/// Convert to CMYK. Pure black is `(0, 0, 0, 100)`.
pub fn rgb_to_cmyk(color: Srgb<u8>) -> Cmyk {
    let rgb = to_unit(color);
    let max = rgb.red.max(rgb.green).max(rgb.blue);
    let k = 1.0 - max;

    if max == 0.0 {
        return Cmyk::new(0.0, 0.0, 0.0, 100.0);
    }

    let ink = |channel: f64| (1.0 - channel - k) / (1.0 - k) * 100.0;
    Cmyk::new(ink(rgb.red), ink(rgb.green), ink(rgb.blue), k * 100.0)
}

/// Convert CMYK back to RGB.
pub fn cmyk_to_rgb(cmyk: Cmyk) -> Result<Srgb<u8>> {
    cmyk.validate()?;
    let k = cmyk.k / 100.0;
    let channel = |ink: f64| (1.0 - ink / 100.0) * (1.0 - k);
    Ok(from_unit(Srgb::new(
        channel(cmyk.c),
        channel(cmyk.m),
        channel(cmyk.y),
    )))
}

/// Convert to CIE Lab (sRGB companding, D65 reference white).
pub fn rgb_to_lab(color: Srgb<u8>) -> CieLab {
    let linear: LinSrgb<f64> = to_unit(color).into_linear();
    let lab: palette::Lab<D65, f64> = linear.into_color();
    CieLab::new(lab.l, lab.a, lab.b)
}

/// Convert CIE Lab back to RGB. Out-of-gamut results are clamped.
pub fn lab_to_rgb(lab: CieLab) -> Result<Srgb<u8>> {
    lab.validate()?;
    let linear: LinSrgb<f64> = palette::Lab::<D65, f64>::new(lab.l, lab.a, lab.b).into_color();
    Ok(from_unit(Srgb::from_linear(linear)))
}

/// Color spaces the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Hex,
    Rgb,
    Hsl,
    Hsv,
    Cmyk,
    Lab,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 6] = [
        ColorSpace::Hex,
        ColorSpace::Rgb,
        ColorSpace::Hsl,
        ColorSpace::Hsv,
        ColorSpace::Cmyk,
        ColorSpace::Lab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
            Self::Hsv => "hsv",
            Self::Cmyk => "cmyk",
            Self::Lab => "lab",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|space| space.name() == wanted)
            .ok_or_else(|| ColorError::UnsupportedConversion(format!("rgb -> {}", s.trim())))
    }
}

/// A color expressed in one particular color space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorValue {
    Hex(String),
    Rgb(Rgb8),
    Hsl(Hsl),
    Hsv(Hsv),
    Cmyk(Cmyk),
    Lab(CieLab),
}

impl ColorValue {
    pub fn space(&self) -> ColorSpace {
        match self {
            Self::Hex(_) => ColorSpace::Hex,
            Self::Rgb(_) => ColorSpace::Rgb,
            Self::Hsl(_) => ColorSpace::Hsl,
            Self::Hsv(_) => ColorSpace::Hsv,
            Self::Cmyk(_) => ColorSpace::Cmyk,
            Self::Lab(_) => ColorSpace::Lab,
        }
    }

    /// Convert back to the canonical RGB form, validating the components.
    pub fn to_rgb(&self) -> Result<Srgb<u8>> {
        match self {
            Self::Hex(s) => parse_hex(s),
            Self::Rgb(c) => Ok((*c).into()),
            Self::Hsl(c) => hsl_to_rgb(*c),
            Self::Hsv(c) => hsv_to_rgb(*c),
            Self::Cmyk(c) => cmyk_to_rgb(*c),
            Self::Lab(c) => lab_to_rgb(*c),
        }
    }
}

/// Express `color` in the requested color space.
pub fn convert(color: Srgb<u8>, space: ColorSpace) -> ColorValue {
    match space {
        ColorSpace::Hex => ColorValue::Hex(to_hex(color)),
        ColorSpace::Rgb => ColorValue::Rgb(color.into()),
        ColorSpace::Hsl => ColorValue::Hsl(rgb_to_hsl(color)),
        ColorSpace::Hsv => ColorValue::Hsv(rgb_to_hsv(color)),
        ColorSpace::Cmyk => ColorValue::Cmyk(rgb_to_cmyk(color)),
        ColorSpace::Lab => ColorValue::Lab(rgb_to_lab(color)),
    }
}

/// Every derived representation of a single color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorConversions {
    pub hex: String,
    pub rgb: Rgb8,
    pub hsl: Hsl,
    pub hsv: Hsv,
    pub cmyk: Cmyk,
    pub lab: CieLab,
    /// WCAG relative luminance, 0-1
    pub luminance: f64,
}

pub fn conversions(color: Srgb<u8>) -> ColorConversions {
    ColorConversions {
        hex: to_hex(color),
        rgb: color.into(),
        hsl: rgb_to_hsl(color),
        hsv: rgb_to_hsv(color),
        cmyk: rgb_to_cmyk(color),
        lab: rgb_to_lab(color),
        luminance: relative_luminance(color),
    }
}

/// Serde helper that writes an `Srgb<u8>` as a `#rrggbb` string.
pub mod hex_serde {
    use palette::Srgb;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(color: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_rounding_wraps_at_360() {
        assert_eq!(round_hue(359.6), 0.0);
        assert_eq!(round_hue(359.4), 359.0);
    }

    #[test]
    fn range_check_respects_open_upper_bound() {
        assert!(check_range("hue", 359.99, 0.0, 360.0, false).is_ok());
        assert!(check_range("hue", 360.0, 0.0, 360.0, false).is_err());
        assert!(check_range("lightness", 100.0, 0.0, 100.0, true).is_ok());
        assert!(check_range("lightness", f64::NAN, 0.0, 100.0, true).is_err());
    }

    #[test]
    fn unit_conversion_clamps() {
        let c = from_unit(Srgb::new(-0.2, 0.5, 1.3));
        assert_eq!((c.red, c.green, c.blue), (0, 128, 255));
    }
}
