use approx::assert_relative_eq;
use chromawise::ColorError;
use chromawise::convert::{
    CieLab, Cmyk, ColorSpace, Hsl, Hsv, cmyk_to_rgb, conversions, convert, hsl_to_rgb, hsv_to_rgb,
    lab_to_rgb, parse_color, parse_hex, rgb_from_components, rgb_to_cmyk, rgb_to_hex, rgb_to_hsl,
    rgb_to_hsl_exact, rgb_to_hsv, rgb_to_hsv_exact, rgb_to_lab, to_hex,
};
use palette::Srgb;

/// A spread of colors covering every channel extreme and the interior.
fn sample_colors() -> Vec<Srgb<u8>> {
    let steps = [0u8, 1, 17, 51, 90, 127, 128, 173, 204, 238, 254, 255];
    let mut colors = Vec::new();
    for &r in &steps {
        for &g in &steps {
            for &b in &steps {
                colors.push(Srgb::new(r, g, b));
            }
        }
    }
    colors
}

fn max_channel_error(a: Srgb<u8>, b: Srgb<u8>) -> u8 {
    a.red
        .abs_diff(b.red)
        .max(a.green.abs_diff(b.green))
        .max(a.blue.abs_diff(b.blue))
}

#[test]
fn test_hex_normalization() {
    let short = parse_hex("#ABC").unwrap();
    let long = parse_hex("#AABBCC").unwrap();
    let bare = parse_hex("aabbcc").unwrap();

    assert_eq!(short, long);
    assert_eq!(long, bare);
    assert_eq!(short, Srgb::new(0xaau8, 0xbb, 0xcc));
}

#[test]
fn test_invalid_hex_rejected() {
    for input in ["", "#", "#12", "#1234", "#12345", "#1234567", "#ggg", "12 456", "##abc"] {
        assert!(
            matches!(parse_hex(input), Err(ColorError::InvalidColorFormat(_))),
            "{input:?} should be rejected"
        );
    }
}

#[test]
fn test_hex_roundtrip_exact() {
    for r in (0..=255).step_by(5) {
        for g in (0..=255).step_by(3) {
            for b in (0..=255).step_by(17) {
                let hex = rgb_to_hex(r, g, b).unwrap();
                let parsed = parse_hex(&hex).unwrap();
                assert_eq!(
                    (parsed.red as i64, parsed.green as i64, parsed.blue as i64),
                    (r, g, b)
                );
            }
        }
    }
}

#[test]
fn test_rgb_to_hex_lowercase() {
    assert_eq!(rgb_to_hex(255, 128, 0).unwrap(), "#ff8000");
    assert_eq!(to_hex(Srgb::new(0xABu8, 0xCD, 0xEF)), "#abcdef");
}

#[test]
fn test_rgb_to_hex_rejects_out_of_range() {
    assert!(rgb_to_hex(256, 0, 0).is_err());
    assert!(rgb_to_hex(0, -1, 0).is_err());
    assert!(rgb_from_components(0, 0, 1000).is_err());
}

#[test]
fn test_hsl_known_values() {
    let hsl = rgb_to_hsl(parse_hex("#336699").unwrap());
    assert_eq!((hsl.h, hsl.s, hsl.l), (210.0, 50.0, 40.0));

    let red = rgb_to_hsl(Srgb::new(255u8, 0, 0));
    assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));

    let blue = rgb_to_hsl(Srgb::new(0u8, 0, 255));
    assert_eq!((blue.h, blue.s, blue.l), (240.0, 100.0, 50.0));
}

#[test]
fn test_hsl_achromatic_has_zero_hue_and_saturation() {
    for v in [0u8, 64, 128, 200, 255] {
        let hsl = rgb_to_hsl(Srgb::new(v, v, v));
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
    }
}

#[test]
fn test_hsl_components_in_range() {
    for color in sample_colors() {
        let hsl = rgb_to_hsl(color);
        assert!((0.0..360.0).contains(&hsl.h), "hue {} for {:?}", hsl.h, color);
        assert!((0.0..=100.0).contains(&hsl.s));
        assert!((0.0..=100.0).contains(&hsl.l));
    }
}

#[test]
fn test_hsl_exact_roundtrip_within_one() {
    for color in sample_colors() {
        let back = hsl_to_rgb(rgb_to_hsl_exact(color)).unwrap();
        assert!(max_channel_error(color, back) <= 1, "{color:?} -> {back:?}");
    }
}

#[test]
fn test_hsl_rounded_roundtrip_bounded_by_quantization() {
    // Whole-degree hue steps move the middle channel by up to ~2 units, and
    // whole-percent S/L add ~1.3 each on top.
    for color in sample_colors() {
        let back = hsl_to_rgb(rgb_to_hsl(color)).unwrap();
        assert!(max_channel_error(color, back) <= 6, "{color:?} -> {back:?}");
    }
}

#[test]
fn test_hsl_gray_roundtrip_within_one() {
    for v in 0..=255u8 {
        let gray = Srgb::new(v, v, v);
        let back = hsl_to_rgb(rgb_to_hsl(gray)).unwrap();
        assert!(max_channel_error(gray, back) <= 1, "{gray:?} -> {back:?}");
    }
}

#[test]
fn test_hsl_input_validation() {
    assert!(hsl_to_rgb(Hsl::new(360.0, 50.0, 50.0)).is_err());
    assert!(hsl_to_rgb(Hsl::new(-1.0, 50.0, 50.0)).is_err());
    assert!(hsl_to_rgb(Hsl::new(0.0, 101.0, 50.0)).is_err());
    assert!(hsl_to_rgb(Hsl::new(0.0, 50.0, f64::NAN)).is_err());
    assert_eq!(
        hsl_to_rgb(Hsl::new(0.0, 100.0, 50.0)).unwrap(),
        Srgb::new(255u8, 0, 0)
    );
}

#[test]
fn test_hsv_known_values() {
    let hsv = rgb_to_hsv(parse_hex("#336699").unwrap());
    assert_eq!((hsv.h, hsv.s, hsv.v), (210.0, 67.0, 60.0));

    let white = rgb_to_hsv(Srgb::new(255u8, 255, 255));
    assert_eq!((white.h, white.s, white.v), (0.0, 0.0, 100.0));
}

#[test]
fn test_hsv_roundtrip() {
    for color in sample_colors() {
        let exact = hsv_to_rgb(rgb_to_hsv_exact(color)).unwrap();
        assert!(max_channel_error(color, exact) <= 1, "{color:?} -> {exact:?}");

        let rounded = hsv_to_rgb(rgb_to_hsv(color)).unwrap();
        assert!(max_channel_error(color, rounded) <= 4, "{color:?} -> {rounded:?}");
    }
}

#[test]
fn test_hsv_input_validation() {
    assert!(hsv_to_rgb(Hsv::new(400.0, 10.0, 10.0)).is_err());
    assert!(hsv_to_rgb(Hsv::new(10.0, 10.0, 100.5)).is_err());
}

#[test]
fn test_cmyk_black_and_white() {
    let black = rgb_to_cmyk(Srgb::new(0u8, 0, 0));
    assert_eq!(black, Cmyk::new(0.0, 0.0, 0.0, 100.0));

    let white = rgb_to_cmyk(Srgb::new(255u8, 255, 255));
    assert_relative_eq!(white.c, 0.0);
    assert_relative_eq!(white.m, 0.0);
    assert_relative_eq!(white.y, 0.0);
    assert_relative_eq!(white.k, 0.0);
}

#[test]
fn test_cmyk_known_value() {
    let cmyk = rgb_to_cmyk(parse_hex("#336699").unwrap());
    assert_relative_eq!(cmyk.c, 66.666_666, epsilon = 1e-4);
    assert_relative_eq!(cmyk.m, 33.333_333, epsilon = 1e-4);
    assert_relative_eq!(cmyk.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(cmyk.k, 40.0, epsilon = 1e-9);
}

#[test]
fn test_cmyk_roundtrip() {
    for color in sample_colors() {
        let back = cmyk_to_rgb(rgb_to_cmyk(color)).unwrap();
        assert!(max_channel_error(color, back) <= 1, "{color:?} -> {back:?}");
    }
}

#[test]
fn test_cmyk_input_validation() {
    assert!(cmyk_to_rgb(Cmyk::new(0.0, 0.0, 0.0, 101.0)).is_err());
    assert!(cmyk_to_rgb(Cmyk::new(-5.0, 0.0, 0.0, 0.0)).is_err());
}

#[test]
fn test_lab_reference_points() {
    let white = rgb_to_lab(Srgb::new(255u8, 255, 255));
    assert_relative_eq!(white.l, 100.0, epsilon = 0.01);
    assert_relative_eq!(white.a, 0.0, epsilon = 0.01);
    assert_relative_eq!(white.b, 0.0, epsilon = 0.01);

    let black = rgb_to_lab(Srgb::new(0u8, 0, 0));
    assert_relative_eq!(black.l, 0.0, epsilon = 0.01);

    let red = rgb_to_lab(Srgb::new(255u8, 0, 0));
    assert_relative_eq!(red.l, 53.24, epsilon = 0.1);
    assert_relative_eq!(red.a, 80.09, epsilon = 0.2);
    assert_relative_eq!(red.b, 67.20, epsilon = 0.2);
}

#[test]
fn test_lab_roundtrip_within_one() {
    for color in sample_colors() {
        let back = lab_to_rgb(rgb_to_lab(color)).unwrap();
        assert!(max_channel_error(color, back) <= 1, "{color:?} -> {back:?}");
    }
}

#[test]
fn test_lab_input_validation() {
    assert!(lab_to_rgb(CieLab::new(101.0, 0.0, 0.0)).is_err());
    assert!(lab_to_rgb(CieLab::new(-0.5, 0.0, 0.0)).is_err());
    assert!(lab_to_rgb(CieLab::new(50.0, f64::INFINITY, 0.0)).is_err());
    // Out-of-gamut but well-formed Lab is clamped, not rejected
    assert!(lab_to_rgb(CieLab::new(50.0, 127.0, -128.0)).is_ok());
}

#[test]
fn test_color_space_names() {
    assert_eq!("HSL".parse::<ColorSpace>().unwrap(), ColorSpace::Hsl);
    assert_eq!(" lab ".parse::<ColorSpace>().unwrap(), ColorSpace::Lab);
    assert!(matches!(
        "ycbcr".parse::<ColorSpace>(),
        Err(ColorError::UnsupportedConversion(_))
    ));
}

#[test]
fn test_convert_each_space_back_to_rgb() {
    let color = parse_hex("#c0ffee").unwrap();
    for space in ColorSpace::ALL {
        let value = convert(color, space);
        assert_eq!(value.space(), space);
        let back = value.to_rgb().unwrap();
        let tolerance = match space {
            ColorSpace::Hsl => 6,
            ColorSpace::Hsv => 4,
            _ => 1,
        };
        assert!(
            max_channel_error(color, back) <= tolerance,
            "{space}: {color:?} -> {back:?}"
        );
    }
}

#[test]
fn test_conversions_bundle() {
    let all = conversions(parse_hex("#336699").unwrap());
    assert_eq!(all.hex, "#336699");
    assert_eq!((all.rgb.r, all.rgb.g, all.rgb.b), (0x33, 0x66, 0x99));
    assert_eq!(all.hsl.h, 210.0);
    assert!(all.luminance > 0.0 && all.luminance < 1.0);
}

#[test]
fn test_parse_color_accepts_css_syntax() {
    assert_eq!(parse_color("#fff").unwrap(), Srgb::new(255u8, 255, 255));
    assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), Srgb::new(255u8, 0, 0));
    assert_eq!(
        parse_color("rebeccapurple").unwrap(),
        Srgb::new(0x66u8, 0x33, 0x99)
    );
    assert!(matches!(
        parse_color("not-a-color"),
        Err(ColorError::InvalidColorFormat(_))
    ));
}

#[test]
fn test_parse_color_rejects_malformed_hex() {
    for input in ["#abcd", "abcd", "#11223344", "11223344", "#12345"] {
        assert!(
            matches!(parse_color(input), Err(ColorError::InvalidColorFormat(_))),
            "{input:?} should be rejected"
        );
    }
    assert_eq!(parse_color(" abc ").unwrap(), Srgb::new(0xaau8, 0xbb, 0xcc));
}

#[test]
fn test_parse_color_rejects_translucent() {
    for input in ["transparent", "rgba(255, 0, 0, 0.5)", "rgba(0, 0, 255, 0)"] {
        assert!(
            matches!(parse_color(input), Err(ColorError::InvalidColorFormat(_))),
            "{input:?} should be rejected"
        );
    }
    assert_eq!(
        parse_color("rgba(255, 0, 0, 1)").unwrap(),
        Srgb::new(255u8, 0, 0)
    );
}
