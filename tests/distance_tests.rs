use approx::assert_relative_eq;
use chromawise::ColorError;
use chromawise::convert::parse_hex;
use chromawise::distance::{
    DEFAULT_MIN_DIFFERENCE, DistanceMethod, are_colors_distinct, distance, distinctiveness_score,
    near_duplicates, nearest,
};
use palette::Srgb;

const METHODS: [DistanceMethod; 2] = [DistanceMethod::WeightedRgb, DistanceMethod::LabEuclidean];

fn colors(hexes: &[&str]) -> Vec<Srgb<u8>> {
    hexes.iter().map(|h| parse_hex(h).unwrap()).collect()
}

#[test]
fn test_identity_is_zero() {
    for method in METHODS {
        for color in colors(&["#000000", "#ffffff", "#336699", "#c0ffee"]) {
            assert_eq!(distance(color, color, method), 0.0);
        }
    }
}

#[test]
fn test_non_negative_and_symmetric() {
    let palette = colors(&["#000000", "#ff0000", "#00ff00", "#0000ff", "#808080", "#fafafa"]);
    for method in METHODS {
        for &a in &palette {
            for &b in &palette {
                let d = distance(a, b, method);
                assert!(d >= 0.0);
                assert_relative_eq!(d, distance(b, a, method), epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_lab_black_to_white_is_100() {
    let d = distance(
        Srgb::new(0u8, 0, 0),
        Srgb::new(255u8, 255, 255),
        DistanceMethod::LabEuclidean,
    );
    assert_relative_eq!(d, 100.0, epsilon = 0.05);
}

#[test]
fn test_nearest_picks_closest() {
    let candidates = colors(&["#000000", "#ffffff", "#ff0000", "#0000ff"]);
    for method in METHODS {
        let hit = nearest(parse_hex("#e01010").unwrap(), &candidates, method).unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.color, Srgb::new(255u8, 0, 0));
        assert!(hit.distance > 0.0);
    }
}

#[test]
fn test_nearest_exact_match_has_zero_distance() {
    let candidates = colors(&["#111111", "#336699", "#eeeeee"]);
    let hit = nearest(parse_hex("#336699").unwrap(), &candidates, DistanceMethod::LabEuclidean)
        .unwrap();
    assert_eq!(hit.index, 1);
    assert_eq!(hit.distance, 0.0);
}

#[test]
fn test_nearest_tie_prefers_first_candidate() {
    let candidates = colors(&["#abcdef", "#123456", "#abcdef"]);
    for method in METHODS {
        let hit = nearest(parse_hex("#abcdef").unwrap(), &candidates, method).unwrap();
        assert_eq!(hit.index, 0);
    }
}

#[test]
fn test_nearest_empty_candidates() {
    assert!(matches!(
        nearest(Srgb::new(1u8, 2, 3), &[], DistanceMethod::LabEuclidean),
        Err(ColorError::EmptyCandidateSet)
    ));
}

#[test]
fn test_near_duplicates_reports_close_pairs_in_order() {
    let palette = colors(&["#ff0000", "#0000ff", "#fe0101", "#0101fe"]);
    let dups = near_duplicates(&palette, DistanceMethod::LabEuclidean, DEFAULT_MIN_DIFFERENCE);

    let pairs: Vec<(usize, usize)> = dups
        .iter()
        .map(|d| (d.first_index, d.second_index))
        .collect();
    assert_eq!(pairs, vec![(0, 2), (1, 3)]);
    assert!(dups.iter().all(|d| d.distance < DEFAULT_MIN_DIFFERENCE));
}

#[test]
fn test_are_colors_distinct() {
    assert!(are_colors_distinct(
        &colors(&["#000000", "#ffffff", "#ff0000"]),
        DEFAULT_MIN_DIFFERENCE
    ));
    assert!(!are_colors_distinct(
        &colors(&["#336699", "#336698"]),
        DEFAULT_MIN_DIFFERENCE
    ));
    assert!(are_colors_distinct(&[], DEFAULT_MIN_DIFFERENCE));
}

#[test]
fn test_distinctiveness_score() {
    assert_eq!(distinctiveness_score(&[]), 0.0);
    assert_eq!(distinctiveness_score(&colors(&["#336699"])), 0.0);
    assert_eq!(distinctiveness_score(&colors(&["#336699", "#336699"])), 0.0);

    let bw = distinctiveness_score(&colors(&["#000000", "#ffffff"]));
    assert_relative_eq!(bw, 100.0, epsilon = 0.05);

    let wide = distinctiveness_score(&colors(&["#ff00ff", "#00ff00", "#0000ff", "#ffff00"]));
    assert!(wide > 0.0 && wide <= 100.0);
}

#[test]
fn test_default_method_is_lab() {
    assert_eq!(DistanceMethod::default(), DistanceMethod::LabEuclidean);
    assert_eq!(DistanceMethod::WeightedRgb.to_string(), "weighted-rgb");
}
