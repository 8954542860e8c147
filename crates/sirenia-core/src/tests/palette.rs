use crate::palette::*;
use crate::theme::{lighten, parse_hex_rgb};
use crate::*;

#[test]
fn category10_has_ten_distinct_colors() {
    let c = category10();
    assert_eq!(c.len(), 10);
    assert_eq!(c[0], "#1f77b4");
    assert_eq!(c[9], "#17becf");
}

#[test]
fn spectral_is_sized_by_cardinality() {
    assert_eq!(spectral(3).unwrap(), vec!["#fc8d59", "#ffffbf", "#99d594"]);
    assert_eq!(spectral(11).unwrap().len(), 11);
    assert!(spectral(2).is_none());
    assert!(spectral(12).is_none());
}

#[test]
fn spectral_for_cardinality_falls_back_to_ramp() {
    assert_eq!(spectral_for_cardinality(5), spectral(5).unwrap());
    let two = spectral_for_cardinality(2);
    assert_eq!(two.len(), 2);
    assert!(two.iter().all(|c| c.starts_with("rgb(")));
    assert_ne!(two[0], two[1]);
    assert_eq!(spectral_for_cardinality(14).len(), 14);
    assert!(spectral_for_cardinality(0).is_empty());
}

#[test]
fn interpolate_spectral_hits_end_stops() {
    assert_eq!(interpolate_spectral(0.0), "rgb(158, 1, 66)");
    assert_eq!(interpolate_spectral(1.0), "rgb(94, 79, 162)");
}

#[test]
fn theme_defaults_and_dark_variant() {
    let light = Theme::default();
    assert_eq!(light.primary, "#E5007D");
    assert!(light.validate().is_ok());
    let dark = Theme::dark();
    assert!(dark.dark);
    assert_eq!(dark.background, "#121212");
    assert_ne!(dark.primary, light.primary);
    assert!(dark.validate().is_ok());
}

#[test]
fn theme_rejects_bad_colors() {
    let theme = Theme {
        primary: "pink".into(),
        ..Theme::default()
    };
    assert!(matches!(theme.validate(), Err(Error::InvalidColor { .. })));
}

#[test]
fn multibyte_colors_fail_validation() {
    assert_eq!(parse_hex_rgb("#€"), None);
    assert_eq!(parse_hex_rgb("#€€"), None);
    for color in ["#€", "#€€"] {
        let theme = Theme {
            primary: color.into(),
            ..Theme::default()
        };
        assert!(matches!(theme.validate(), Err(Error::InvalidColor { .. })));
    }
}

#[test]
fn hex_helpers() {
    assert_eq!(parse_hex_rgb("#fff"), Some((255, 255, 255)));
    assert_eq!(parse_hex_rgb("#E5007D"), Some((229, 0, 125)));
    assert_eq!(parse_hex_rgb("E5007D"), None);
    assert_eq!(lighten("#000000", 50.0).as_deref(), Some("#808080"));
}
