use crate::*;
use serde_json::json;

#[test]
fn dotted_paths_read_and_write_nested_values() {
    let mut cfg = SiteConfig::default();
    cfg.set_value("charts.vbar.height", json!(250));
    cfg.set_value("theme.primary", json!("#123456"));
    assert_eq!(cfg.get_f64("charts.vbar.height"), Some(250.0));
    assert_eq!(cfg.get_str("theme.primary"), Some("#123456"));
    assert_eq!(cfg.get_bool("theme.dark"), None);
    assert_eq!(cfg.chart_defaults("vbar"), Some(&json!({"height": 250})));
}

#[test]
fn set_value_replaces_non_object_roots_and_segments() {
    let mut cfg = SiteConfig::from_value(json!([1, 2]));
    cfg.set_value("a.b", json!(true));
    cfg.set_value("a.b.c", json!(1));
    assert_eq!(cfg.as_value(), &json!({"a": {"b": {"c": 1}}}));
}

#[test]
fn assignments_parse_json_or_fall_back_to_strings() {
    let mut cfg = SiteConfig::default();
    cfg.set_assignment("theme.dark=true").unwrap();
    cfg.set_assignment("theme.primary=#ff0000").unwrap();
    cfg.set_assignment("charts.line.width=640").unwrap();
    assert_eq!(cfg.get_bool("theme.dark"), Some(true));
    assert_eq!(cfg.get_str("theme.primary"), Some("#ff0000"));
    assert_eq!(cfg.get_f64("charts.line.width"), Some(640.0));

    assert!(matches!(
        cfg.set_assignment("no-equals-sign"),
        Err(Error::InvalidConfig { .. })
    ));
    assert!(cfg.set_assignment("a..b=1").is_err());
}

#[test]
fn deep_merge_overrides_leaves_and_keeps_siblings() {
    let mut cfg = SiteConfig::from_value(json!({"theme": {"primary": "#111111", "accent": "#222222"}}));
    cfg.deep_merge(&json!({"theme": {"primary": "#333333"}, "locale": {"thousands": ","}}));
    assert_eq!(cfg.get_str("theme.primary"), Some("#333333"));
    assert_eq!(cfg.get_str("theme.accent"), Some("#222222"));
    assert_eq!(cfg.get_str("locale.thousands"), Some(","));
}

#[test]
fn theme_and_locale_resolve_with_defaults() {
    let cfg = SiteConfig::default();
    assert_eq!(cfg.theme().unwrap(), Theme::default());
    assert_eq!(cfg.locale().unwrap(), Locale::default());

    let cfg = SiteConfig::from_value(json!({
        "theme": {"dark": true, "accent": "#00ff00"},
        "locale": {"thousands": ","}
    }));
    let theme = cfg.theme().unwrap();
    assert!(theme.dark);
    assert_eq!(theme.background, "#121212");
    assert_eq!(theme.accent, "#00ff00");
    let locale = cfg.locale().unwrap();
    assert_eq!(locale.thousands, ",");
    assert_eq!(locale.decimal, ".");
}

#[test]
fn invalid_theme_colors_are_reported() {
    let cfg = SiteConfig::from_value(json!({"theme": {"primary": "not-a-color"}}));
    assert!(matches!(cfg.theme(), Err(Error::InvalidColor { .. })));
    let cfg = SiteConfig::from_value(json!({"theme": {"primary": 3}}));
    assert!(matches!(cfg.theme(), Err(Error::InvalidConfig { .. })));

    let mut cfg = SiteConfig::default();
    cfg.set_assignment("theme.primary=#€").unwrap();
    assert!(matches!(cfg.theme(), Err(Error::InvalidColor { .. })));
}
