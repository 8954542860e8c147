use crate::format::{precision_fixed, precision_prefix, precision_round};
use crate::*;

fn chf() -> Formatter {
    Formatter::default()
}

#[test]
fn format_price_below_one_million_is_grouped_currency() {
    let f = chf();
    assert_eq!(f.format_price(999.0), "CHF 999");
    assert_eq!(f.format_price(12_345.0), "CHF 12'345");
    assert_eq!(f.format_price(999_999.4), "CHF 999'999");
    assert_eq!(f.format_price(0.0), "CHF 0");
}

#[test]
fn format_price_switches_to_millions_with_three_significant_digits() {
    let f = chf();
    assert_eq!(f.format_price(2_500_000.0), "2.50 Mio.");
    assert_eq!(f.format_price(1_234_567.0), "1.23 Mio.");
    assert_eq!(f.format_price(1_000_000.0), "1.00 Mio.");
    assert_eq!(f.format_price(12_340_000.0), "12.3 Mio.");
    assert!(f.format_price(2_500_000.0).ends_with("Mio."));
}

#[test]
fn format_number_uses_currency_prefix_and_apostrophe_grouping() {
    let f = chf();
    assert_eq!(f.format_number(1_234.4), "CHF 1'234");
    assert_eq!(f.format_number(-1_234.0), "\u{2212}CHF 1'234");
    assert_eq!(f.format_number(1_234_567.0), "CHF 1'234'567");
}

#[test]
fn fixed_and_percent_types() {
    let f = chf();
    assert_eq!(f.format(",.2f", 1234.5).unwrap(), "1'234.50");
    assert_eq!(f.format(".1%", 0.123).unwrap(), "12.3%");
    assert_eq!(f.format("d", 42.4).unwrap(), "42");
    assert_eq!(f.format(".1f", -0.04).unwrap(), "0.0");
}

#[test]
fn exact_ties_round_up_like_to_fixed() {
    let f = chf();
    assert_eq!(f.format(".0f", 2.5).unwrap(), "3");
    assert_eq!(f.format(".0f", 0.5).unwrap(), "1");
    assert_eq!(f.format(".2f", 1.005).unwrap(), "1.00");
}

#[test]
fn default_type_trims_insignificant_zeros() {
    let f = chf();
    assert_eq!(f.format("", 0.1 + 0.2).unwrap(), "0.3");
    assert_eq!(f.format(",", 1_234_567.0).unwrap(), "1'234'567");
    assert_eq!(f.format(",", 1.5).unwrap(), "1.5");
    assert_eq!(f.format(".2~f", 2.0).unwrap(), "2");
}

#[test]
fn si_prefix_and_exponent_types() {
    let f = chf();
    assert_eq!(f.format(".2s", 1500.0).unwrap(), "1.5k");
    assert_eq!(f.format(".3s", 0.00123).unwrap(), "1.23m");
    assert_eq!(f.format(".2e", 1500.0).unwrap(), "1.50e+3");
    assert_eq!(f.format(".3r", 0.012345).unwrap(), "0.0123");
}

#[test]
fn radix_types() {
    let f = chf();
    assert_eq!(f.format("x", 255.0).unwrap(), "ff");
    assert_eq!(f.format("#X", 255.0).unwrap(), "0xFF");
    assert_eq!(f.format("b", 5.0).unwrap(), "101");
}

#[test]
fn padding_and_alignment() {
    let f = chf();
    assert_eq!(f.format("08.2f", -3.5).unwrap(), "\u{2212}0003.50");
    assert_eq!(f.format(">6d", 42.0).unwrap(), "    42");
    assert_eq!(f.format("<6d", 42.0).unwrap(), "42    ");
    assert_eq!(f.format("^6d", 42.0).unwrap(), "  42  ");
    assert_eq!(f.format("+d", 42.0).unwrap(), "+42");
    assert_eq!(f.format("(d", -42.0).unwrap(), "(42)");
}

#[test]
fn nan_formats_as_locale_nan() {
    assert_eq!(chf().format(",.0f", f64::NAN).unwrap(), "NaN");
}

#[test]
fn en_us_locale_uses_commas() {
    let f = Formatter::new(Locale::en_us());
    assert_eq!(f.format("$,.2f", 1234.5).unwrap(), "$1,234.50");
}

#[test]
fn invalid_specifiers_are_rejected() {
    let f = chf();
    for bad in ["abc", ".f", ",.2q", "10.2ff"] {
        let err = f.format(bad, 1.0).unwrap_err();
        assert!(
            matches!(err, Error::InvalidFormatSpecifier { .. }),
            "{bad}: {err}"
        );
    }
}

#[test]
fn parse_specifier_fields() {
    let spec = NumberFormat::parse("*^+$012,.3~f").unwrap();
    assert_eq!(spec.sign, '+');
    assert_eq!(spec.symbol, Some('$'));
    assert!(spec.zero);
    assert_eq!(spec.fill, '0');
    assert_eq!(spec.align, '=');
    assert_eq!(spec.width, Some(12));
    assert!(spec.comma);
    assert_eq!(spec.precision, Some(3));
    assert!(spec.trim);
    assert_eq!(spec.kind, 'f');

    let spec = NumberFormat::parse("n").unwrap();
    assert!(spec.comma);
    assert_eq!(spec.kind, 'g');
}

#[test]
fn precision_helpers() {
    assert_eq!(precision_fixed(0.01), 2);
    assert_eq!(precision_fixed(1.0), 0);
    assert_eq!(precision_fixed(20.0), 0);
    assert_eq!(precision_round(0.01, 1.01), 3);
    assert_eq!(precision_prefix(1e5, 1.3e6), 1);
}
