//! Number and text stringification for SVG attributes.

use std::fmt::Write as _;

/// Round-trippable decimal form (like JS `Number#toString()`), without `-0` or float noise.
pub fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }

    let _ = write!(out, "{v}");
}

/// Path coordinates: three fractional digits, ties rounded up (`Math.round(x * 1000) / 1000`).
pub fn fmt_path(v: f64) -> String {
    let mut out = String::new();
    fmt_path_into(&mut out, v);
    out
}

pub fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let k = (v * 1000.0 + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    let abs = k.unsigned_abs();
    if k < 0 {
        out.push('-');
    }
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac == 0 {
        return;
    }
    let digits = format!("{frac:03}");
    out.push('.');
    out.push_str(digits.trim_end_matches('0'));
}

/// `em` offsets for stacked `tspan`s, e.g. `2.9em`.
pub fn fmt_em(v: f64) -> String {
    format!("{}em", fmt(v))
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_drops_float_noise_and_negative_zero() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fmt(29.999_999_9), "30");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn fmt_path_rounds_to_three_digits() {
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-1.2344), "-1.234");
        assert_eq!(fmt_path(0.0004), "0");
        assert_eq!(fmt_path(12.5), "12.5");
        assert_eq!(fmt_path(-50.0), "-50");
    }

    #[test]
    fn escape_xml_escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
