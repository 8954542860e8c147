//! Locale-aware number formatting (the d3-format mini-language).
//!
//! A [`Formatter`] is an explicit value: charts receive it through their render context rather
//! than reading a process-wide locale.

mod spec;

pub use spec::NumberFormat;

use crate::error::Result;
use serde::{Deserialize, Serialize};

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub decimal: String,
    pub thousands: String,
    pub grouping: Vec<usize>,
    pub currency: (String, String),
    pub minus: String,
    pub nan: String,
    pub percent: String,
}

impl Locale {
    /// Swiss francs: `'` thousands separator, `CHF ` currency prefix.
    pub fn chf() -> Self {
        Self {
            decimal: ".".to_string(),
            thousands: "'".to_string(),
            grouping: vec![3],
            currency: ("CHF ".to_string(), String::new()),
            minus: "\u{2212}".to_string(),
            nan: "NaN".to_string(),
            percent: "%".to_string(),
        }
    }

    pub fn en_us() -> Self {
        Self {
            thousands: ",".to_string(),
            currency: ("$".to_string(), String::new()),
            ..Self::chf()
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::chf()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatter {
    locale: Locale,
}

impl Formatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Formats `v` with a specifier string such as `$,.0f` or `.1%`.
    pub fn format(&self, specifier: &str, v: f64) -> Result<String> {
        let spec = NumberFormat::parse(specifier)?;
        Ok(self.format_with(&spec, v))
    }

    /// Currency, grouped, no decimals: `CHF 12'345`.
    pub fn format_number(&self, v: f64) -> String {
        self.format_with(&currency_integer(), v)
    }

    /// Price label: grouped currency integers below one million, otherwise millions with three
    /// significant digits and a `Mio.` suffix (`2.50 Mio.`).
    pub fn format_price(&self, v: f64) -> String {
        if v < 1_000_000.0 || v.is_nan() {
            return self.format_number(v);
        }
        let spec = NumberFormat {
            precision: Some(3),
            kind: 'r',
            ..NumberFormat::default()
        };
        format!("{} Mio.", self.format_with(&spec, v / 1_000_000.0))
    }

    pub fn format_with(&self, spec: &NumberFormat, value: f64) -> String {
        let locale = &self.locale;
        let mut kind = spec.kind;
        let mut trim = spec.trim;
        let mut precision = spec.precision;
        let fixed_prefix = spec.prefix_value.filter(|_| kind == 's');
        if kind == ' ' {
            precision = precision.or(Some(12));
            trim = true;
            kind = 'g';
        }
        let precision = match precision {
            None => 6,
            Some(p) if fixed_prefix.is_none() && "gprs".contains(kind) => p.clamp(1, 21),
            Some(p) => p.min(20),
        };

        let mut prefix = match spec.symbol {
            Some('$') => locale.currency.0.clone(),
            Some('#') if "boxX".contains(kind) => format!("0{}", kind.to_ascii_lowercase()),
            _ => String::new(),
        };
        let mut suffix = match spec.symbol {
            Some('$') => locale.currency.1.clone(),
            _ if kind == '%' => locale.percent.clone(),
            _ => String::new(),
        };

        let mut negative = value < 0.0 || (value == 0.0 && value.is_sign_negative());
        let (mut body, prefix_exponent) = if value.is_nan() {
            (locale.nan.clone(), 0)
        } else if let Some(fixed) = fixed_prefix {
            let e = si_exponent(fixed);
            (to_fixed(value.abs() * 10f64.powi(-e), precision), e)
        } else {
            format_type(kind, value.abs(), precision)
        };
        if trim {
            body = format_trim(&body);
        }
        if negative && body.parse::<f64>().is_ok_and(|v| v == 0.0) && spec.sign != '+' {
            negative = false;
        }

        let sign_text = if negative {
            if spec.sign == '(' {
                "(".to_string()
            } else {
                locale.minus.clone()
            }
        } else if spec.sign == '-' || spec.sign == '(' {
            String::new()
        } else {
            spec.sign.to_string()
        };
        prefix = format!("{sign_text}{prefix}");

        let si = if kind == 's' {
            SI_PREFIXES[(8 + prefix_exponent / 3).clamp(0, 16) as usize]
        } else {
            ""
        };
        suffix = format!(
            "{si}{suffix}{}",
            if negative && spec.sign == '(' { ")" } else { "" }
        );

        if "defgprs%".contains(kind) {
            if let Some(pos) = body.find(|c: char| !c.is_ascii_digit()) {
                let rest = &body[pos..];
                let moved = match rest.strip_prefix('.') {
                    Some(frac) => format!("{}{frac}", locale.decimal),
                    None => rest.to_string(),
                };
                suffix = format!("{moved}{suffix}");
                body.truncate(pos);
            }
        }

        if spec.comma && !spec.zero {
            body = group(&body, usize::MAX, locale);
        }

        let width = spec.width.unwrap_or(0);
        let length = prefix.chars().count() + body.chars().count() + suffix.chars().count();
        let mut padding: String = if length < width {
            std::iter::repeat_n(spec.fill, width - length).collect()
        } else {
            String::new()
        };
        if spec.comma && spec.zero {
            let limit = if padding.is_empty() {
                usize::MAX
            } else {
                width.saturating_sub(suffix.chars().count())
            };
            body = group(&format!("{padding}{body}"), limit, locale);
            padding.clear();
        }

        match spec.align {
            '<' => format!("{prefix}{body}{suffix}{padding}"),
            '=' => format!("{prefix}{padding}{body}{suffix}"),
            '^' => {
                let half = padding.chars().count() / 2;
                let left: String = padding.chars().take(half).collect();
                let right: String = padding.chars().skip(half).collect();
                format!("{left}{prefix}{body}{suffix}{right}")
            }
            _ => format!("{padding}{prefix}{body}{suffix}"),
        }
    }
}

fn currency_integer() -> NumberFormat {
    NumberFormat {
        symbol: Some('$'),
        comma: true,
        precision: Some(0),
        kind: 'f',
        ..NumberFormat::default()
    }
}

/// Renders `x >= 0` for conversion `kind`; also returns the SI exponent picked for `s`.
fn format_type(kind: char, x: f64, p: usize) -> (String, i32) {
    match kind {
        '%' => (to_fixed(x * 100.0, p), 0),
        'd' => (to_fixed(x.round(), 0), 0),
        'e' => (to_exponential(x, Some(p)), 0),
        'f' => (to_fixed(x, p), 0),
        'g' => (to_precision(x, p), 0),
        'r' => (format_rounded(x, p), 0),
        's' => format_prefix_auto(x, p),
        'b' => (radix(x, 2), 0),
        'o' => (radix(x, 8), 0),
        'x' => (radix(x, 16), 0),
        'X' => (radix(x, 16).to_uppercase(), 0),
        _ => (to_precision(x, p), 0),
    }
}

fn radix(x: f64, base: u32) -> String {
    let mut n = x.round() as u64;
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let d = (n % base as u64) as u32;
        digits.push(std::char::from_digit(d, base).unwrap_or('0'));
        n /= base as u64;
    }
    digits.iter().rev().collect()
}

/// Next representable value above a positive finite `x`.
fn next_up(x: f64) -> f64 {
    if x > 0.0 && x.is_finite() {
        f64::from_bits(x.to_bits() + 1)
    } else {
        x
    }
}

/// Whether the digits past the rounding position read `5000…`, i.e. `x` sits on a tie.
fn is_tie(expanded: &str) -> bool {
    let tail = &expanded[expanded.len().saturating_sub(TIE_DIGITS)..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

const TIE_DIGITS: usize = 30;

/// JS `toFixed`: exact ties round up.
fn to_fixed(x: f64, p: usize) -> String {
    if !x.is_finite() {
        return crate::value::js_number(x);
    }
    let wide = p + TIE_DIGITS;
    if is_tie(&format!("{x:.wide$}")) {
        let up = next_up(x);
        return format!("{up:.p$}");
    }
    format!("{x:.p$}")
}

/// JS `toExponential`, e.g. `1.50e+3`.
fn to_exponential(x: f64, p: Option<usize>) -> String {
    let raw = match p {
        Some(p) => {
            let digits = p + TIE_DIGITS;
            let wide = format!("{x:.digits$e}");
            let mantissa = wide.split_once('e').map_or(wide.as_str(), |(m, _)| m);
            let x = if is_tie(mantissa) { next_up(x) } else { x };
            format!("{x:.p$e}")
        }
        None => format!("{x:e}"),
    };
    match raw.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => raw,
    }
}

/// Coefficient digits (no decimal point) and decimal exponent of `x` at `p` significant digits.
fn decimal_parts(x: f64, p: Option<usize>) -> Option<(String, i32)> {
    if !x.is_finite() {
        return None;
    }
    let s = to_exponential(x, p.filter(|p| *p > 0).map(|p| p - 1));
    let (mantissa, exp) = s.split_once('e')?;
    let coefficient: String = mantissa.chars().filter(|c| *c != '.').collect();
    Some((coefficient, exp.parse().ok()?))
}

/// Decimal exponent as d3 computes it (`NaN` maps to `None`).
fn exponent(x: f64) -> Option<i32> {
    decimal_parts(x.abs(), None).map(|(_, e)| e)
}

fn si_exponent(value: f64) -> i32 {
    let e = exponent(value).unwrap_or(0);
    (e.div_euclid(3)).clamp(-8, 8) * 3
}

/// JS `toPrecision`.
fn to_precision(x: f64, p: usize) -> String {
    let p = p.max(1);
    if x == 0.0 {
        return to_fixed(0.0, p - 1);
    }
    let Some((_, e)) = decimal_parts(x, Some(p)) else {
        return crate::value::js_number(x);
    };
    if e < -6 || e >= p as i32 {
        to_exponential(x, Some(p - 1))
    } else {
        to_fixed(x, (p as i32 - 1 - e).max(0) as usize)
    }
}

fn format_rounded(x: f64, p: usize) -> String {
    let Some((coefficient, e)) = decimal_parts(x, Some(p)) else {
        return crate::value::js_number(x);
    };
    if e < 0 {
        format!("0.{}{coefficient}", "0".repeat((-e - 1) as usize))
    } else if coefficient.len() > (e + 1) as usize {
        let (head, tail) = coefficient.split_at((e + 1) as usize);
        format!("{head}.{tail}")
    } else {
        format!(
            "{coefficient}{}",
            "0".repeat((e + 1) as usize - coefficient.len())
        )
    }
}

fn format_prefix_auto(x: f64, p: usize) -> (String, i32) {
    let Some((coefficient, e)) = decimal_parts(x, Some(p)) else {
        return (crate::value::js_number(x), 0);
    };
    let prefix_exponent = e.div_euclid(3).clamp(-8, 8) * 3;
    let i = e - prefix_exponent + 1;
    let n = coefficient.len() as i32;
    let s = if i == n {
        coefficient
    } else if i > n {
        format!("{coefficient}{}", "0".repeat((i - n) as usize))
    } else if i > 0 {
        let (head, tail) = coefficient.split_at(i as usize);
        format!("{head}.{tail}")
    } else {
        let digits = decimal_parts(x, Some((p as i32 + i - 1).max(0) as usize))
            .map(|(c, _)| c)
            .unwrap_or_default();
        format!("0.{}{digits}", "0".repeat((-i) as usize))
    };
    (s, prefix_exponent)
}

/// Removes insignificant trailing zeros (`1.500` → `1.5`, `2.0` → `2`).
fn format_trim(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut i0: isize = -1;
    let mut i1: isize = -1;
    let mut i = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i0 = i as isize;
                i1 = i as isize;
            }
            b'0' => {
                if i0 == 0 {
                    i0 = i as isize;
                }
                i1 = i as isize;
            }
            b'1'..=b'9' => {
                if i0 > 0 {
                    i0 = 0;
                }
            }
            _ => break,
        }
        i += 1;
    }
    if i0 > 0 {
        format!("{}{}", &s[..i0 as usize], &s[(i1 + 1) as usize..])
    } else {
        s.to_string()
    }
}

fn group(value: &str, width: usize, locale: &Locale) -> String {
    let chars: Vec<char> = value.chars().collect();
    let grouping = if locale.grouping.is_empty() {
        return value.to_string();
    } else {
        &locale.grouping
    };
    let mut parts: Vec<String> = Vec::new();
    let mut i = chars.len();
    let mut j = 0usize;
    let mut g = grouping[0];
    let mut length = 0usize;
    while i > 0 && g > 0 {
        if length.saturating_add(g + 1) > width {
            g = width.saturating_sub(length).max(1);
        }
        let start = i.saturating_sub(g);
        parts.push(chars[start..i].iter().collect());
        i = start;
        length = length.saturating_add(g + 1);
        if length > width {
            break;
        }
        j = (j + 1) % grouping.len();
        g = grouping[j];
    }
    parts.reverse();
    parts.join(&locale.thousands)
}

/// Decimal places needed to distinguish multiples of `step`.
pub fn precision_fixed(step: f64) -> usize {
    exponent(step.abs()).map_or(0, |e| (-e).max(0) as usize)
}

/// Decimal places for SI-prefixed values of magnitude `value` spaced `step` apart.
pub fn precision_prefix(step: f64, value: f64) -> usize {
    let (Some(ev), Some(es)) = (exponent(value), exponent(step.abs())) else {
        return 0;
    };
    (ev.div_euclid(3).clamp(-8, 8) * 3 - es).max(0) as usize
}

/// Significant digits needed to distinguish multiples of `step` up to `max`.
pub fn precision_round(step: f64, max: f64) -> usize {
    let step = step.abs();
    let max = max.abs() - step;
    let (Some(em), Some(es)) = (exponent(max), exponent(step)) else {
        return 1;
    };
    (em - es).max(0) as usize + 1
}
