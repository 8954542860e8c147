use crate::error::{Error, Result};

/// A parsed number format specifier:
/// `[[fill]align][sign][symbol][0][width][,][.precision][~][type]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormat {
    pub fill: char,
    pub align: char,
    pub sign: char,
    pub symbol: Option<char>,
    pub zero: bool,
    pub width: Option<usize>,
    pub comma: bool,
    pub precision: Option<usize>,
    pub trim: bool,
    /// Conversion type; `' '` when the specifier has none.
    pub kind: char,
    /// For `s`: fix the SI prefix to this magnitude instead of choosing it per value.
    pub prefix_value: Option<f64>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: '>',
            sign: '-',
            symbol: None,
            zero: false,
            width: None,
            comma: false,
            precision: None,
            trim: false,
            kind: ' ',
            prefix_value: None,
        }
    }
}

const TYPES: &str = "%bdefgorsxX";

impl NumberFormat {
    /// `,f`: the default for axis ticks.
    pub fn default_tick() -> Self {
        Self {
            comma: true,
            kind: 'f',
            ..Self::default()
        }
    }

    pub fn parse(specifier: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormatSpecifier {
            specifier: specifier.to_string(),
        };
        let chars: Vec<char> = specifier.chars().collect();
        let mut out = Self::default();
        let mut i = 0usize;
        let is_align = |c: char| matches!(c, '<' | '>' | '=' | '^');

        if chars.len() >= 2 && is_align(chars[1]) {
            out.fill = chars[0];
            out.align = chars[1];
            i = 2;
        } else if chars.first().copied().is_some_and(is_align) {
            out.align = chars[0];
            i = 1;
        }
        if let Some(&c) = chars.get(i) {
            if matches!(c, '+' | '-' | '(' | ' ') {
                out.sign = c;
                i += 1;
            }
        }
        if let Some(&c) = chars.get(i) {
            if matches!(c, '$' | '#') {
                out.symbol = Some(c);
                i += 1;
            }
        }
        if chars.get(i) == Some(&'0') {
            out.zero = true;
            i += 1;
        }
        let digits_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i > digits_start {
            let w: String = chars[digits_start..i].iter().collect();
            out.width = Some(w.parse().map_err(|_| invalid())?);
        }
        if chars.get(i) == Some(&',') {
            out.comma = true;
            i += 1;
        }
        if chars.get(i) == Some(&'.') {
            i += 1;
            let p_start = i;
            while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                i += 1;
            }
            if i == p_start {
                return Err(invalid());
            }
            let p: String = chars[p_start..i].iter().collect();
            out.precision = Some(p.parse().map_err(|_| invalid())?);
        }
        if chars.get(i) == Some(&'~') {
            out.trim = true;
            i += 1;
        }
        if let Some(&c) = chars.get(i) {
            if c == 'n' {
                out.comma = true;
                out.kind = 'g';
            } else if TYPES.contains(c) {
                out.kind = c;
            } else {
                return Err(invalid());
            }
            i += 1;
        }
        if i != chars.len() {
            return Err(invalid());
        }

        if out.zero || (out.fill == '0' && out.align == '=') {
            out.zero = true;
            out.fill = '0';
            out.align = '=';
        }
        Ok(out)
    }
}
