use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// UI palette consumed for default chart styling (bar fill, guide lines, tracks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub dark: bool,
    pub background: String,
    pub surface: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub error: String,
    pub info: String,
    pub success: String,
    pub warning: String,
    /// Background tracks, grid and tick lines.
    pub muted: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark: false,
            background: "#FFFFFF".to_string(),
            surface: "#FFFFFF".to_string(),
            primary: "#E5007D".to_string(),
            secondary: "#A81681".to_string(),
            accent: "#1E50AD".to_string(),
            error: "#B00020".to_string(),
            info: "#2196F3".to_string(),
            success: "#4CAF50".to_string(),
            warning: "#FB8C00".to_string(),
            muted: "#C4C4C4".to_string(),
        }
    }
}

impl Theme {
    /// Dark variant: dark surfaces, brand colors lightened to keep contrast.
    pub fn dark() -> Self {
        let light = Self::default();
        Self {
            dark: true,
            background: "#121212".to_string(),
            surface: "#1E1E1E".to_string(),
            primary: lighten(&light.primary, 10.0).unwrap_or(light.primary.clone()),
            secondary: lighten(&light.secondary, 10.0).unwrap_or(light.secondary.clone()),
            accent: lighten(&light.accent, 20.0).unwrap_or(light.accent.clone()),
            muted: "#5C5C5C".to_string(),
            ..light
        }
    }

    /// Foreground for text drawn directly on `background`.
    pub fn text_color(&self) -> &'static str {
        if self.dark { "#FFFFFF" } else { "currentColor" }
    }

    /// Rejects palettes containing colors that are not `#rgb` / `#rrggbb`.
    pub fn validate(&self) -> Result<()> {
        for c in [
            &self.background,
            &self.surface,
            &self.primary,
            &self.secondary,
            &self.accent,
            &self.error,
            &self.info,
            &self.success,
            &self.warning,
            &self.muted,
        ] {
            if parse_hex_rgb(c).is_none() {
                return Err(Error::InvalidColor { color: c.clone() });
            }
        }
        Ok(())
    }
}

/// Parses `#rgb` / `#rrggbb` into 8-bit channels.
pub fn parse_hex_rgb(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.trim();
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct Hsl {
    h_deg: f64,
    s: f64,
    l: f64,
}

fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Hsl {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl {
            h_deg: 0.0,
            s: 0.0,
            l,
        };
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let mut h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h /= 6.0;
    Hsl {
        h_deg: h * 360.0,
        s,
        l,
    }
}

fn hsl_to_rgb(hsl: Hsl) -> (f64, f64, f64) {
    let h = (hsl.h_deg.rem_euclid(360.0)) / 360.0;
    let (s, l) = (hsl.s, hsl.l);
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// Raises HSL lightness by `pct` percentage points.
pub fn lighten(hex: &str, pct: f64) -> Option<String> {
    let (r, g, b) = parse_hex_rgb(hex)?;
    let mut hsl = rgb_to_hsl(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    hsl.l = (hsl.l + pct / 100.0).clamp(0.0, 1.0);
    let (r, g, b) = hsl_to_rgb(hsl);
    let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(format!("#{:02x}{:02x}{:02x}", c(r), c(g), c(b)))
}
