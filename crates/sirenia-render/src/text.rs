//! Label extents for overlay decorations whose geometry follows the text, such as the caret
//! under the vertical bar tooltip.

/// Caption size used by the tooltip overlays, in px.
pub const TOOLTIP_FONT_SIZE: f64 = 14.0;

/// Headless replacement for `getBBox()`: how wide a possibly multi-line label renders.
pub trait TextMeasurer {
    /// Width of the widest `\n`-separated line.
    fn line_width(&self, text: &str, font_size: f64) -> f64;
}

/// Every character advances by `advance` em, so tooltip widths are identical on every platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub advance: f64,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn line_width(&self, text: &str, font_size: f64) -> f64 {
        let widest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        widest as f64 * font_size.max(1.0) * self.advance
    }
}
