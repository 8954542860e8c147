#![forbid(unsafe_code)]

use crate::render::HeadlessError;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("invalid raster scale {0} (expected a positive finite number)")]
    InvalidScale(f32),
    #[error("invalid background color {0:?}")]
    InvalidBackground(String),
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// `white`, `black`, `transparent` or `#rgb[a]`/`#rrggbb[aa]`; unset leaves the pixmap transparent.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let scale = options.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RasterError::InvalidScale(scale));
    }
    let background = match options.background.as_deref() {
        None => None,
        Some(bg) => Some(
            parse_tiny_skia_color(bg).ok_or_else(|| RasterError::InvalidBackground(bg.to_string()))?,
        ),
    };

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Chart text classes carry no font rules of their own.
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // The root width/height already fold in the viewBox (including negative mins for the donut).
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let b = hex.as_bytes();
    let (r, g, bl, a) = match b.len() {
        3 => (hex1(b[0])?, hex1(b[1])?, hex1(b[2])?, 255),
        4 => (hex1(b[0])?, hex1(b[1])?, hex1(b[2])?, hex1(b[3])?),
        6 => (hex2(&b[0..2])?, hex2(&b[2..4])?, hex2(&b[4..6])?, 255),
        8 => (
            hex2(&b[0..2])?,
            hex2(&b[2..4])?,
            hex2(&b[4..6])?,
            hex2(&b[6..8])?,
        ),
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, bl, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0,0,10,10"><rect width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn svg_to_png_produces_png_signature() {
        let bytes = svg_to_png(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn scale_multiplies_the_pixel_size() {
        let options = RasterOptions {
            scale: 2.5,
            background: Some("#fff".to_string()),
        };
        let pixmap = svg_to_pixmap(SQUARE, &options).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (25, 25));
    }

    #[test]
    fn rejects_bad_options() {
        let bad_scale = RasterOptions {
            scale: 0.0,
            background: None,
        };
        assert!(matches!(
            svg_to_png(SQUARE, &bad_scale),
            Err(RasterError::InvalidScale(_))
        ));
        let bad_bg = RasterOptions {
            scale: 1.0,
            background: Some("chartreuse-ish".to_string()),
        };
        assert!(matches!(
            svg_to_png(SQUARE, &bad_bg),
            Err(RasterError::InvalidBackground(_))
        ));
        assert!(matches!(
            svg_to_png("<not svg", &RasterOptions::default()),
            Err(RasterError::SvgParse)
        ));
    }

    #[test]
    fn parses_hex_colors() {
        let c = parse_tiny_skia_color("#E5007D").unwrap();
        assert_eq!(c.to_color_u8().red(), 0xE5);
        assert!(parse_tiny_skia_color("#12345").is_none());
    }
}
