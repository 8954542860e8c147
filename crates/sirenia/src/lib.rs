#![forbid(unsafe_code)]

//! `sirenia` renders declarative charts (donut, horizontal bar, vertical bar, line) headlessly.
//!
//! The core crate holds accessors, scales, the CHF number formatter and the tooltip state
//! machine; the renderer draws into in-memory SVG surfaces.
//!
//! # Features
//!
//! - `render`: enable SVG rendering (`sirenia::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use sirenia_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use sirenia_render::chart::donut::{DonutOptions, DonutSettings};
    pub use sirenia_render::chart::horizontal_bar::{HorizontalBarOptions, HorizontalBarSettings};
    pub use sirenia_render::chart::line::{LineChart, LineOptions, LineSettings};
    pub use sirenia_render::chart::vertical_bar::{
        VerticalBarChart, VerticalBarOptions, VerticalBarSettings,
    };
    pub use sirenia_render::model::{BarLayout, DonutLayout, LineLayout};
    pub use sirenia_render::text::{FixedAdvanceMeasurer, TextMeasurer};
    pub use sirenia_render::{
        Canvas, ChartKind, ChartSession, Error as RenderError, RenderContext, RenderedChart,
        Surface, render_json,
    };

    use serde_json::{Map, Value};
    use sirenia_core::SiteConfig;
    use sirenia_core::config::deep_merge_value;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] sirenia_core::Error),
        #[error(transparent)]
        Render(#[from] sirenia_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into an SVG `id` token usable as a mount id.
    ///
    /// Overlay elements are addressed as `<mount>Legend`, `<mount>PointerLine` and so on, so two
    /// charts inlined in one document need distinct, well-formed mount ids.
    pub fn sanitize_mount_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 6);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() {
            return "chart".to_string();
        }
        if out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.to_string()
        } else {
            format!("chart-{out}")
        }
    }

    /// Bundles a site configuration and the render context derived from it.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub config: SiteConfig,
        pub context: RenderContext,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Rebuilds the formatter and theme from `config`.
        pub fn with_site_config(config: SiteConfig) -> Result<Self> {
            let context = RenderContext::from_config(&config)?;
            Ok(Self { config, context })
        }

        /// The chart options after merging `charts.<kind>` site defaults under `explicit`.
        pub fn options_for(&self, kind: ChartKind, explicit: &Value) -> Value {
            let mut merged = self
                .config
                .chart_defaults(kind.as_str())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            if !explicit.is_null() {
                deep_merge_value(&mut merged, explicit);
            }
            merged
        }

        /// Draws into an existing canvas, keeping the session for interactive kinds.
        pub fn render(
            &self,
            kind: ChartKind,
            canvas: &mut Canvas,
            mount_id: &str,
            data: &[Value],
            options: &Value,
        ) -> Result<RenderedChart> {
            let options = self.options_for(kind, options);
            Ok(render_json(
                kind,
                canvas,
                mount_id,
                data,
                &options,
                &self.context,
            )?)
        }

        /// One-shot SVG document for `data`.
        pub fn render_svg(
            &self,
            kind: ChartKind,
            mount_id: &str,
            data: &[Value],
            options: &Value,
        ) -> Result<String> {
            let mount_id = sanitize_mount_id(mount_id);
            let mut canvas = Canvas::new();
            canvas.mount(&mount_id);
            self.render(kind, &mut canvas, &mount_id, data, options)?;
            Ok(canvas.to_svg(&mount_id)?)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            kind: ChartKind,
            mount_id: &str,
            data: &[Value],
            options: &Value,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(kind, mount_id, data, options)?;
            raster::svg_to_png(&svg, raster)
        }
    }
}
