#![forbid(unsafe_code)]

//! Headless renderers for the sirenia chart kinds.
//!
//! Every chart draws into a [`Surface`] (an in-memory SVG element tree) looked up by mount id in
//! a [`Canvas`]. Rendering clears the surface first, so redrawing with the same inputs produces
//! the same document. Interactive charts return a session that feeds pointer events through the
//! tooltip state machine and redraws the overlay.

pub mod axis;
pub mod chart;
pub mod model;
pub mod path;
pub mod surface;
pub mod svg;
pub mod text;

pub use chart::{
    ChartKind, ChartSession, Overlay, RenderedChart, donut, horizontal_bar, line, render_json,
    vertical_bar,
};
pub use surface::{Canvas, Element, NodeId, Surface};

use crate::text::{FixedAdvanceMeasurer, TextMeasurer};
use sirenia_core::{Formatter, SiteConfig, Theme};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no surface mounted with id {id:?}")]
    MountNotFound { id: String },
    #[error("unknown chart kind {kind:?} (expected donut, hbar, vbar or line)")]
    UnknownChartKind { kind: String },
    #[error(transparent)]
    Core(#[from] sirenia_core::Error),
    #[error("chart options JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Collaborators shared by every render call: number formatting, theme colors and text metrics.
#[derive(Clone)]
pub struct RenderContext {
    pub formatter: Formatter,
    pub theme: Theme,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            formatter: Formatter::default(),
            theme: Theme::default(),
            text_measurer: Arc::new(FixedAdvanceMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("formatter", &self.formatter)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    /// Theme and locale from a site config; text metrics stay deterministic.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            formatter: Formatter::new(config.locale()?),
            theme: config.theme()?,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests;
