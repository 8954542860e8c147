#![forbid(unsafe_code)]

//! Headless chart model: typed accessors, derived domains, d3-compatible scales, locale-aware
//! number formatting and the pointer tooltip state machine shared by all sirenia chart kinds.
//!
//! Design goals:
//! - every render input is explicit (no module-level locale or format singletons)
//! - deterministic, testable outputs (the tooltip machine runs without a drawing surface)
//! - malformed data degrades the chart instead of failing it

pub mod accessor;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod geom;
pub mod palette;
pub mod scale;
pub mod theme;
pub mod tooltip;
pub mod value;

pub use accessor::{Accessor, Record};
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use format::{Formatter, Locale, NumberFormat};
pub use theme::Theme;
pub use tooltip::{PointerEvent, SelectionChanged, TooltipState, Transition};
pub use value::Scalar;

#[cfg(test)]
mod tests;
