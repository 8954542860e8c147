//! Scales map domains onto pixel ranges.
//!
//! All scales here are immutable once constructed from `(domain, range)`; charts build them once
//! per render and share them with the tooltip locators.

mod band;
mod linear;
mod ordinal;
pub mod ticks;
mod time;

pub use band::BandScale;
pub use linear::{ContinuousKind, LinearScale};
pub use ordinal::OrdinalScale;
pub use time::TimeScale;
