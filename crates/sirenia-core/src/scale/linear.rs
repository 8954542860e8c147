use super::ticks;
use crate::format::{Formatter, NumberFormat, precision_fixed, precision_prefix, precision_round};
use serde::{Deserialize, Serialize};

/// Quantitative scale flavor selected by a chart's `x_type` / `y_type` option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuousKind {
    #[default]
    Linear,
    Sqrt,
}

impl ContinuousKind {
    fn forward(self, v: f64) -> f64 {
        match self {
            ContinuousKind::Linear => v,
            ContinuousKind::Sqrt => v.signum() * v.abs().sqrt(),
        }
    }

    fn backward(self, v: f64) -> f64 {
        match self {
            ContinuousKind::Linear => v,
            ContinuousKind::Sqrt => v.signum() * v * v,
        }
    }
}

/// Continuous scale mapping a `[d0, d1]` domain onto a `[r0, r1]` pixel range.
///
/// Neither end is clamped; values outside the domain extrapolate. A degenerate domain maps
/// everything to the middle of the range, matching d3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    kind: ContinuousKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::with_kind(ContinuousKind::Linear, domain, range)
    }

    pub fn with_kind(kind: ContinuousKind, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            kind,
            domain,
            range,
        }
    }

    pub fn kind(&self) -> ContinuousKind {
        self.kind
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, v: f64) -> f64 {
        let d0 = self.kind.forward(self.domain.0);
        let d1 = self.kind.forward(self.domain.1);
        let t = normalize(d0, d1, self.kind.forward(v));
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let t = normalize(self.range.0, self.range.1, px);
        let d0 = self.kind.forward(self.domain.0);
        let d1 = self.kind.forward(self.domain.1);
        self.kind.backward(d0 + t * (d1 - d0))
    }

    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks::ticks(self.domain.0, self.domain.1, count)
    }

    /// Number format suited to `ticks(count)`; `specifier` overrides the default `,f` while
    /// inheriting a precision derived from the tick step when it leaves precision unset.
    pub fn tick_format(&self, count: f64, specifier: Option<&str>) -> NumberFormat {
        let (start, stop) = self.domain;
        let step = ticks::tick_step(start, stop, count);
        let mut spec = specifier
            .and_then(|s| NumberFormat::parse(s).ok())
            .unwrap_or_else(NumberFormat::default_tick);
        if spec.precision.is_none() && step.is_finite() {
            let max = start.abs().max(stop.abs());
            spec.precision = match spec.kind {
                's' => {
                    spec.prefix_value = Some(max);
                    Some(precision_prefix(step, max))
                }
                ' ' | 'e' | 'g' | 'r' => {
                    let p = precision_round(step, max);
                    Some(if spec.kind == 'e' { p.saturating_sub(1) } else { p })
                }
                'f' | '%' => {
                    let p = precision_fixed(step);
                    Some(if spec.kind == '%' { p.saturating_sub(2) } else { p })
                }
                _ => None,
            };
        }
        spec
    }

    /// Formats one value with [`tick_format`](Self::tick_format).
    pub fn format_tick(
        &self,
        formatter: &Formatter,
        count: f64,
        specifier: Option<&str>,
        v: f64,
    ) -> String {
        formatter.format_with(&self.tick_format(count, specifier), v)
    }
}

fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span.is_nan() {
        f64::NAN
    } else if span == 0.0 {
        0.5
    } else {
        (x - a) / span
    }
}
