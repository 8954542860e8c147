use crate::value::Scalar;
use indexmap::IndexSet;

/// Categorical scale partitioning a range into one equal slot per domain value.
///
/// Inner and outer padding share the same fraction and bands are centered (align 0.5), which is
/// what `scaleBand(domain, range).padding(p)` produces in d3.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<Scalar>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
    reverse: bool,
}

impl BandScale {
    pub fn new(domain: IndexSet<Scalar>, range: (f64, f64)) -> Self {
        Self::with_padding(domain, range, 0.0)
    }

    pub fn with_padding(domain: IndexSet<Scalar>, range: (f64, f64), padding: f64) -> Self {
        let mut scale = Self {
            domain,
            range,
            padding: padding.clamp(0.0, 1.0),
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
            reverse: false,
        };
        scale.rescale();
        scale
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        self.reverse = r1 < r0;
        let (mut start, stop) = if self.reverse { (r1, r0) } else { (r0, r1) };
        let inner = self.padding;
        let outer = self.padding;
        let step = (stop - start) / f64::max(1.0, n - inner + outer * 2.0);
        start += (stop - start - step * (n - inner)) * 0.5;
        self.start = start;
        self.step = step;
        self.bandwidth = step * (1.0 - inner);
    }

    pub fn domain(&self) -> &IndexSet<Scalar> {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Start of the band for `value`; `None` for values outside the domain.
    pub fn scale(&self, value: &Scalar) -> Option<f64> {
        let idx = self.domain.get_index_of(value)?;
        Some(self.position(idx))
    }

    /// Start of the band at domain position `idx`.
    pub fn position(&self, idx: usize) -> f64 {
        let slot = if self.reverse {
            self.domain.len().saturating_sub(1 + idx)
        } else {
            idx
        };
        self.start + self.step * slot as f64
    }

    /// Domain position of the band under pixel `p`, measured in whole steps from the range start
    /// and clamped to the domain. `None` only when the domain is empty.
    pub fn index_at(&self, p: f64) -> Option<usize> {
        let n = self.domain.len();
        if n == 0 {
            return None;
        }
        if !(self.step > 0.0) || !p.is_finite() {
            return Some(0);
        }
        let origin = self.range.0.min(self.range.1);
        let raw = ((p - origin) / self.step).floor();
        let slot = if raw < 0.0 {
            0
        } else if raw >= n as f64 {
            n - 1
        } else {
            raw as usize
        };
        Some(if self.reverse { n - 1 - slot } else { slot })
    }
}
