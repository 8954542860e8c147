use crate::value::Scalar;
use indexmap::IndexSet;

/// Stable categorical → color mapping; the palette cycles when the domain outgrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    domain: IndexSet<Scalar>,
    range: Vec<String>,
}

impl OrdinalScale {
    pub fn new(domain: IndexSet<Scalar>, range: Vec<String>) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> &IndexSet<Scalar> {
        &self.domain
    }

    pub fn range(&self) -> &[String] {
        &self.range
    }

    pub fn get(&self, value: &Scalar) -> Option<&str> {
        if self.range.is_empty() {
            return None;
        }
        let idx = self.domain.get_index_of(value)?;
        Some(self.range[idx % self.range.len()].as_str())
    }

    /// Like [`get`](Self::get), falling back to `currentColor` for unknown values.
    pub fn color(&self, value: &Scalar) -> &str {
        self.get(value).unwrap_or("currentColor")
    }
}
