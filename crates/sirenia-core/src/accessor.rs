//! Typed field extraction.
//!
//! Renderers never look inside caller records; every plotted field goes through an
//! [`Accessor`]. The [`Record`] trait supplies the documented defaults (first/second tuple
//! element, identity) for the record shapes callers commonly use.

use crate::value::Scalar;
use serde_json::Value;
use std::sync::Arc;

/// Maps a record (and its index in the input sequence) to a plotted value.
pub type Accessor<T, V = Scalar> = Arc<dyn Fn(&T, usize) -> V + Send + Sync>;

pub fn accessor<T, V>(f: impl Fn(&T, usize) -> V + Send + Sync + 'static) -> Accessor<T, V> {
    Arc::new(f)
}

pub trait Record {
    /// The record itself as a scalar (identity accessor).
    fn scalar(&self) -> Scalar;

    /// First element of a pair-like record.
    fn first(&self) -> Scalar {
        Scalar::Missing
    }

    /// Second element of a pair-like record.
    fn second(&self) -> Scalar {
        Scalar::Missing
    }

    /// Named field of an object-like record.
    fn field(&self, _name: &str) -> Scalar {
        Scalar::Missing
    }
}

impl Record for Value {
    fn scalar(&self) -> Scalar {
        Scalar::from_json(self)
    }

    fn first(&self) -> Scalar {
        self.as_array()
            .and_then(|a| a.first())
            .map(Scalar::from_json)
            .unwrap_or_default()
    }

    fn second(&self) -> Scalar {
        self.as_array()
            .and_then(|a| a.get(1))
            .map(Scalar::from_json)
            .unwrap_or_default()
    }

    fn field(&self, name: &str) -> Scalar {
        self.get(name).map(Scalar::from_json).unwrap_or_default()
    }
}

impl Record for Scalar {
    fn scalar(&self) -> Scalar {
        self.clone()
    }
}

impl Record for f64 {
    fn scalar(&self) -> Scalar {
        Scalar::Number(*self)
    }
}

impl<A, B> Record for (A, B)
where
    A: Clone + Into<Scalar>,
    B: Clone + Into<Scalar>,
{
    fn scalar(&self) -> Scalar {
        Scalar::Missing
    }

    fn first(&self) -> Scalar {
        self.0.clone().into()
    }

    fn second(&self) -> Scalar {
        self.1.clone().into()
    }
}

pub fn first<T: Record + 'static>() -> Accessor<T> {
    accessor(|d: &T, _| d.first())
}

pub fn second<T: Record + 'static>() -> Accessor<T> {
    accessor(|d: &T, _| d.second())
}

pub fn identity<T: Record + 'static>() -> Accessor<T> {
    accessor(|d: &T, _| d.scalar())
}

pub fn index<T: 'static>() -> Accessor<T> {
    accessor(|_: &T, i| Scalar::Number(i as f64))
}

pub fn constant<T: 'static>(value: impl Into<Scalar>) -> Accessor<T> {
    let value = value.into();
    accessor(move |_: &T, _| value.clone())
}

pub fn field<T: Record + 'static>(name: impl Into<String>) -> Accessor<T> {
    let name = name.into();
    accessor(move |d: &T, _| d.field(&name))
}
