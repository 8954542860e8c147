use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An accessor result: the only view renderers get of a caller record.
#[derive(Debug, Clone, Default)]
pub enum Scalar {
    #[default]
    Missing,
    Number(f64),
    /// Plots as `1` / `0`, labels as `true` / `false`.
    Bool(bool),
    Text(String),
    Time(DateTime<Utc>),
}

impl Scalar {
    /// Numeric coercion with JS `+value` semantics: numeric strings count, `NaN` does not.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            Scalar::Missing => return None,
            Scalar::Number(v) => *v,
            Scalar::Bool(b) => f64::from(u8::from(*b)),
            Scalar::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    0.0
                } else {
                    match t {
                        "Infinity" | "+Infinity" => f64::INFINITY,
                        "-Infinity" => f64::NEG_INFINITY,
                        _ if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
                            return None;
                        }
                        _ => t.parse::<f64>().ok()?,
                    }
                }
            }
            Scalar::Time(t) => t.timestamp_millis() as f64,
        };
        if v.is_nan() { None } else { Some(v) }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Temporal coercion: timestamps in milliseconds, RFC 3339 strings, `YYYY-MM-DD` and bare
    /// years are all read as UTC instants.
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Scalar::Missing => None,
            Scalar::Time(t) => Some(*t),
            Scalar::Number(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                Utc.timestamp_millis_opt(ms.round() as i64).single()
            }
            Scalar::Bool(b) => Utc.timestamp_millis_opt(i64::from(*b)).single(),
            Scalar::Text(s) => parse_time(s.trim()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Missing)
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Missing,
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => n.as_f64().map(Scalar::Number).unwrap_or_default(),
            Value::String(s) => Scalar::Text(s.clone()),
            other => Scalar::Text(other.to_string()),
        }
    }
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if s.len() == 4 {
        let year = s.parse::<i32>().ok()?;
        return Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Formats a finite number the way JS `Number#toString()` does (`3` rather than `3.0`).
pub fn js_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v };
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Missing => Ok(()),
            Scalar::Number(v) => f.write_str(&js_number(*v)),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Time(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Missing, Scalar::Missing) => true,
            (Scalar::Number(a), Scalar::Number(b)) => number_key(*a) == number_key(*b),
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Time(a), Scalar::Time(b)) => a.timestamp_millis() == b.timestamp_millis(),
            _ => false,
        }
    }
}

impl Eq for Scalar {}

fn number_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Missing => {}
            Scalar::Number(v) => number_key(*v).hash(state),
            Scalar::Bool(b) => b.hash(state),
            Scalar::Text(s) => s.hash(state),
            Scalar::Time(t) => t.timestamp_millis().hash(state),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Missing => serializer.serialize_none(),
            Scalar::Number(v) => serializer.serialize_f64(*v),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Time(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|v| Scalar::from_json(&v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Number(v as f64)
    }
}

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Scalar::Number(v as f64)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::Time(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
