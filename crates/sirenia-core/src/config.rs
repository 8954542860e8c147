use crate::error::{Error, Result};
use crate::format::Locale;
use crate::theme::Theme;
use serde_json::{Map, Value};

/// Site-wide JSON configuration: theme overrides, locale and per-chart default options.
///
/// ```json
/// { "theme": { "dark": true, "primary": "#E5007D" },
///   "locale": { "thousands": "'" },
///   "charts": { "vbar": { "height": 250 } } }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig(Value);

impl Default for SiteConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl SiteConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // `from_value` accepts any JSON; a non-object root is replaced so paths can be created.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    /// Applies a `key.path=value` assignment; the value is read as JSON and falls back to a
    /// plain string (`theme.primary=#ff0000`).
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((path, raw)) = assignment.split_once('=') else {
            return Err(Error::InvalidConfig {
                path: assignment.to_string(),
                message: "expected `key=value`".to_string(),
            });
        };
        let path = path.trim();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(Error::InvalidConfig {
                path: path.to_string(),
                message: "empty path segment".to_string(),
            });
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.set_value(path, value);
        Ok(())
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// The theme: `theme.dark` picks the base palette, remaining `theme.*` keys override it.
    pub fn theme(&self) -> Result<Theme> {
        let Some(overrides) = self.get("theme") else {
            return Ok(Theme::default());
        };
        let base = if overrides.get("dark").and_then(Value::as_bool) == Some(true) {
            Theme::dark()
        } else {
            Theme::default()
        };
        let mut merged = serde_json::to_value(base)?;
        deep_merge_value(&mut merged, overrides);
        let theme: Theme = serde_json::from_value(merged).map_err(|e| Error::InvalidConfig {
            path: "theme".to_string(),
            message: e.to_string(),
        })?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn locale(&self) -> Result<Locale> {
        match self.get("locale") {
            None => Ok(Locale::default()),
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| Error::InvalidConfig {
                path: "locale".to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Default options for one chart kind (`charts.<kind>`), merged under explicit options.
    pub fn chart_defaults(&self, kind: &str) -> Option<&Value> {
        self.0.get("charts")?.get(kind)
    }
}

pub fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
