use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_OBJECT_NAME: &str = "module";
pub const DEFAULT_PROPERTY_NAME: &str = "hot";

/// The probe to decide: `<object_name>.<property_name>`, its computed form, or
/// `"<property_name>" in <object_name>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternSpec {
  pub object_name: String,
  pub property_name: String,
}

impl Default for PatternSpec {
  fn default() -> Self {
    PatternSpec {
      object_name: DEFAULT_OBJECT_NAME.to_string(),
      property_name: DEFAULT_PROPERTY_NAME.to_string(),
    }
  }
}

impl PatternSpec {
  pub fn new(object_name: impl Into<String>, property_name: impl Into<String>) -> Self {
    PatternSpec {
      object_name: object_name.into(),
      property_name: property_name.into(),
    }
  }

  /// Reads `{ objectName?, propertyName? }` from a plugin-style options value.
  /// Never fails: anything that isn't a non-empty string falls back to the
  /// default for that key, and unknown keys are ignored.
  pub fn from_options(options: &Value) -> Self {
    let read = |key: &str, default: &str| {
      options
        .get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
    };
    PatternSpec {
      object_name: read("objectName", DEFAULT_OBJECT_NAME),
      property_name: read("propertyName", DEFAULT_PROPERTY_NAME),
    }
  }

  /// Overrides individual names, ignoring empty ones.
  pub fn merge(mut self, object_name: Option<&str>, property_name: Option<&str>) -> Self {
    if let Some(name) = object_name.filter(|n| !n.is_empty()) {
      self.object_name = name.to_string();
    };
    if let Some(name) = property_name.filter(|n| !n.is_empty()) {
      self.property_name = name.to_string();
    };
    self
  }
}
