//! Validating decoder from `serde_json::Value` into typed records
//!
//! Decoding is done by hand rather than through `#[derive(Deserialize)]`
//! so that a single pass can resolve aliases, apply configured defaults,
//! keep unknown fields, and report *every* problem with its full path.
//! Decoders return `None` only after recording at least one issue in the
//! [`Context`].

use super::naming::{FieldMap, KeyForm};
use crate::defaults::GenerationDefaults;
use crate::errors::{FieldIssue, FieldPath, ValidationError};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// A free-form JSON object passed through to the upstream API untouched.
pub type Object = Map<String, Value>;

/// Shared state for one validation run.
#[derive(Debug)]
pub struct Context<'d> {
    defaults: &'d GenerationDefaults,
    issues: Vec<FieldIssue>,
}

impl<'d> Context<'d> {
    pub fn new(defaults: &'d GenerationDefaults) -> Self {
        Self {
            defaults,
            issues: Vec::new(),
        }
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        self.defaults
    }

    /// Records a value that does not satisfy `expected`.
    pub fn reject(&mut self, path: &FieldPath, expected: impl Into<String>, received: Value) {
        self.issues
            .push(FieldIssue::new(path.clone(), expected, received));
    }

    pub fn missing(&mut self, path: FieldPath) {
        self.issues.push(FieldIssue::missing(path));
    }

    /// Turns the outcome of a top-level decode into a result.
    ///
    /// A record is only handed out when nothing at all was rejected.
    pub fn finish<T>(self, model: &'static str, record: Option<T>) -> Result<T, ValidationError> {
        match record {
            Some(record) if self.issues.is_empty() => Ok(record),
            _ => Err(ValidationError {
                model,
                issues: self.issues,
            }),
        }
    }
}

/// Types that can be decoded from a JSON value with path-aware diagnostics.
pub trait FromValue: Sized {
    /// Constraint reported when a value of the wrong shape arrives.
    fn expected() -> Cow<'static, str>;

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self>;
}

impl FromValue for String {
    fn expected() -> Cow<'static, str> {
        "string".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            other => {
                cx.reject(path, Self::expected(), other);
                None
            }
        }
    }
}

/// Spellings accepted for booleans sent as strings.
const TRUE_WORDS: &[&str] = &["true", "t", "yes", "y", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "f", "no", "n", "off", "0"];

impl FromValue for bool {
    fn expected() -> Cow<'static, str> {
        "boolean".into()
    }

    /// Also takes `0`/`1` and the usual true/false words as strings.
    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let boolean = match &value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => {
                let word = s.trim().to_ascii_lowercase();
                if TRUE_WORDS.contains(&word.as_str()) {
                    Some(true)
                } else if FALSE_WORDS.contains(&word.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        };
        if boolean.is_none() {
            cx.reject(path, Self::expected(), value);
        }
        boolean
    }
}

/// Parses a numeric string, rejecting `inf`/`NaN` which have no JSON form.
fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

impl FromValue for f64 {
    fn expected() -> Cow<'static, str> {
        "number".into()
    }

    /// Numeric strings such as `"0.5"` are accepted.
    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let number = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_finite(s),
            _ => None,
        };
        if number.is_none() {
            cx.reject(path, Self::expected(), value);
        }
        number
    }
}

fn whole_i32(f: f64) -> Option<i32> {
    (f.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&f)).then_some(f as i32)
}

impl FromValue for i32 {
    fn expected() -> Cow<'static, str> {
        "32-bit integer".into()
    }

    /// Whole-valued floats such as `2.0` are accepted, as are strings holding
    /// either form; SDKs in languages without a separate integer type send them.
    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let integer = match &value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).ok(),
                None => n.as_f64().and_then(whole_i32),
            },
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => i32::try_from(i).ok(),
                Err(_) => parse_finite(s).and_then(whole_i32),
            },
            _ => None,
        };
        if integer.is_none() {
            cx.reject(path, Self::expected(), value);
        }
        integer
    }
}

impl FromValue for Object {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            other => {
                cx.reject(path, Self::expected(), other);
                None
            }
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn expected() -> Cow<'static, str> {
        format!("array of {}", T::expected()).into()
    }

    /// Every element is checked, so one bad entry does not hide the next.
    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                cx.reject(path, Self::expected(), other);
                return None;
            }
        };
        let decoded: Vec<Option<T>> = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| T::from_value(item, &path.index(i), cx))
            .collect();
        decoded.into_iter().collect()
    }
}

/// The declared fields of one JSON object, keyed by canonical name, plus
/// whatever else the object carried.
pub struct Fields<'a, 'd> {
    path: FieldPath,
    values: BTreeMap<&'static str, Value>,
    extra: Object,
    cx: &'a mut Context<'d>,
}

impl<'a, 'd> Fields<'a, 'd> {
    /// Splits an object into declared fields and extras.
    ///
    /// When a field is supplied under both spellings the alias wins and the
    /// canonical entry is dropped.
    pub fn open(
        value: Value,
        path: &FieldPath,
        names: &FieldMap,
        cx: &'a mut Context<'d>,
    ) -> Option<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                cx.reject(path, "object", other);
                return None;
            }
        };

        let mut values = BTreeMap::new();
        let mut aliased = Vec::new();
        let mut extra = Object::new();
        for (key, value) in object {
            match names.resolve(&key) {
                Some((field, KeyForm::Canonical)) => {
                    values.insert(field.canonical, value);
                }
                Some((field, KeyForm::Alias)) => aliased.push((field.canonical, value)),
                None => {
                    extra.insert(key, value);
                }
            }
        }
        for (canonical, value) in aliased {
            if values.get(canonical).is_some_and(|shadowed| *shadowed != value) {
                debug!(
                    field = %path.field(canonical),
                    "field supplied under both spellings, using the snake_case value"
                );
            }
            values.insert(canonical, value);
        }

        Some(Self {
            path: path.clone(),
            values,
            extra,
            cx,
        })
    }

    fn decode<T: FromValue>(&mut self, name: &'static str, value: Value) -> Option<T> {
        let path = self.path.field(name);
        T::from_value(value, &path, self.cx)
    }

    /// A field that must be present and non-null.
    pub fn required<T: FromValue>(&mut self, name: &'static str) -> Option<T> {
        match self.values.remove(name) {
            None => {
                self.cx.missing(self.path.field(name));
                None
            }
            Some(value) => self.decode(name, value),
        }
    }

    /// A non-null field that takes `default` when absent.
    pub fn or_default<T: FromValue>(&mut self, name: &'static str, default: T) -> Option<T> {
        match self.values.remove(name) {
            None => Some(default),
            Some(value) => self.decode(name, value),
        }
    }

    /// A field that may be absent or `null`.
    ///
    /// The outer `Option` is `None` when the value was rejected.
    pub fn optional<T: FromValue>(&mut self, name: &'static str) -> Option<Option<T>> {
        match self.values.remove(name) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.decode(name, value).map(Some),
        }
    }

    /// Like [`Fields::optional`], but an absent field takes `default`.
    ///
    /// An explicit `null` still leaves the field unset.
    pub fn defaulted<T: FromValue>(
        &mut self,
        name: &'static str,
        default: T,
    ) -> Option<Option<T>> {
        match self.values.remove(name) {
            None => Some(Some(default)),
            Some(Value::Null) => Some(None),
            Some(value) => self.decode(name, value).map(Some),
        }
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        self.cx.defaults()
    }

    /// Hands back the fields that matched no declaration.
    pub fn into_extra(self) -> Object {
        self.extra
    }
}
