//! Gemini API request schemas
//!
//! These schemas validate request bodies before they are forwarded upstream.
//! They are deliberately lenient where the upstream API is: both camelCase
//! and snake_case field names are accepted, and fields we do not model are
//! carried through untouched so new upstream features keep working.

pub mod decode;
pub mod gemini;
pub mod keys;
pub mod naming;

use crate::defaults::GenerationDefaults;
use crate::errors::{FieldPath, SchemaError, ValidationError};
use decode::{Context, FromValue, Object};
use naming::{FieldMap, NameStyle};
use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A request record with a declared set of (aliased) fields.
pub trait Schema: FromValue + Serialize {
    /// Record name used in error messages.
    const NAME: &'static str;

    fn field_map() -> &'static FieldMap;

    /// Fields the client sent that this record does not declare.
    fn extra(&self) -> &Object;

    /// Renames the declared keys of this record's serialized form.
    ///
    /// Records holding other records override this to recurse into them.
    fn restyle(object: &mut Object, style: NameStyle) {
        Self::field_map().restyle_keys(object, style);
    }

    /// Serializes the record with field names in `style`.
    fn to_value(&self, style: NameStyle) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(object) = &mut value {
            Self::restyle(object, style);
        }
        Ok(value)
    }
}

/// Applies `T::restyle` to a nested record or to each record in an array.
pub(crate) fn restyle_nested<T: Schema>(value: Option<&mut Value>, style: NameStyle) {
    match value {
        Some(Value::Object(object)) => T::restyle(object, style),
        Some(Value::Array(items)) => {
            for item in items {
                if let Value::Object(object) = item {
                    T::restyle(object, style);
                }
            }
        }
        _ => {}
    }
}

/// Entry point for parsing request bodies with a given set of defaults.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    defaults: GenerationDefaults,
}

impl Validator {
    pub fn new(defaults: GenerationDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        &self.defaults
    }

    /// Validates an already-parsed JSON value into `T`.
    ///
    /// Either every field checks out and the full record is returned, or the
    /// error lists all the problems found.
    pub fn parse<T: Schema>(&self, value: Value) -> Result<T, ValidationError> {
        let mut cx = Context::new(&self.defaults);
        let record = T::from_value(value, &FieldPath::root(), &mut cx);
        let record = cx.finish(T::NAME, record)?;
        debug!(model = T::NAME, "Request body validated");
        Ok(record)
    }

    pub fn from_slice<T: Schema>(&self, bytes: &[u8]) -> Result<T, SchemaError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(self.parse(value)?)
    }

    pub fn from_str<T: Schema>(&self, text: &str) -> Result<T, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(self.parse(value)?)
    }
}

/// `Deserialize` for records goes through the validator with built-in defaults.
pub(crate) fn deserialize_validated<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Schema,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Validator::default().parse(value).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini::{GeminiContent, GeminiRequest, GenerationConfig, SafetySetting, SystemInstruction};
    use keys::{ResetSelectedKeysRequest, VerifySelectedKeysRequest};
    use rstest::rstest;
    use serde_json::json;

    /// Parses `input` as `T` and returns its extras plus both serialized forms.
    type ExtrasCheck = fn(Value) -> (Object, Value, Value);

    fn extras_of<T: Schema>(input: Value) -> (Object, Value, Value) {
        let record: T = Validator::default().parse(input).unwrap();
        (
            record.extra().clone(),
            record.to_value(NameStyle::Canonical).unwrap(),
            record.to_value(NameStyle::Alias).unwrap(),
        )
    }

    #[rstest]
    #[case::request(extras_of::<GeminiRequest> as ExtrasCheck, json!({"contents": []}))]
    #[case::generation_config(extras_of::<GenerationConfig> as ExtrasCheck, json!({}))]
    #[case::safety_setting(extras_of::<SafetySetting> as ExtrasCheck, json!({"threshold": "OFF"}))]
    #[case::system_instruction(
        extras_of::<SystemInstruction> as ExtrasCheck,
        json!({"parts": {"text": "Be brief."}})
    )]
    #[case::content(
        extras_of::<GeminiContent> as ExtrasCheck,
        json!({"role": "user", "parts": [{"text": "hi"}]})
    )]
    #[case::reset_keys(
        extras_of::<ResetSelectedKeysRequest> as ExtrasCheck,
        json!({"keys": ["a"], "key_type": "paid"})
    )]
    #[case::verify_keys(extras_of::<VerifySelectedKeysRequest> as ExtrasCheck, json!({"keys": ["a"]}))]
    fn test_every_record_keeps_unknown_fields(#[case] check: ExtrasCheck, #[case] mut input: Value) {
        let unknown = json!({"x": 1, "nested": [true, null]});
        input
            .as_object_mut()
            .unwrap()
            .insert("futureField".to_owned(), unknown.clone());

        let (extra, canonical, alias) = check(input);
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("futureField"), Some(&unknown));
        assert_eq!(canonical.get("futureField"), Some(&unknown));
        assert_eq!(alias.get("futureField"), Some(&unknown));
    }
}
