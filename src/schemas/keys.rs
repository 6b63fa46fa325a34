//! Request bodies for the key-management endpoints
//!
//! Operators select a batch of API keys in the admin UI and either reset
//! their failure counters or re-verify them against the upstream API.

use super::decode::{Context, Fields, FromValue, Object};
use super::naming::FieldMap;
use super::{Schema, deserialize_validated};
use crate::errors::FieldPath;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Request body for resetting the failure counts of selected keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetSelectedKeysRequest {
    pub keys: Vec<String>,

    /// Which pool the keys belong to, e.g. `"valid"` or `"invalid"`
    pub key_type: String,

    #[serde(flatten)]
    pub extra: Object,
}

static RESET_SELECTED_KEYS_FIELDS: LazyLock<FieldMap> =
    LazyLock::new(|| FieldMap::derive(&["keys", "key_type"]));

impl Schema for ResetSelectedKeysRequest {
    const NAME: &'static str = "ResetSelectedKeysRequest";

    fn field_map() -> &'static FieldMap {
        &RESET_SELECTED_KEYS_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for ResetSelectedKeysRequest {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let keys = fields.required("keys");
        let key_type = fields.required("key_type");
        let extra = fields.into_extra();
        Some(Self {
            keys: keys?,
            key_type: key_type?,
            extra,
        })
    }
}

impl<'de> Deserialize<'de> for ResetSelectedKeysRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

/// Request body for re-verifying selected keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifySelectedKeysRequest {
    pub keys: Vec<String>,

    #[serde(flatten)]
    pub extra: Object,
}

static VERIFY_SELECTED_KEYS_FIELDS: LazyLock<FieldMap> =
    LazyLock::new(|| FieldMap::derive(&["keys"]));

impl Schema for VerifySelectedKeysRequest {
    const NAME: &'static str = "VerifySelectedKeysRequest";

    fn field_map() -> &'static FieldMap {
        &VERIFY_SELECTED_KEYS_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for VerifySelectedKeysRequest {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let keys = fields.required("keys");
        let extra = fields.into_extra();
        Some(Self { keys: keys?, extra })
    }
}

impl<'de> Deserialize<'de> for VerifySelectedKeysRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}
