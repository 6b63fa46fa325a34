//! Gemini `generateContent` request schemas
//!
//! These schemas follow the Gemini REST API request body.
//! See: https://ai.google.dev/api/generate-content

use super::decode::{Context, Fields, FromValue, Object};
use super::naming::{FieldMap, NameStyle};
use super::{Schema, deserialize_validated, restyle_nested};
use crate::defaults::GenerationDefaults;
use crate::errors::FieldPath;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

fn one_of(names: &[&str]) -> Cow<'static, str> {
    format!("one of {}", names.join(", ")).into()
}

/// Harm categories a safety setting can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmCategory {
    HateSpeech,
    DangerousContent,
    Harassment,
    SexuallyExplicit,
    CivicIntegrity,
}

impl HarmCategory {
    pub const ALL: [Self; 5] = [
        Self::HateSpeech,
        Self::DangerousContent,
        Self::Harassment,
        Self::SexuallyExplicit,
        Self::CivicIntegrity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            Self::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
            Self::Harassment => "HARM_CATEGORY_HARASSMENT",
            Self::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            Self::CivicIntegrity => "HARM_CATEGORY_CIVIC_INTEGRITY",
        }
    }
}

/// Blocking thresholds for a safety setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmBlockThreshold {
    Unspecified,
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
    Off,
}

impl HarmBlockThreshold {
    pub const ALL: [Self; 6] = [
        Self::Unspecified,
        Self::BlockLowAndAbove,
        Self::BlockMediumAndAbove,
        Self::BlockOnlyHigh,
        Self::BlockNone,
        Self::Off,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
            Self::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
            Self::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            Self::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            Self::BlockNone => "BLOCK_NONE",
            Self::Off => "OFF",
        }
    }
}

macro_rules! literal_enum_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl FromValue for $ty {
            fn expected() -> Cow<'static, str> {
                one_of(&<$ty>::ALL.map(<$ty>::as_str))
            }

            fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
                let known = value
                    .as_str()
                    .and_then(|s| <$ty>::ALL.into_iter().find(|v| v.as_str() == s));
                if known.is_none() {
                    cx.reject(path, Self::expected(), value);
                }
                known
            }
        }
    };
}

literal_enum_impls!(HarmCategory);
literal_enum_impls!(HarmBlockThreshold);

/// Either a list of free-form objects or a single one.
///
/// Used for `tools` and `systemInstruction.parts`, which clients send in
/// both shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectOrList {
    List(Vec<Object>),
    Single(Object),
}

impl Default for ObjectOrList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl ObjectOrList {
    pub fn as_slice(&self) -> &[Object] {
        match self {
            Self::List(items) => items,
            Self::Single(item) => std::slice::from_ref(item),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl FromValue for ObjectOrList {
    fn expected() -> Cow<'static, str> {
        "array of objects or object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self::Single(object)),
            list @ Value::Array(_) => Vec::<Object>::from_value(list, path, cx).map(Self::List),
            other => {
                cx.reject(path, Self::expected(), other);
                None
            }
        }
    }
}

/// A per-category content blocking rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct SafetySetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<HarmCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<HarmBlockThreshold>,

    /// Fields not modeled here, forwarded as-is
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Object,
}

static SAFETY_SETTING_FIELDS: LazyLock<FieldMap> =
    LazyLock::new(|| FieldMap::derive(&["category", "threshold"]));

impl Schema for SafetySetting {
    const NAME: &'static str = "SafetySetting";

    fn field_map() -> &'static FieldMap {
        &SAFETY_SETTING_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for SafetySetting {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let category = fields.optional("category");
        let threshold = fields.optional("threshold");
        let extra = fields.into_extra();
        Some(Self {
            category: category?,
            threshold: threshold?,
            extra,
        })
    }
}

/// Sampling and output controls for a generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sequences that stop generation when produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    /// MIME type of the generated candidate text, e.g. `application/json`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub response_mime_type: Option<String>,

    /// Schema the generated JSON must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Object>,

    /// Number of candidates to return (defaults to 1 when parsed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Whether to return log probabilities of the chosen tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_logprobs: Option<bool>,

    /// Number of top candidate log probabilities to return per step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<i32>,

    /// Thinking budget and related options for thinking models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<Object>,

    /// Fields not modeled here, forwarded as-is
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Object,
}

impl GenerationConfig {
    pub const DEFAULT_CANDIDATE_COUNT: i32 = 1;

    /// The config a request gets when it sends `generationConfig: {}`.
    pub fn with_defaults(defaults: &GenerationDefaults) -> Self {
        Self::builder()
            .candidate_count(Self::DEFAULT_CANDIDATE_COUNT)
            .temperature(defaults.temperature)
            .top_p(defaults.top_p)
            .top_k(defaults.top_k)
            .build()
    }
}

static GENERATION_CONFIG_FIELDS: LazyLock<FieldMap> = LazyLock::new(|| {
    FieldMap::derive(&[
        "stopSequences",
        "responseMimeType",
        "responseSchema",
        "candidateCount",
        "maxOutputTokens",
        "temperature",
        "topP",
        "topK",
        "presencePenalty",
        "frequencyPenalty",
        "responseLogprobs",
        "logprobs",
        "thinkingConfig",
    ])
});

impl Schema for GenerationConfig {
    const NAME: &'static str = "GenerationConfig";

    fn field_map() -> &'static FieldMap {
        &GENERATION_CONFIG_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for GenerationConfig {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let defaults = *fields.defaults();

        let stop_sequences = fields.optional("stopSequences");
        let response_mime_type = fields.optional("responseMimeType");
        let response_schema = fields.optional("responseSchema");
        let candidate_count = fields.defaulted("candidateCount", Self::DEFAULT_CANDIDATE_COUNT);
        let max_output_tokens = fields.optional("maxOutputTokens");
        let temperature = fields.defaulted("temperature", defaults.temperature);
        let top_p = fields.defaulted("topP", defaults.top_p);
        let top_k = fields.defaulted("topK", defaults.top_k);
        let presence_penalty = fields.optional("presencePenalty");
        let frequency_penalty = fields.optional("frequencyPenalty");
        let response_logprobs = fields.optional("responseLogprobs");
        let logprobs = fields.optional("logprobs");
        let thinking_config = fields.optional("thinkingConfig");
        let extra = fields.into_extra();

        Some(Self {
            stop_sequences: stop_sequences?,
            response_mime_type: response_mime_type?,
            response_schema: response_schema?,
            candidate_count: candidate_count?,
            max_output_tokens: max_output_tokens?,
            temperature: temperature?,
            top_p: top_p?,
            top_k: top_k?,
            presence_penalty: presence_penalty?,
            frequency_penalty: frequency_penalty?,
            response_logprobs: response_logprobs?,
            logprobs: logprobs?,
            thinking_config: thinking_config?,
            extra,
        })
    }
}

/// Instructions steering the model for the whole conversation
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct SystemInstruction {
    #[builder(into, default = SystemInstruction::DEFAULT_ROLE.to_owned())]
    pub role: String,

    pub parts: ObjectOrList,

    /// Fields not modeled here, forwarded as-is
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Object,
}

impl SystemInstruction {
    pub const DEFAULT_ROLE: &'static str = "system";
}

static SYSTEM_INSTRUCTION_FIELDS: LazyLock<FieldMap> =
    LazyLock::new(|| FieldMap::derive(&["role", "parts"]));

impl Schema for SystemInstruction {
    const NAME: &'static str = "SystemInstruction";

    fn field_map() -> &'static FieldMap {
        &SYSTEM_INSTRUCTION_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for SystemInstruction {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let role = fields.or_default("role", Self::DEFAULT_ROLE.to_owned());
        let parts = fields.required("parts");
        let extra = fields.into_extra();
        Some(Self {
            role: role?,
            parts: parts?,
            extra,
        })
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct GeminiContent {
    /// Producer of the turn, `user` or `model`
    #[builder(into)]
    pub role: String,

    pub parts: Vec<Object>,

    /// Fields not modeled here, forwarded as-is
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Object,
}

static GEMINI_CONTENT_FIELDS: LazyLock<FieldMap> =
    LazyLock::new(|| FieldMap::derive(&["role", "parts"]));

impl Schema for GeminiContent {
    const NAME: &'static str = "GeminiContent";

    fn field_map() -> &'static FieldMap {
        &GEMINI_CONTENT_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }
}

impl FromValue for GeminiContent {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let role = fields.required("role");
        let parts = fields.required("parts");
        let extra = fields.into_extra();
        Some(Self {
            role: role?,
            parts: parts?,
            extra,
        })
    }
}

/// Request body for `POST /v1beta/models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// The conversation so far, oldest turn first
    #[builder(default)]
    pub contents: Vec<GeminiContent>,

    /// Tool declarations; an empty list when the request sends none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ObjectOrList>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,

    /// Fields not modeled here, forwarded as-is
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Object,
}

static GEMINI_REQUEST_FIELDS: LazyLock<FieldMap> = LazyLock::new(|| {
    FieldMap::derive(&[
        "contents",
        "tools",
        "safetySettings",
        "generationConfig",
        "systemInstruction",
    ])
});

impl Schema for GeminiRequest {
    const NAME: &'static str = "GeminiRequest";

    fn field_map() -> &'static FieldMap {
        &GEMINI_REQUEST_FIELDS
    }

    fn extra(&self) -> &Object {
        &self.extra
    }

    fn restyle(object: &mut Object, style: NameStyle) {
        if style == NameStyle::Canonical {
            return;
        }
        restyle_nested::<GeminiContent>(object.get_mut("contents"), style);
        restyle_nested::<SafetySetting>(object.get_mut("safetySettings"), style);
        restyle_nested::<GenerationConfig>(object.get_mut("generationConfig"), style);
        restyle_nested::<SystemInstruction>(object.get_mut("systemInstruction"), style);
        Self::field_map().restyle_keys(object, style);
    }
}

impl FromValue for GeminiRequest {
    fn expected() -> Cow<'static, str> {
        "object".into()
    }

    fn from_value(value: Value, path: &FieldPath, cx: &mut Context<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path, Self::field_map(), cx)?;
        let contents = fields.or_default("contents", Vec::new());
        let tools = fields.defaulted("tools", ObjectOrList::default());
        let safety_settings = fields.optional("safetySettings");
        let generation_config = fields.optional("generationConfig");
        let system_instruction = fields.optional("systemInstruction");
        let extra = fields.into_extra();
        Some(Self {
            contents: contents?,
            tools: tools?,
            safety_settings: safety_settings?,
            generation_config: generation_config?,
            system_instruction: system_instruction?,
            extra,
        })
    }
}

impl<'de> Deserialize<'de> for SafetySetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

impl<'de> Deserialize<'de> for GenerationConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

impl<'de> Deserialize<'de> for SystemInstruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

impl<'de> Deserialize<'de> for GeminiContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}

impl<'de> Deserialize<'de> for GeminiRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_validated(deserializer)
    }
}
