//! Property tests for name-style invariance and serialize/parse round trips
//!
//! Generated records always set the fields that carry parse-time defaults, so a
//! round trip must give back exactly the record that was serialized.

use gemini_schemas::schemas::decode::Object;
use gemini_schemas::schemas::gemini::{
    GeminiContent, GeminiRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    ObjectOrList, SafetySetting, SystemInstruction,
};
use gemini_schemas::{NameStyle, Schema, Validator};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use proptest::sample::select;
use serde_json::Value;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

fn object() -> impl Strategy<Value = Object> {
    btree_map("[a-zA-Z]{1,8}", scalar(), 0..4).prop_map(|m| m.into_iter().collect())
}

/// Unknown fields; the `x_` prefix keeps them clear of every declared name.
fn extras() -> impl Strategy<Value = Object> {
    btree_map("x_[a-z]{1,8}", scalar(), 0..3).prop_map(|m| m.into_iter().collect())
}

fn object_or_list() -> impl Strategy<Value = ObjectOrList> {
    prop_oneof![
        object().prop_map(ObjectOrList::Single),
        vec(object(), 0..3).prop_map(ObjectOrList::List),
    ]
}

fn generation_config() -> impl Strategy<Value = GenerationConfig> {
    let sampling = (any::<i32>(), -2.0f64..2.0, 0.0f64..1.0, 1..100i32);
    let optional = (
        option::of(vec("[a-z.!]{1,6}", 0..3)),
        option::of(select(vec!["text/plain", "application/json"])),
        option::of(object()),
        option::of(any::<i32>()),
        option::of(-2.0f64..2.0),
        option::of(-2.0f64..2.0),
        option::of(any::<bool>()),
        option::of(0..20i32),
        option::of(object()),
    );
    (sampling, optional, extras()).prop_map(
        |(
            (candidate_count, temperature, top_p, top_k),
            (
                stop_sequences,
                response_mime_type,
                response_schema,
                max_output_tokens,
                presence_penalty,
                frequency_penalty,
                response_logprobs,
                logprobs,
                thinking_config,
            ),
            extra,
        )| GenerationConfig {
            stop_sequences,
            response_mime_type: response_mime_type.map(str::to_owned),
            response_schema,
            candidate_count: Some(candidate_count),
            max_output_tokens,
            temperature: Some(temperature),
            top_p: Some(top_p),
            top_k: Some(top_k),
            presence_penalty,
            frequency_penalty,
            response_logprobs,
            logprobs,
            thinking_config,
            extra,
        },
    )
}

fn safety_setting() -> impl Strategy<Value = SafetySetting> {
    (
        option::of(select(HarmCategory::ALL.to_vec())),
        option::of(select(HarmBlockThreshold::ALL.to_vec())),
        extras(),
    )
        .prop_map(|(category, threshold, extra)| SafetySetting {
            category,
            threshold,
            extra,
        })
}

fn content() -> impl Strategy<Value = GeminiContent> {
    (select(vec!["user", "model"]), vec(object(), 0..3), extras()).prop_map(
        |(role, parts, extra)| GeminiContent {
            role: role.to_owned(),
            parts,
            extra,
        },
    )
}

fn system_instruction() -> impl Strategy<Value = SystemInstruction> {
    ("[a-z]{1,8}", object_or_list(), extras()).prop_map(|(role, parts, extra)| {
        SystemInstruction { role, parts, extra }
    })
}

fn request() -> impl Strategy<Value = GeminiRequest> {
    (
        vec(content(), 0..3),
        object_or_list(),
        option::of(vec(safety_setting(), 0..3)),
        option::of(generation_config()),
        option::of(system_instruction()),
        extras(),
    )
        .prop_map(
            |(contents, tools, safety_settings, generation_config, system_instruction, extra)| {
                GeminiRequest {
                    contents,
                    tools: Some(tools),
                    safety_settings,
                    generation_config,
                    system_instruction,
                    extra,
                }
            },
        )
}

/// Renames the declared keys of `object` to their alias where `picks` says so.
fn mix_spellings<T: Schema>(mut value: Value, picks: &[bool]) -> Value {
    if let Value::Object(object) = &mut value {
        for (name, &use_alias) in T::field_map().iter().zip(picks) {
            if use_alias {
                if let Some(v) = object.remove(name.canonical) {
                    object.insert(name.alias.clone(), v);
                }
            }
        }
    }
    value
}

proptest! {
    #[test]
    fn test_generation_config_round_trips_in_both_styles(config in generation_config()) {
        let validator = Validator::default();
        for style in [NameStyle::Canonical, NameStyle::Alias] {
            let value = config.to_value(style).unwrap();
            let reparsed: GenerationConfig = validator.parse(value).unwrap();
            prop_assert_eq!(&reparsed, &config);
        }
    }

    #[test]
    fn test_generation_config_spelling_does_not_matter(
        config in generation_config(),
        picks in vec(any::<bool>(), 13),
    ) {
        let validator = Validator::default();
        let canonical = config.to_value(NameStyle::Canonical).unwrap();
        let mixed = mix_spellings::<GenerationConfig>(canonical.clone(), &picks);

        let from_canonical: GenerationConfig = validator.parse(canonical).unwrap();
        let from_mixed: GenerationConfig = validator.parse(mixed).unwrap();
        prop_assert_eq!(from_canonical, from_mixed);
    }

    #[test]
    fn test_request_round_trips_in_both_styles(request in request()) {
        let validator = Validator::default();
        for style in [NameStyle::Canonical, NameStyle::Alias] {
            let value = request.to_value(style).unwrap();
            let reparsed: GeminiRequest = validator.parse(value).unwrap();
            prop_assert_eq!(&reparsed, &request);
        }
    }

    #[test]
    fn test_request_canonical_and_alias_output_parse_equal(request in request()) {
        let validator = Validator::default();
        let canonical: GeminiRequest = validator
            .parse(request.to_value(NameStyle::Canonical).unwrap())
            .unwrap();
        let alias: GeminiRequest = validator
            .parse(request.to_value(NameStyle::Alias).unwrap())
            .unwrap();
        prop_assert_eq!(canonical, alias);
    }
}
