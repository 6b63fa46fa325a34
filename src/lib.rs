//! Gemini Schemas - validated request bodies for a Gemini API proxy
//!
//! This library parses incoming JSON into strongly-typed Gemini request records. It accepts
//! both camelCase and snake_case field names, fills in configured defaults for generation
//! parameters, keeps unknown fields so they reach the upstream API, and reports every
//! validation problem with its field path.
//!
//! # Usage
//!
//! ```
//! use gemini_schemas::{GenerationDefaults, Validator};
//! use gemini_schemas::schemas::gemini::GeminiRequest;
//! use serde_json::json;
//!
//! let validator = Validator::new(GenerationDefaults::default());
//! let request: GeminiRequest = validator
//!     .parse(json!({
//!         "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
//!         "generation_config": {"max_output_tokens": 64}
//!     }))
//!     .unwrap();
//!
//! let config = request.generation_config.unwrap();
//! assert_eq!(config.max_output_tokens, Some(64));
//! assert_eq!(config.candidate_count, Some(1));
//! ```

pub mod defaults;
pub mod errors;
pub mod extract;
pub mod schemas;

pub use defaults::GenerationDefaults;
pub use errors::{FieldIssue, FieldPath, SchemaError, ValidationError};
pub use extract::Validated;
pub use schemas::naming::NameStyle;
pub use schemas::{Schema, Validator};
