//! Field-name aliasing
//!
//! Gemini documents its request fields in camelCase, while many clients
//! (and the OpenAI-flavoured SDKs) send snake_case. Every record declares its
//! canonical names once; the snake_case alias of each is derived from it and
//! both spellings are accepted on input.

use clap::ValueEnum;
use serde_json::{Map, Value};

/// Which spelling of field names to use when writing a record back out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum NameStyle {
    /// The declared (camelCase) names, as the upstream API expects.
    #[default]
    Canonical,
    /// The derived snake_case aliases.
    Alias,
}

/// How an input key matched a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyForm {
    Canonical,
    Alias,
}

/// Converts a camelCase (or PascalCase) name to snake_case.
///
/// An underscore goes in front of every uppercase letter that follows a
/// lowercase letter or digit, and in front of the last capital of an acronym
/// run when a lowercase letter comes next (`HTTPServer` -> `http_server`).
/// Names that are already snake_case come back unchanged.
pub fn to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                snake.push('_');
            }
        }
        snake.push(c.to_ascii_lowercase());
    }
    snake
}

/// A declared field and its derived alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub canonical: &'static str,
    pub alias: String,
}

impl FieldName {
    pub fn has_distinct_alias(&self) -> bool {
        self.canonical != self.alias
    }

    pub fn spelled(&self, style: NameStyle) -> &str {
        match style {
            NameStyle::Canonical => self.canonical,
            NameStyle::Alias => &self.alias,
        }
    }
}

/// The declared fields of one record, looked up by either spelling.
#[derive(Debug, Clone)]
pub struct FieldMap {
    fields: Vec<FieldName>,
}

impl FieldMap {
    /// Builds the map for a record from its canonical field names.
    pub fn derive(canonical: &[&'static str]) -> Self {
        let fields = canonical
            .iter()
            .map(|&name| FieldName {
                canonical: name,
                alias: to_snake(name),
            })
            .collect();
        Self { fields }
    }

    /// Finds the declared field an input key refers to, if any.
    pub fn resolve(&self, key: &str) -> Option<(&FieldName, KeyForm)> {
        self.fields.iter().find_map(|field| {
            if field.canonical == key {
                Some((field, KeyForm::Canonical))
            } else if field.alias == key {
                Some((field, KeyForm::Alias))
            } else {
                None
            }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.iter()
    }

    /// Rewrites the declared keys of a serialized record into `style`.
    ///
    /// Keys that are not declared fields (the record's extras) are left alone.
    pub fn restyle_keys(&self, object: &mut Map<String, Value>, style: NameStyle) {
        if style == NameStyle::Canonical {
            return;
        }
        for field in self.fields.iter().filter(|f| f.has_distinct_alias()) {
            if let Some(value) = object.remove(field.canonical) {
                object.insert(field.spelled(style).to_owned(), value);
            }
        }
    }
}
