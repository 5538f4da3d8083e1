//! Model records as returned by the server's model listing, and the filters
//! that pick usable language models out of them.
//!
//! The listing schema has changed between server releases: older servers send
//! `identifier` and `model_type`, newer OpenAI-style ones send `id` and tuck
//! the type into `custom_metadata`. [`ModelRecord`] carries every field either
//! shape may use, and the reader methods reconcile them in a fixed order.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Type label that marks a language model.
pub const LLM_TYPE: &str = "llm";

/// Substring that marks safety/guard models, which cannot serve chat turns.
const GUARD_MARKER: &str = "guard";

/// Lowercase substrings that mark embedding models.
const EMBEDDING_MARKERS: [&str; 3] = ["embed", "embedding", "minilm"];

/// A single entry of the model listing.
///
/// Every field is optional. String fields holding a non-string JSON value are
/// read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,

    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model_kind: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub model_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl ModelRecord {
    /// Record with only an identifier set.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            identifier: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the `model_type` field.
    pub fn model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    /// The model identifier: the first non-empty of `identifier`, `model_id`,
    /// `id` and `name`.
    pub fn model_identifier(&self) -> Option<&str> {
        [&self.identifier, &self.model_id, &self.id, &self.name]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.is_empty())
    }

    /// The type label.
    ///
    /// Direct fields are checked first (`model_type`, `type`, `model_kind`,
    /// `kind`, `model_family`); then `custom_metadata` and `metadata`, where
    /// `model_type` is used when truthy and `type` otherwise.
    pub fn type_label(&self) -> Option<&str> {
        let direct = [
            &self.model_type,
            &self.type_,
            &self.model_kind,
            &self.kind,
            &self.model_family,
        ]
        .into_iter()
        .find_map(|field| field.as_deref());
        if direct.is_some() {
            return direct;
        }

        for container in [&self.custom_metadata, &self.metadata] {
            let Some(Value::Object(map)) = container else {
                continue;
            };
            let value = match map.get("model_type") {
                Some(v) if is_truthy(v) => Some(v),
                _ => map.get("type"),
            };
            if let Some(Value::String(label)) = value {
                return Some(label.as_str());
            }
        }

        None
    }

    /// Whether the record describes a language model.
    ///
    /// A record without any type label counts as a language model: servers
    /// that omit type metadata would otherwise list nothing usable.
    pub fn is_language_model(&self) -> bool {
        self.type_label().is_none_or(|label| label == LLM_TYPE)
    }
}

/// Identifiers of every listed language model that is not a guard model,
/// in listing order.
pub fn language_model_ids(records: &[ModelRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| record.is_language_model())
        .filter_map(|record| record.model_identifier())
        .filter(|id| !id.contains(GUARD_MARKER))
        .map(str::to_string)
        .collect()
}

/// Like [`language_model_ids`], additionally dropping embedding models
/// (matched case-insensitively).
pub fn non_embedding_model_ids(records: &[ModelRecord]) -> Vec<String> {
    language_model_ids(records)
        .into_iter()
        .filter(|id| !is_embedding_id(id))
        .collect()
}

fn is_embedding_id(id: &str) -> bool {
    let lowered = id.to_lowercase();
    EMBEDDING_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
