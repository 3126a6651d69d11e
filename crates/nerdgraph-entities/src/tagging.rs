//! Tagging mutation inputs and results.

use serde::{Deserialize, Serialize};

use crate::entity::null_as_default;

/// A tag key with the values to set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingTagInput {
    /// Tag key.
    pub key: String,
    /// Values for the key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

impl TaggingTagInput {
    /// Tag input with the given values.
    pub fn new<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One key/value pair to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingTagValueInput {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl TaggingTagValueInput {
    /// Key/value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Why a single tag could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaggingMutationErrorType {
    ConcurrentTaskException,
    InvalidDomainType,
    InvalidEntityGuid,
    InvalidKey,
    InvalidValue,
    NotFound,
    NotPermitted,
    TooManyCharsQueryFilter,
    TooManyTagKeys,
    TooManyTagValues,
    UpdateWillBeDelayed,
    /// A value this client does not know yet.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A per-tag failure reported inside a successful mutation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingMutationError {
    /// Description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Failure kind.
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub error_type: TaggingMutationErrorType,
}

/// Outcome of a tagging mutation. Partial failures are listed in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingMutationResult {
    /// Per-tag failures, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<TaggingMutationError>,
}

impl TaggingMutationResult {
    /// Returns `true` if every tag was applied.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_failure_is_data() {
        let result: TaggingMutationResult = serde_json::from_value(json!({
            "errors": [{"message": "too many values", "type": "TOO_MANY_TAG_VALUES"}]
        }))
        .expect("decode");
        assert!(!result.is_success());
        assert_eq!(result.errors[0].error_type, TaggingMutationErrorType::TooManyTagValues);
    }

    #[test]
    fn null_errors_means_success() {
        let result: TaggingMutationResult =
            serde_json::from_value(json!({"errors": null})).expect("decode");
        assert!(result.is_success());
    }

    #[test]
    fn unknown_error_type_falls_back() {
        let error: TaggingMutationError =
            serde_json::from_value(json!({"message": "?", "type": "BRAND_NEW"})).expect("decode");
        assert_eq!(error.error_type, TaggingMutationErrorType::Unknown);
    }

    #[test]
    fn tag_input_encodes_key_and_values() {
        let input = TaggingTagInput::new("team", ["core", "infra"]);
        assert_eq!(
            serde_json::to_value(&input).expect("encode"),
            json!({"key": "team", "values": ["core", "infra"]})
        );
    }

    #[test]
    fn null_error_members_decode_as_defaults() {
        let result: TaggingMutationResult = serde_json::from_value(json!({
            "errors": [{"message": null, "type": null}]
        }))
        .expect("decode");
        assert!(!result.is_success());
        assert_eq!(result.errors[0].message, "");
        assert_eq!(result.errors[0].error_type, TaggingMutationErrorType::Unknown);
    }
}
