//! Request and response envelope types.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]` so absent and `null` fields decode alike.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// GraphQL document wrapper. The text is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphqlQuery {
    query: String,
}

impl GraphqlQuery {
    /// Create a new query from a string.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Create a new query from a static string.
    #[must_use]
    pub fn from_static(query: &'static str) -> Self {
        Self::new(query)
    }

    /// Return the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Returns `true` if the document is a mutation.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.query.trim_start().starts_with("mutation")
    }
}

/// Variables bound to a request.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// GraphQL request payload, as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    /// Query text.
    pub query: GraphqlQuery,
    /// Variables.
    pub variables: Variables,
}

impl GraphqlRequest {
    /// Create a new request binding a document and its variables.
    #[must_use]
    pub const fn new(query: GraphqlQuery, variables: Variables) -> Self {
        Self { query, variables }
    }

    /// Whether the transport may safely resend this request.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        !self.query.is_mutation()
    }
}

/// Undecoded GraphQL response envelope.
///
/// `data` is decoded by the executor into the caller's success type and
/// `errors` into a fresh classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphqlResponse {
    /// Response data.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Raw `errors` array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl GraphqlResponse {
    /// Returns `true` if the envelope carries at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        match &self.errors {
            Some(serde_json::Value::Array(errors)) => !errors.is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_wire_shape() {
        let mut variables = Variables::new();
        variables.insert("guid".into(), serde_json::json!("MXxBUE18"));
        let request = GraphqlRequest::new(
            GraphqlQuery::from_static("query($guid: EntityGuid!) { actor { entity(guid: $guid) { guid } } }"),
            variables,
        );

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "query": "query($guid: EntityGuid!) { actor { entity(guid: $guid) { guid } } }",
                "variables": {"guid": "MXxBUE18"}
            })
        );
        assert!(request.is_idempotent());
    }

    #[test]
    fn mutations_are_not_idempotent() {
        let request = GraphqlRequest::new(
            GraphqlQuery::from_static("\n mutation($guid: EntityGuid!) { x }"),
            Variables::new(),
        );
        assert!(!request.is_idempotent());
    }

    #[test]
    fn envelope_error_detection() {
        let empty: GraphqlResponse =
            serde_json::from_value(serde_json::json!({"data": {}, "errors": []})).expect("decode");
        assert!(!empty.has_errors());

        let null: GraphqlResponse =
            serde_json::from_value(serde_json::json!({"data": {}, "errors": null})).expect("decode");
        assert!(!null.has_errors());

        let populated: GraphqlResponse =
            serde_json::from_value(serde_json::json!({"errors": [{"message": "x"}]}))
                .expect("decode");
        assert!(populated.has_errors());
        assert!(populated.data.is_none());
    }
}
