//! Entity search inputs and results.

use serde::{Deserialize, Serialize};

use crate::entity::null_as_default;
use crate::outline::EntityOutline;

/// Search options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySearchOptions {
    /// Match tag values case-sensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive_tag_matching: Option<bool>,
    /// Maximum number of entities per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Tag keys to return on each outline.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_filter: Vec<String>,
    /// Cursor from a previous page. Sent as the `results(cursor:)` argument.
    #[serde(skip)]
    pub cursor: Option<String>,
}

impl EntitySearchOptions {
    /// Continue from a previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Cap the page size.
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A tag predicate inside a structured query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySearchQueryBuilderTag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// Structured search query. Unset fields are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySearchQueryBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_integration_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<EntitySearchQueryBuilderTag>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_kind: Option<String>,
}

impl EntitySearchQueryBuilder {
    /// Restrict to a domain, e.g. `APM`.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Restrict to a name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to a type within the domain, e.g. `APPLICATION`.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.entity_kind = Some(kind.into());
        self
    }

    /// Restrict by reporting state.
    pub const fn reporting(mut self, reporting: bool) -> Self {
        self.reporting = Some(reporting);
        self
    }

    /// Require a tag key/value pair.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(EntitySearchQueryBuilderTag {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Returns `true` if no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitySearchSortCriteria {
    AlertSeverity,
    Domain,
    MostRelevant,
    Name,
    Reporting,
    Type,
}

/// Count of matching entities by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySearchTypes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default, rename = "type")]
    pub entity_kind: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySearchResultPage {
    /// Outlines in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<EntityOutline>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Result of an entity search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySearchResult {
    /// Total matches across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
    /// The query the server ran.
    #[serde(default)]
    pub query: Option<String>,
    /// This page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: EntitySearchResultPage,
    /// Counts by type.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<EntitySearchTypes>,
}

impl EntitySearchResult {
    /// The next-page cursor; `None` on the last page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.results
            .next_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty())
    }

    /// Outlines in this page.
    #[must_use]
    pub fn entities(&self) -> &[EntityOutline] {
        &self.results.entities
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_builder_omits_unset_fields() {
        let builder = EntitySearchQueryBuilder::default()
            .domain("APM")
            .kind("APPLICATION")
            .tag("env", "prod");
        assert_eq!(
            serde_json::to_value(&builder).expect("encode"),
            json!({
                "domain": "APM",
                "type": "APPLICATION",
                "tags": [{"key": "env", "value": "prod"}]
            })
        );
        assert!(!builder.is_empty());
        assert!(EntitySearchQueryBuilder::default().is_empty());
    }

    #[test]
    fn cursor_is_not_an_option_field() {
        let options = EntitySearchOptions::default()
            .with_limit(10)
            .with_cursor("abc");
        assert_eq!(
            serde_json::to_value(&options).expect("encode"),
            json!({"limit": 10})
        );
    }

    #[test]
    fn sort_criteria_wire_names() {
        assert_eq!(
            serde_json::to_value(EntitySearchSortCriteria::MostRelevant).expect("encode"),
            json!("MOST_RELEVANT")
        );
        assert_eq!(
            serde_json::to_value(EntitySearchSortCriteria::AlertSeverity).expect("encode"),
            json!("ALERT_SEVERITY")
        );
    }

    #[test]
    fn decodes_page_and_cursor() {
        let result: EntitySearchResult = serde_json::from_value(json!({
            "count": 2,
            "query": "domain = 'APM'",
            "results": {
                "nextCursor": "",
                "entities": [
                    {"__typename": "ApmApplicationEntityOutline", "guid": "A", "name": "a", "language": "go"},
                    {"__typename": "GenericEntityOutline", "guid": "B", "name": "b"}
                ]
            },
            "types": [{"count": 2, "domain": "APM", "entityType": "APM_APPLICATION_ENTITY", "type": "APPLICATION"}]
        }))
        .expect("decode");

        assert_eq!(result.count, 2);
        assert_eq!(result.entities().len(), 2);
        assert_eq!(result.entities()[1].typename(), "GenericEntityOutline");
        assert_eq!(result.next_cursor(), None);
        assert_eq!(result.types[0].entity_kind.as_deref(), Some("APPLICATION"));
    }

    #[test]
    fn null_counts_and_page_decode_as_defaults() {
        let result: EntitySearchResult = serde_json::from_value(json!({
            "count": null,
            "results": null,
            "types": [{"count": null, "domain": "APM"}]
        }))
        .expect("decode");
        assert_eq!(result.count, 0);
        assert!(result.entities().is_empty());
        assert_eq!(result.next_cursor(), None);
        assert_eq!(result.types[0].count, 0);
    }
}
