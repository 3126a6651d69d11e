//! Types shared by every entity variant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::null_as_default;

// ─────────────────────────────────────────────────────────────────────────────
// Scalars
// ─────────────────────────────────────────────────────────────────────────────

/// Globally unique entity identifier. Opaque; never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityGuid(String);

impl EntityGuid {
    /// Wrap a GUID string.
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self(guid.into())
    }

    /// The GUID text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityGuid {
    fn from(guid: &str) -> Self {
        Self::new(guid)
    }
}

impl From<String> for EntityGuid {
    fn from(guid: String) -> Self {
        Self(guid)
    }
}

/// Timestamp in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    /// Convert to a UTC datetime, if in range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

/// Alert severity of an entity or violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    /// At least one critical violation is open.
    Critical,
    /// At least one warning violation is open.
    Warning,
    /// Alerting is configured and nothing is open.
    NotAlerting,
    /// No alert conditions target the entity.
    NotConfigured,
    /// A value this client does not know yet.
    #[default]
    #[serde(other)]
    Unknown,
}

// ─────────────────────────────────────────────────────────────────────────────
// Account
// ─────────────────────────────────────────────────────────────────────────────

/// Account that owns an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutline {
    /// Account ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// Account name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Event types the account reports.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reporting_event_types: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

/// A tag key and its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTag {
    /// Tag key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// One or more values.
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

/// A tag value annotated with whether users may change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTagValueWithMetadata {
    /// Tag value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    /// Whether the value can be mutated through the tagging API.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mutable: bool,
}

/// A tag key with metadata-annotated values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTagWithMetadata {
    /// Tag key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    /// Annotated values.
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<EntityTagValueWithMetadata>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Alert violations
// ─────────────────────────────────────────────────────────────────────────────

/// A recent alert violation on an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAlertViolation {
    /// Violation ID.
    #[serde(default)]
    pub violation_id: Option<i64>,
    /// Severity at the time of the violation.
    #[serde(default)]
    pub alert_severity: Option<AlertSeverity>,
    /// Priority level.
    #[serde(default)]
    pub level: Option<String>,
    /// Violation label.
    #[serde(default)]
    pub label: Option<String>,
    /// When the violation opened.
    #[serde(default)]
    pub opened_at: Option<EpochMillis>,
    /// When the violation closed; absent while open.
    #[serde(default)]
    pub closed_at: Option<EpochMillis>,
    /// Link to the reporting agent.
    #[serde(default)]
    pub agent_url: Option<String>,
    /// Link to the violation.
    #[serde(default)]
    pub violation_url: Option<String>,
}

impl EntityAlertViolation {
    /// Returns `true` while the violation has no close time.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relationships
// ─────────────────────────────────────────────────────────────────────────────

/// One end of a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationshipNode {
    /// Account of the related entity.
    #[serde(default)]
    pub account_id: Option<i64>,
    /// Entity type of the related entity.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// GUID of the related entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub guid: EntityGuid,
}

/// A directed relationship between two entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRelationship {
    /// Source entity.
    #[serde(default)]
    pub source: Option<EntityRelationshipNode>,
    /// Target entity.
    #[serde(default)]
    pub target: Option<EntityRelationshipNode>,
    /// Relation type, e.g. `CALLS` or `HOSTS`.
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
}

/// An edge in the related-entities collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationshipEdge {
    /// Edge kind (`EntityRelationshipDetectedEdge`, `EntityRelationshipUserDefinedEdge`).
    #[serde(default, rename = "__typename")]
    pub typename: Option<String>,
    /// When the relationship was recorded.
    #[serde(default)]
    pub created_at: Option<EpochMillis>,
    /// Source entity.
    #[serde(default)]
    pub source: Option<EntityRelationshipNode>,
    /// Target entity.
    #[serde(default)]
    pub target: Option<EntityRelationshipNode>,
    /// Relation type.
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
}

/// One page of related entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelationshipRelatedEntitiesResult {
    /// Cursor for the next page; absent or empty on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Edges in this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<EntityRelationshipEdge>,
}

impl EntityRelationshipRelatedEntitiesResult {
    /// The next-page cursor, if there is a next page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Golden signals and service levels
// ─────────────────────────────────────────────────────────────────────────────

/// Scope a golden metric or tag set applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGoldenContext {
    /// Account scope.
    #[serde(default)]
    pub account: Option<i64>,
    /// Entity scope.
    #[serde(default)]
    pub guid: Option<EntityGuid>,
}

/// A golden metric definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGoldenMetric {
    /// Metric name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// NRQL query producing the metric.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// Golden metrics for an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGoldenContextScopedGoldenMetrics {
    /// Scope.
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: EntityGoldenContext,
    /// Metrics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<EntityGoldenMetric>,
}

/// A golden tag key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGoldenTag {
    /// Tag key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
}

/// Golden tags for an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGoldenContextScopedGoldenTags {
    /// Scope.
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: EntityGoldenContext,
    /// Tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<EntityGoldenTag>,
}

/// A service level indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLevelIndicator {
    /// Indicator ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Indicator name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Entity the indicator measures.
    #[serde(default)]
    pub entity_guid: Option<EntityGuid>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<EpochMillis>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<EpochMillis>,
}

/// Service level definition attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevelDefinition {
    /// Indicators.
    #[serde(default, deserialize_with = "null_as_default")]
    pub indicators: Vec<ServiceLevelIndicator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_alert_severity_falls_back() {
        let severity: AlertSeverity =
            serde_json::from_value(serde_json::json!("SOMETHING_NEW")).expect("severity");
        assert_eq!(severity, AlertSeverity::Unknown);

        let severity: AlertSeverity =
            serde_json::from_value(serde_json::json!("NOT_ALERTING")).expect("severity");
        assert_eq!(severity, AlertSeverity::NotAlerting);
    }

    #[test]
    fn epoch_millis_converts_to_datetime() {
        let at = EpochMillis(1_600_000_000_000).to_datetime().expect("in range");
        assert_eq!(at.to_rfc3339(), "2020-09-13T12:26:40+00:00");
    }

    #[test]
    fn empty_related_cursor_means_last_page() {
        let page = EntityRelationshipRelatedEntitiesResult {
            next_cursor: Some(String::new()),
            results: Vec::new(),
        };
        assert_eq!(page.next_cursor(), None);
    }
}
