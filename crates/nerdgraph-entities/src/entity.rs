//! The polymorphic entity model.
//!
//! NerdGraph returns every entity as one flat JSON object: the fields common
//! to all entities, a `__typename` discriminator, and the variant's own fields
//! spliced in beside them by inline fragments. [`Entity`] keeps the shared
//! fields in [`EntityIdentity`] and the variant fields in [`EntityKind`],
//! selected through [`EntityKind::decode`]. Discriminators this client does
//! not know decode to [`EntityKind::Unrecognized`].

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    AccountOutline, AlertSeverity, EntityAlertViolation, EntityGoldenContextScopedGoldenMetrics,
    EntityGoldenContextScopedGoldenTags, EntityGuid, EntityRelationship,
    EntityRelationshipRelatedEntitiesResult, EntityTag, EntityTagWithMetadata, EpochMillis,
    ServiceLevelDefinition,
};

/// Discriminator field name.
pub(crate) const TYPENAME: &str = "__typename";

pub(crate) use nerdgraph::null_as_default;

/// Merge the fields of `extension` into `target`, then stamp the discriminator.
pub(crate) fn merge_object(target: &mut Value, extension: Option<Value>, typename: &str) {
    if let Value::Object(map) = target {
        if let Some(Value::Object(fields)) = extension {
            map.extend(fields);
        }
        map.insert(TYPENAME.to_string(), Value::String(typename.to_string()));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared identity
// ─────────────────────────────────────────────────────────────────────────────

/// Fields every entity carries, whatever its variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIdentity {
    /// Entity GUID.
    pub guid: EntityGuid,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Owning account.
    #[serde(default)]
    pub account: Option<AccountOutline>,
    /// Owning account ID.
    #[serde(default)]
    pub account_id: Option<i64>,
    /// Entity type, e.g. `HOST_ENTITY`.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Domain, e.g. `APM` or `INFRA`.
    #[serde(default)]
    pub domain: Option<String>,
    /// Type within the domain, e.g. `APPLICATION` or `HOST`.
    #[serde(default, rename = "type")]
    pub entity_kind: Option<String>,
    /// Link to the entity in the UI.
    #[serde(default)]
    pub permalink: Option<String>,
    /// When the entity was last indexed.
    #[serde(default)]
    pub indexed_at: Option<EpochMillis>,
    /// Whether the entity is currently reporting data.
    #[serde(default)]
    pub reporting: Option<bool>,
    /// Current alert severity.
    #[serde(default)]
    pub alert_severity: Option<AlertSeverity>,
    /// Relationship edges, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Vec<EntityRelationship>,
    /// Cursor-paginated related entities.
    #[serde(default)]
    pub related_entities: Option<EntityRelationshipRelatedEntitiesResult>,
    /// Tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<EntityTag>,
    /// Tags with mutability metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags_with_metadata: Vec<EntityTagWithMetadata>,
    /// Recent alert violations.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_alert_violations: Vec<EntityAlertViolation>,
    /// Golden metrics.
    #[serde(default)]
    pub golden_metrics: Option<EntityGoldenContextScopedGoldenMetrics>,
    /// Golden tags.
    #[serde(default)]
    pub golden_tags: Option<EntityGoldenContextScopedGoldenTags>,
    /// Service level indicators.
    #[serde(default)]
    pub service_level: Option<ServiceLevelDefinition>,
}

impl EntityIdentity {
    /// Values for a tag key, if the entity carries it.
    #[must_use]
    pub fn tag_values(&self, key: &str) -> Option<&[String]> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.values.as_slice())
    }

    /// Violations that are still open.
    pub fn open_violations(&self) -> impl Iterator<Item = &EntityAlertViolation> {
        self.recent_alert_violations
            .iter()
            .filter(|violation| violation.is_open())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variant payloads
// ─────────────────────────────────────────────────────────────────────────────

/// APM application summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmApplicationSummaryData {
    pub apdex_score: Option<f64>,
    pub error_rate: Option<f64>,
    pub host_count: Option<i64>,
    pub instance_count: Option<i64>,
    pub non_web_response_time_average: Option<f64>,
    pub non_web_throughput: Option<f64>,
    pub response_time_average: Option<f64>,
    pub throughput: Option<f64>,
    pub web_response_time_average: Option<f64>,
    pub web_throughput: Option<f64>,
}

/// Browser metrics seen from an APM application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmBrowserApplicationSummaryData {
    pub ajax_request_throughput: Option<f64>,
    pub ajax_response_time_average: Option<f64>,
    pub js_error_rate: Option<f64>,
    pub page_load_throughput: Option<f64>,
    pub page_load_time_average: Option<f64>,
}

/// A recorded deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmApplicationDeployment {
    pub changelog: Option<String>,
    pub description: Option<String>,
    pub permalink: Option<String>,
    pub revision: Option<String>,
    pub timestamp: Option<EpochMillis>,
    pub user: Option<String>,
}

/// Metric name normalization rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricNormalizationRule {
    pub id: Option<i64>,
    pub action: Option<String>,
    pub application_guid: Option<EntityGuid>,
    pub application_name: Option<String>,
    pub created_at: Option<EpochMillis>,
    pub enabled: Option<bool>,
    pub eval_order: Option<i64>,
    pub match_expression: Option<String>,
    pub notes: Option<String>,
    pub replacement: Option<String>,
    pub terminate_chain: Option<bool>,
}

/// Range of agent versions running for an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationAgentVersions {
    pub max_version: Option<String>,
    pub min_version: Option<String>,
}

/// APM application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmApplicationSettings {
    pub apdex_target: Option<f64>,
    pub server_side_config: Option<bool>,
}

/// Fields of `ApmApplicationEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmApplicationFields {
    pub application_id: Option<i64>,
    pub language: Option<String>,
    pub apm_summary: Option<ApmApplicationSummaryData>,
    pub apm_browser_summary: Option<ApmBrowserApplicationSummaryData>,
    #[serde(deserialize_with = "null_as_default")]
    pub deployments: Vec<ApmApplicationDeployment>,
    #[serde(deserialize_with = "null_as_default")]
    pub metric_normalization_rules: Vec<MetricNormalizationRule>,
    pub running_agent_versions: Option<ApplicationAgentVersions>,
    pub settings: Option<ApmApplicationSettings>,
}

/// Fields of `ApmDatabaseInstanceEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmDatabaseInstanceFields {
    pub host: Option<String>,
    pub port_or_path: Option<String>,
    pub vendor: Option<String>,
}

/// External service summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmExternalServiceSummaryData {
    pub response_time_average: Option<f64>,
    pub throughput: Option<f64>,
}

/// Fields of `ApmExternalServiceEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmExternalServiceFields {
    pub host: Option<String>,
    pub external_summary: Option<ApmExternalServiceSummaryData>,
}

/// Browser application summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserApplicationSummaryData {
    pub ajax_request_throughput: Option<f64>,
    pub ajax_response_time_average: Option<f64>,
    pub js_error_rate: Option<f64>,
    pub page_load_throughput: Option<f64>,
    pub page_load_time_average: Option<f64>,
    pub page_load_time_median: Option<f64>,
    pub spa_response_time_average: Option<f64>,
    pub spa_response_time_median: Option<f64>,
}

/// Browser application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserApplicationSettings {
    pub apdex_target: Option<f64>,
}

/// Fields of `BrowserApplicationEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserApplicationFields {
    pub agent_install_type: Option<String>,
    pub application_id: Option<i64>,
    pub serving_apm_application_id: Option<i64>,
    pub browser_summary: Option<BrowserApplicationSummaryData>,
    #[serde(deserialize_with = "null_as_default")]
    pub metric_normalization_rules: Vec<MetricNormalizationRule>,
    pub running_agent_versions: Option<ApplicationAgentVersions>,
    pub settings: Option<BrowserApplicationSettings>,
}

/// Dashboard owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardOwnerInfo {
    pub email: Option<String>,
    pub user_id: Option<i64>,
}

/// Dashboard page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardPage {
    pub guid: Option<EntityGuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields of `DashboardEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardFields {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub dashboard_parent_guid: Option<EntityGuid>,
    pub description: Option<String>,
    pub owner: Option<DashboardOwnerInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub pages: Vec<DashboardPage>,
    pub permissions: Option<String>,
}

/// Fields of `GenericInfrastructureEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenericInfrastructureFields {
    pub integration_type_code: Option<String>,
}

/// Fields of `InfrastructureAwsLambdaFunctionEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureAwsLambdaFunctionFields {
    pub integration_type_code: Option<String>,
    pub runtime: Option<String>,
}

/// Host utilization summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureHostSummaryData {
    pub cpu_utilization_percent: Option<f64>,
    pub disk_used_percent: Option<f64>,
    pub memory_used_percent: Option<f64>,
    pub network_receive_rate: Option<f64>,
    pub network_transmit_rate: Option<f64>,
    pub services_count: Option<i64>,
}

/// Fields of `InfrastructureHostEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureHostFields {
    pub host_summary: Option<InfrastructureHostSummaryData>,
}

/// Mobile application summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileAppSummaryData {
    pub app_launch_count: Option<i64>,
    pub crash_count: Option<i64>,
    pub crash_rate: Option<f64>,
    pub http_error_rate: Option<f64>,
    pub http_request_count: Option<i64>,
    pub http_request_rate: Option<f64>,
    pub http_response_time_average: Option<f64>,
    pub mobile_session_count: Option<i64>,
    pub network_failure_rate: Option<f64>,
    pub users_affected_count: Option<i64>,
}

/// Fields of `MobileApplicationEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileApplicationFields {
    pub application_id: Option<i64>,
    pub mobile_summary: Option<MobileAppSummaryData>,
    #[serde(deserialize_with = "null_as_default")]
    pub metric_normalization_rules: Vec<MetricNormalizationRule>,
}

/// Secure credential usage summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecureCredentialSummaryData {
    pub failing_monitor_count: Option<i64>,
    pub monitor_count: Option<i64>,
}

/// Fields of `SecureCredentialEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecureCredentialFields {
    pub description: Option<String>,
    pub secure_credential_id: Option<String>,
    pub secure_credential_summary: Option<SecureCredentialSummaryData>,
    pub updated_at: Option<EpochMillis>,
}

/// Synthetic monitor summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyntheticMonitorSummaryData {
    pub locations_failing: Option<i64>,
    pub locations_running: Option<i64>,
    pub status: Option<String>,
    pub success_rate: Option<f64>,
}

/// Fields of `SyntheticMonitorEntity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyntheticMonitorFields {
    pub monitor_id: Option<String>,
    pub monitor_type: Option<String>,
    pub monitored_url: Option<String>,
    /// Check period in minutes.
    pub period: Option<i64>,
    pub monitor_summary: Option<SyntheticMonitorSummaryData>,
}

/// User that created a workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserReference {
    pub email: Option<String>,
    pub gravatar: Option<String>,
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Workload health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkloadStatus {
    pub description: Option<String>,
    pub status_source: Option<String>,
    pub status_value: Option<String>,
    pub summary: Option<String>,
}

/// Fields of `WorkloadEntity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkloadFields {
    pub created_at: Option<EpochMillis>,
    pub updated_at: Option<EpochMillis>,
    pub created_by_user: Option<UserReference>,
    pub workload_status: Option<WorkloadStatus>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Variant dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Variant-specific part of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    ApmApplication(ApmApplicationFields),
    ApmDatabaseInstance(ApmDatabaseInstanceFields),
    ApmExternalService(ApmExternalServiceFields),
    BrowserApplication(BrowserApplicationFields),
    Dashboard(DashboardFields),
    External,
    Generic,
    GenericInfrastructure(GenericInfrastructureFields),
    InfrastructureAwsLambdaFunction(InfrastructureAwsLambdaFunctionFields),
    InfrastructureHost(InfrastructureHostFields),
    MobileApplication(MobileApplicationFields),
    SecureCredential(SecureCredentialFields),
    SyntheticMonitor(SyntheticMonitorFields),
    ThirdPartyService,
    Unavailable,
    Workload(WorkloadFields),
    /// A discriminator this client does not know; only shared fields are kept.
    Unrecognized {
        /// The raw discriminator, empty if the payload had none.
        typename: String,
    },
}

impl EntityKind {
    /// Select and decode the variant named by `typename` from `value`.
    ///
    /// Unknown or missing discriminators yield [`EntityKind::Unrecognized`].
    pub fn decode(typename: Option<&str>, value: &Value) -> Result<Self, serde_json::Error> {
        let kind = match typename.unwrap_or_default() {
            "ApmApplicationEntity" => Self::ApmApplication(Deserialize::deserialize(value)?),
            "ApmDatabaseInstanceEntity" => {
                Self::ApmDatabaseInstance(Deserialize::deserialize(value)?)
            }
            "ApmExternalServiceEntity" => {
                Self::ApmExternalService(Deserialize::deserialize(value)?)
            }
            "BrowserApplicationEntity" => {
                Self::BrowserApplication(Deserialize::deserialize(value)?)
            }
            "DashboardEntity" => Self::Dashboard(Deserialize::deserialize(value)?),
            "ExternalEntity" => Self::External,
            "GenericEntity" => Self::Generic,
            "GenericInfrastructureEntity" => {
                Self::GenericInfrastructure(Deserialize::deserialize(value)?)
            }
            "InfrastructureAwsLambdaFunctionEntity" => {
                Self::InfrastructureAwsLambdaFunction(Deserialize::deserialize(value)?)
            }
            "InfrastructureHostEntity" => {
                Self::InfrastructureHost(Deserialize::deserialize(value)?)
            }
            "MobileApplicationEntity" => Self::MobileApplication(Deserialize::deserialize(value)?),
            "SecureCredentialEntity" => Self::SecureCredential(Deserialize::deserialize(value)?),
            "SyntheticMonitorEntity" => Self::SyntheticMonitor(Deserialize::deserialize(value)?),
            "ThirdPartyServiceEntity" => Self::ThirdPartyService,
            "UnavailableEntity" => Self::Unavailable,
            "WorkloadEntity" => Self::Workload(Deserialize::deserialize(value)?),
            other => Self::Unrecognized {
                typename: other.to_string(),
            },
        };
        Ok(kind)
    }

    /// The `__typename` this variant decodes from.
    #[must_use]
    pub fn typename(&self) -> &str {
        match self {
            Self::ApmApplication(_) => "ApmApplicationEntity",
            Self::ApmDatabaseInstance(_) => "ApmDatabaseInstanceEntity",
            Self::ApmExternalService(_) => "ApmExternalServiceEntity",
            Self::BrowserApplication(_) => "BrowserApplicationEntity",
            Self::Dashboard(_) => "DashboardEntity",
            Self::External => "ExternalEntity",
            Self::Generic => "GenericEntity",
            Self::GenericInfrastructure(_) => "GenericInfrastructureEntity",
            Self::InfrastructureAwsLambdaFunction(_) => "InfrastructureAwsLambdaFunctionEntity",
            Self::InfrastructureHost(_) => "InfrastructureHostEntity",
            Self::MobileApplication(_) => "MobileApplicationEntity",
            Self::SecureCredential(_) => "SecureCredentialEntity",
            Self::SyntheticMonitor(_) => "SyntheticMonitorEntity",
            Self::ThirdPartyService => "ThirdPartyServiceEntity",
            Self::Unavailable => "UnavailableEntity",
            Self::Workload(_) => "WorkloadEntity",
            Self::Unrecognized { typename } => typename,
        }
    }

    /// Returns `true` for the fallback variant.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }

    fn fields_value(&self) -> Result<Option<Value>, serde_json::Error> {
        let value = match self {
            Self::ApmApplication(fields) => serde_json::to_value(fields)?,
            Self::ApmDatabaseInstance(fields) => serde_json::to_value(fields)?,
            Self::ApmExternalService(fields) => serde_json::to_value(fields)?,
            Self::BrowserApplication(fields) => serde_json::to_value(fields)?,
            Self::Dashboard(fields) => serde_json::to_value(fields)?,
            Self::GenericInfrastructure(fields) => serde_json::to_value(fields)?,
            Self::InfrastructureAwsLambdaFunction(fields) => serde_json::to_value(fields)?,
            Self::InfrastructureHost(fields) => serde_json::to_value(fields)?,
            Self::MobileApplication(fields) => serde_json::to_value(fields)?,
            Self::SecureCredential(fields) => serde_json::to_value(fields)?,
            Self::SyntheticMonitor(fields) => serde_json::to_value(fields)?,
            Self::Workload(fields) => serde_json::to_value(fields)?,
            Self::External
            | Self::Generic
            | Self::ThirdPartyService
            | Self::Unavailable
            | Self::Unrecognized { .. } => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// An entity of any variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Shared fields.
    pub identity: EntityIdentity,
    /// Variant fields.
    pub kind: EntityKind,
}

impl Entity {
    /// Decode an entity from its flat JSON shape.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let typename = value.get(TYPENAME).and_then(Value::as_str);
        let identity = EntityIdentity::deserialize(value)?;
        let kind = EntityKind::decode(typename, value)?;
        Ok(Self { identity, kind })
    }

    /// Encode the entity back into its flat JSON shape.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(&self.identity)?;
        merge_object(&mut value, self.kind.fields_value()?, self.kind.typename());
        Ok(value)
    }

    /// Entity GUID.
    #[must_use]
    pub const fn guid(&self) -> &EntityGuid {
        &self.identity.guid
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// The discriminator of this entity.
    #[must_use]
    pub fn typename(&self) -> &str {
        self.kind.typename()
    }

    /// Variant fields.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// APM application fields, if this is an APM application.
    #[must_use]
    pub const fn as_apm_application(&self) -> Option<&ApmApplicationFields> {
        match &self.kind {
            EntityKind::ApmApplication(fields) => Some(fields),
            _ => None,
        }
    }

    /// Browser application fields, if this is a browser application.
    #[must_use]
    pub const fn as_browser_application(&self) -> Option<&BrowserApplicationFields> {
        match &self.kind {
            EntityKind::BrowserApplication(fields) => Some(fields),
            _ => None,
        }
    }

    /// Dashboard fields, if this is a dashboard.
    #[must_use]
    pub const fn as_dashboard(&self) -> Option<&DashboardFields> {
        match &self.kind {
            EntityKind::Dashboard(fields) => Some(fields),
            _ => None,
        }
    }

    /// Host fields, if this is an infrastructure host.
    #[must_use]
    pub const fn as_infrastructure_host(&self) -> Option<&InfrastructureHostFields> {
        match &self.kind {
            EntityKind::InfrastructureHost(fields) => Some(fields),
            _ => None,
        }
    }

    /// Mobile fields, if this is a mobile application.
    #[must_use]
    pub const fn as_mobile_application(&self) -> Option<&MobileApplicationFields> {
        match &self.kind {
            EntityKind::MobileApplication(fields) => Some(fields),
            _ => None,
        }
    }

    /// Synthetic monitor fields, if this is a monitor.
    #[must_use]
    pub const fn as_synthetic_monitor(&self) -> Option<&SyntheticMonitorFields> {
        match &self.kind {
            EntityKind::SyntheticMonitor(fields) => Some(fields),
            _ => None,
        }
    }

    /// Workload fields, if this is a workload.
    #[must_use]
    pub const fn as_workload(&self) -> Option<&WorkloadFields> {
        match &self.kind {
            EntityKind::Workload(fields) => Some(fields),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}
