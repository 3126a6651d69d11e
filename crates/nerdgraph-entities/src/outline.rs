//! Reduced entity projections returned by entity search.

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{TYPENAME, merge_object, null_as_default};
use crate::types::{AccountOutline, AlertSeverity, EntityGuid, EntityTag, EpochMillis};

/// Shared fields of a search result record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineIdentity {
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
    /// Entity type.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Type within the domain.
    #[serde(default, rename = "type")]
    pub entity_kind: Option<String>,
    /// Link to the entity in the UI.
    #[serde(default)]
    pub permalink: Option<String>,
    /// When the entity was last indexed.
    #[serde(default)]
    pub indexed_at: Option<EpochMillis>,
    /// Whether the entity is reporting.
    #[serde(default)]
    pub reporting: Option<bool>,
    /// Current alert severity.
    #[serde(default)]
    pub alert_severity: Option<AlertSeverity>,
    /// Tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<EntityTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmApplicationOutlineFields {
    pub application_id: Option<i64>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmDatabaseInstanceOutlineFields {
    pub host: Option<String>,
    pub port_or_path: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApmExternalServiceOutlineFields {
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserApplicationOutlineFields {
    pub agent_install_type: Option<String>,
    pub application_id: Option<i64>,
    pub serving_apm_application_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardOutlineFields {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub dashboard_parent_guid: Option<EntityGuid>,
    pub permissions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenericInfrastructureOutlineFields {
    pub integration_type_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfrastructureAwsLambdaFunctionOutlineFields {
    pub integration_type_code: Option<String>,
    pub runtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileApplicationOutlineFields {
    pub application_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecureCredentialOutlineFields {
    pub description: Option<String>,
    pub secure_credential_id: Option<String>,
    pub updated_at: Option<EpochMillis>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyntheticMonitorOutlineFields {
    pub monitor_id: Option<String>,
    pub monitor_type: Option<String>,
    pub monitored_url: Option<String>,
    pub period: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkloadOutlineFields {
    pub created_at: Option<EpochMillis>,
    pub updated_at: Option<EpochMillis>,
}

/// Variant-specific part of a search result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineKind {
    ApmApplication(ApmApplicationOutlineFields),
    ApmDatabaseInstance(ApmDatabaseInstanceOutlineFields),
    ApmExternalService(ApmExternalServiceOutlineFields),
    BrowserApplication(BrowserApplicationOutlineFields),
    Dashboard(DashboardOutlineFields),
    External,
    Generic,
    GenericInfrastructure(GenericInfrastructureOutlineFields),
    InfrastructureAwsLambdaFunction(InfrastructureAwsLambdaFunctionOutlineFields),
    InfrastructureHost,
    MobileApplication(MobileApplicationOutlineFields),
    SecureCredential(SecureCredentialOutlineFields),
    SyntheticMonitor(SyntheticMonitorOutlineFields),
    ThirdPartyService,
    Unavailable,
    Workload(WorkloadOutlineFields),
    /// Unknown discriminator.
    Unrecognized {
        /// The raw discriminator.
        typename: String,
    },
}

impl OutlineKind {
    /// Select and decode the outline variant named by `typename`.
    pub fn decode(typename: Option<&str>, value: &Value) -> Result<Self, serde_json::Error> {
        let kind = match typename.unwrap_or_default() {
            "ApmApplicationEntityOutline" => Self::ApmApplication(Deserialize::deserialize(value)?),
            "ApmDatabaseInstanceEntityOutline" => {
                Self::ApmDatabaseInstance(Deserialize::deserialize(value)?)
            }
            "ApmExternalServiceEntityOutline" => {
                Self::ApmExternalService(Deserialize::deserialize(value)?)
            }
            "BrowserApplicationEntityOutline" => {
                Self::BrowserApplication(Deserialize::deserialize(value)?)
            }
            "DashboardEntityOutline" => Self::Dashboard(Deserialize::deserialize(value)?),
            "ExternalEntityOutline" => Self::External,
            "GenericEntityOutline" => Self::Generic,
            "GenericInfrastructureEntityOutline" => {
                Self::GenericInfrastructure(Deserialize::deserialize(value)?)
            }
            "InfrastructureAwsLambdaFunctionEntityOutline" => {
                Self::InfrastructureAwsLambdaFunction(Deserialize::deserialize(value)?)
            }
            "InfrastructureHostEntityOutline" => Self::InfrastructureHost,
            "MobileApplicationEntityOutline" => {
                Self::MobileApplication(Deserialize::deserialize(value)?)
            }
            "SecureCredentialEntityOutline" => {
                Self::SecureCredential(Deserialize::deserialize(value)?)
            }
            "SyntheticMonitorEntityOutline" => {
                Self::SyntheticMonitor(Deserialize::deserialize(value)?)
            }
            "ThirdPartyServiceEntityOutline" => Self::ThirdPartyService,
            "UnavailableEntityOutline" => Self::Unavailable,
            "WorkloadEntityOutline" => Self::Workload(Deserialize::deserialize(value)?),
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
            Self::ApmApplication(_) => "ApmApplicationEntityOutline",
            Self::ApmDatabaseInstance(_) => "ApmDatabaseInstanceEntityOutline",
            Self::ApmExternalService(_) => "ApmExternalServiceEntityOutline",
            Self::BrowserApplication(_) => "BrowserApplicationEntityOutline",
            Self::Dashboard(_) => "DashboardEntityOutline",
            Self::External => "ExternalEntityOutline",
            Self::Generic => "GenericEntityOutline",
            Self::GenericInfrastructure(_) => "GenericInfrastructureEntityOutline",
            Self::InfrastructureAwsLambdaFunction(_) => {
                "InfrastructureAwsLambdaFunctionEntityOutline"
            }
            Self::InfrastructureHost => "InfrastructureHostEntityOutline",
            Self::MobileApplication(_) => "MobileApplicationEntityOutline",
            Self::SecureCredential(_) => "SecureCredentialEntityOutline",
            Self::SyntheticMonitor(_) => "SyntheticMonitorEntityOutline",
            Self::ThirdPartyService => "ThirdPartyServiceEntityOutline",
            Self::Unavailable => "UnavailableEntityOutline",
            Self::Workload(_) => "WorkloadEntityOutline",
            Self::Unrecognized { typename } => typename,
        }
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
            Self::MobileApplication(fields) => serde_json::to_value(fields)?,
            Self::SecureCredential(fields) => serde_json::to_value(fields)?,
            Self::SyntheticMonitor(fields) => serde_json::to_value(fields)?,
            Self::Workload(fields) => serde_json::to_value(fields)?,
            Self::External
            | Self::Generic
            | Self::InfrastructureHost
            | Self::ThirdPartyService
            | Self::Unavailable
            | Self::Unrecognized { .. } => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// A search result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOutline {
    /// Shared fields.
    pub identity: OutlineIdentity,
    /// Variant fields.
    pub kind: OutlineKind,
}

impl EntityOutline {
    /// Decode an outline from its flat JSON shape.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let typename = value.get(TYPENAME).and_then(Value::as_str);
        Ok(Self {
            identity: OutlineIdentity::deserialize(value)?,
            kind: OutlineKind::decode(typename, value)?,
        })
    }

    /// Encode the outline back into its flat JSON shape.
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

    /// The discriminator of this record.
    #[must_use]
    pub fn typename(&self) -> &str {
        self.kind.typename()
    }
}

impl<'de> Deserialize<'de> for EntityOutline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for EntityOutline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn synthetic_outline_fields() {
        let outline = EntityOutline::from_value(&json!({
            "__typename": "SyntheticMonitorEntityOutline",
            "guid": "MXxTWU5USHxNT05JVE9SfGFiYw",
            "name": "homepage",
            "domain": "SYNTH",
            "type": "MONITOR",
            "monitorId": "abc",
            "monitorType": "SIMPLE",
            "monitoredUrl": "https://example.com",
            "period": 15
        }))
        .expect("decode");

        match &outline.kind {
            OutlineKind::SyntheticMonitor(fields) => {
                assert_eq!(fields.monitor_type.as_deref(), Some("SIMPLE"));
                assert_eq!(fields.period, Some(15));
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert_eq!(outline.identity.domain.as_deref(), Some("SYNTH"));
    }

    #[test]
    fn unknown_outline_keeps_shared_fields() {
        let outline: EntityOutline = serde_json::from_value(json!({
            "__typename": "NewKindOfEntityOutline",
            "guid": "X",
            "name": "mystery",
            "reporting": false
        }))
        .expect("decode");
        assert_eq!(outline.typename(), "NewKindOfEntityOutline");
        assert_eq!(outline.identity.reporting, Some(false));
    }

    #[test]
    fn null_outline_fields_decode_as_defaults() {
        let outline = EntityOutline::from_value(&json!({
            "__typename": "GenericEntityOutline",
            "guid": "G",
            "name": null,
            "tags": [{"key": "team", "values": null}]
        }))
        .expect("decode");
        assert_eq!(outline.identity.name, "");
        assert!(outline.identity.tags[0].values.is_empty());
    }

    #[test]
    fn outline_encodes_flat() {
        let outline = EntityOutline {
            identity: OutlineIdentity {
                guid: EntityGuid::new("H"),
                name: "host".into(),
                ..OutlineIdentity::default()
            },
            kind: OutlineKind::InfrastructureHost,
        };
        let value = serde_json::to_value(&outline).expect("encode");
        assert_eq!(value["__typename"], "InfrastructureHostEntityOutline");
        assert_eq!(value["name"], "host");
    }
}
