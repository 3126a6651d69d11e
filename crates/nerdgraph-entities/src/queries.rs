//! GraphQL documents for entity reads, entity search and tagging.
//!
//! Shared entity fields are selected once; each inline fragment adds only the
//! fields of its own variant.

macro_rules! entity_fields {
    () => {
        r"
	__typename
	account {
		id
		name
		reportingEventTypes
	}
	accountId
	alertSeverity
	domain
	entityType
	goldenMetrics {
		context {
			account
			guid
		}
		metrics {
			name
			query
			title
		}
	}
	goldenTags {
		context {
			account
			guid
		}
		tags {
			key
		}
	}
	guid
	indexedAt
	name
	permalink
	recentAlertViolations {
		agentUrl
		alertSeverity
		closedAt
		label
		level
		openedAt
		violationId
		violationUrl
	}
	relatedEntities {
		nextCursor
		results {
			__typename
			createdAt
			source {
				accountId
				entityType
				guid
			}
			target {
				accountId
				entityType
				guid
			}
			type
		}
	}
	relationships {
		source {
			accountId
			entityType
			guid
		}
		target {
			accountId
			entityType
			guid
		}
		type
	}
	reporting
	serviceLevel {
		indicators {
			createdAt
			description
			entityGuid
			id
			name
			updatedAt
		}
	}
	tags {
		key
		values
	}
	tagsWithMetadata {
		key
		values {
			mutable
			value
		}
	}
	type
	... on ApmApplicationEntity {
		applicationId
		language
		apmSummary {
			apdexScore
			errorRate
			hostCount
			instanceCount
			nonWebResponseTimeAverage
			nonWebThroughput
			responseTimeAverage
			throughput
			webResponseTimeAverage
			webThroughput
		}
		apmBrowserSummary {
			ajaxRequestThroughput
			ajaxResponseTimeAverage
			jsErrorRate
			pageLoadThroughput
			pageLoadTimeAverage
		}
		deployments {
			changelog
			description
			permalink
			revision
			timestamp
			user
		}
		metricNormalizationRules {
			action
			applicationGuid
			applicationName
			createdAt
			enabled
			evalOrder
			id
			matchExpression
			notes
			replacement
			terminateChain
		}
		runningAgentVersions {
			maxVersion
			minVersion
		}
		settings {
			apdexTarget
			serverSideConfig
		}
	}
	... on ApmDatabaseInstanceEntity {
		host
		portOrPath
		vendor
	}
	... on ApmExternalServiceEntity {
		host
		externalSummary {
			responseTimeAverage
			throughput
		}
	}
	... on BrowserApplicationEntity {
		agentInstallType
		applicationId
		servingApmApplicationId
		browserSummary {
			ajaxRequestThroughput
			ajaxResponseTimeAverage
			jsErrorRate
			pageLoadThroughput
			pageLoadTimeAverage
			pageLoadTimeMedian
			spaResponseTimeAverage
			spaResponseTimeMedian
		}
		metricNormalizationRules {
			action
			applicationGuid
			applicationName
			createdAt
			enabled
			evalOrder
			id
			matchExpression
			notes
			replacement
			terminateChain
		}
		runningAgentVersions {
			maxVersion
			minVersion
		}
		settings {
			apdexTarget
		}
	}
	... on DashboardEntity {
		createdAt
		dashboardParentGuid
		description
		owner {
			email
			userId
		}
		pages {
			createdAt
			description
			guid
			name
			updatedAt
		}
		permissions
		updatedAt
	}
	... on GenericInfrastructureEntity {
		integrationTypeCode
	}
	... on InfrastructureAwsLambdaFunctionEntity {
		integrationTypeCode
		runtime
	}
	... on InfrastructureHostEntity {
		hostSummary {
			cpuUtilizationPercent
			diskUsedPercent
			memoryUsedPercent
			networkReceiveRate
			networkTransmitRate
			servicesCount
		}
	}
	... on MobileApplicationEntity {
		applicationId
		mobileSummary {
			appLaunchCount
			crashCount
			crashRate
			httpErrorRate
			httpRequestCount
			httpRequestRate
			httpResponseTimeAverage
			mobileSessionCount
			networkFailureRate
			usersAffectedCount
		}
		metricNormalizationRules {
			action
			applicationGuid
			applicationName
			createdAt
			enabled
			evalOrder
			id
			matchExpression
			notes
			replacement
			terminateChain
		}
	}
	... on SecureCredentialEntity {
		description
		secureCredentialId
		secureCredentialSummary {
			failingMonitorCount
			monitorCount
		}
		updatedAt
	}
	... on SyntheticMonitorEntity {
		monitorId
		monitorSummary {
			locationsFailing
			locationsRunning
			status
			successRate
		}
		monitorType
		monitoredUrl
		period
	}
	... on WorkloadEntity {
		createdAt
		createdByUser {
			email
			gravatar
			id
			name
		}
		updatedAt
		workloadStatus {
			description
			statusSource
			statusValue
			summary
		}
	}
"
    };
}

macro_rules! outline_fields {
    () => {
        r"
			__typename
			accountId
			alertSeverity
			domain
			entityType
			guid
			indexedAt
			name
			permalink
			reporting
			tags {
				key
				values
			}
			type
			... on ApmApplicationEntityOutline {
				applicationId
				language
			}
			... on ApmDatabaseInstanceEntityOutline {
				host
				portOrPath
				vendor
			}
			... on ApmExternalServiceEntityOutline {
				host
			}
			... on BrowserApplicationEntityOutline {
				agentInstallType
				applicationId
				servingApmApplicationId
			}
			... on DashboardEntityOutline {
				createdAt
				dashboardParentGuid
				permissions
				updatedAt
			}
			... on GenericInfrastructureEntityOutline {
				integrationTypeCode
			}
			... on InfrastructureAwsLambdaFunctionEntityOutline {
				integrationTypeCode
				runtime
			}
			... on MobileApplicationEntityOutline {
				applicationId
			}
			... on SecureCredentialEntityOutline {
				description
				secureCredentialId
				updatedAt
			}
			... on SyntheticMonitorEntityOutline {
				monitorId
				monitorType
				monitoredUrl
				period
			}
			... on WorkloadEntityOutline {
				createdAt
				updatedAt
			}
"
    };
}

macro_rules! tagging_errors {
    () => {
        r"{
	errors {
		message
		type
	}
} }"
    };
}

/// Fetch one entity by GUID.
pub const GET_ENTITY_QUERY: &str = concat!(
    "query(\n\t$guid: EntityGuid!,\n) { actor { entity(\n\tguid: $guid,\n) {",
    entity_fields!(),
    "} } }"
);

/// Fetch up to 25 entities by GUID.
pub const GET_ENTITIES_QUERY: &str = concat!(
    "query(\n\t$guids: [EntityGuid]!,\n) { actor { entities(\n\tguids: $guids,\n) {",
    entity_fields!(),
    "} } }"
);

/// Search entities; one page of outlines per call.
pub const ENTITY_SEARCH_QUERY: &str = concat!(
    r"query(
	$options: EntitySearchOptions,
	$query: String,
	$queryBuilder: EntitySearchQueryBuilder,
	$sortBy: [EntitySearchSortCriteria],
	$cursor: String,
) { actor { entitySearch(
	options: $options,
	query: $query,
	queryBuilder: $queryBuilder,
	sortBy: $sortBy,
) {
	count
	query
	results(cursor: $cursor) {
		nextCursor
		entities {",
    outline_fields!(),
    r"		}
	}
	types {
		count
		domain
		entityType
		type
	}
} } }"
);

/// Add tags to an entity, keeping existing ones.
pub const TAGGING_ADD_TAGS_TO_ENTITY_MUTATION: &str = concat!(
    r"mutation(
	$guid: EntityGuid!,
	$tags: [TaggingTagInput!]!,
) { taggingAddTagsToEntity(
	guid: $guid,
	tags: $tags,
) ",
    tagging_errors!()
);

/// Replace all tags on an entity.
pub const TAGGING_REPLACE_TAGS_ON_ENTITY_MUTATION: &str = concat!(
    r"mutation(
	$guid: EntityGuid!,
	$tags: [TaggingTagInput!]!,
) { taggingReplaceTagsOnEntity(
	guid: $guid,
	tags: $tags,
) ",
    tagging_errors!()
);

/// Delete tag keys from an entity.
pub const TAGGING_DELETE_TAG_FROM_ENTITY_MUTATION: &str = concat!(
    r"mutation(
	$guid: EntityGuid!,
	$tagKeys: [String!]!,
) { taggingDeleteTagFromEntity(
	guid: $guid,
	tagKeys: $tagKeys,
) ",
    tagging_errors!()
);

/// Delete specific key/value pairs from an entity.
pub const TAGGING_DELETE_TAG_VALUES_FROM_ENTITY_MUTATION: &str = concat!(
    r"mutation(
	$guid: EntityGuid!,
	$tagValues: [TaggingTagValueInput!]!,
) { taggingDeleteTagValuesFromEntity(
	guid: $guid,
	tagValues: $tagValues,
) ",
    tagging_errors!()
);

#[cfg(test)]
mod tests {
    use nerdgraph::GraphqlQuery;

    use super::*;

    fn balanced(document: &str) -> bool {
        let mut depth = 0_i32;
        for ch in document.chars() {
            match ch {
                '{' | '(' => depth += 1,
                '}' | ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn documents_are_balanced() {
        for document in [
            GET_ENTITY_QUERY,
            GET_ENTITIES_QUERY,
            ENTITY_SEARCH_QUERY,
            TAGGING_ADD_TAGS_TO_ENTITY_MUTATION,
            TAGGING_REPLACE_TAGS_ON_ENTITY_MUTATION,
            TAGGING_DELETE_TAG_FROM_ENTITY_MUTATION,
            TAGGING_DELETE_TAG_VALUES_FROM_ENTITY_MUTATION,
        ] {
            assert!(balanced(document), "unbalanced document: {document}");
        }
    }

    #[test]
    fn mutations_are_not_idempotent() {
        assert!(!GraphqlQuery::from_static(GET_ENTITY_QUERY).is_mutation());
        assert!(!GraphqlQuery::from_static(ENTITY_SEARCH_QUERY).is_mutation());
        assert!(GraphqlQuery::from_static(TAGGING_ADD_TAGS_TO_ENTITY_MUTATION).is_mutation());
        assert!(
            GraphqlQuery::from_static(TAGGING_DELETE_TAG_VALUES_FROM_ENTITY_MUTATION).is_mutation()
        );
    }

    #[test]
    fn search_threads_cursor_into_results() {
        assert!(ENTITY_SEARCH_QUERY.contains("$cursor: String"));
        assert!(ENTITY_SEARCH_QUERY.contains("results(cursor: $cursor)"));
    }

    #[test]
    fn shared_fields_selected_once() {
        assert_eq!(GET_ENTITY_QUERY.matches("tagsWithMetadata").count(), 1);
        assert_eq!(GET_ENTITY_QUERY.matches("permalink").count(), 2);
    }
}
