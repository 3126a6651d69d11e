//! Entity reads, entity search and tagging over a [`QueryExecutor`].

use nerdgraph::{
    CancellationToken, ClientConfig, ConfigError, HttpTransport, QueryError, QueryExecutor,
    TransportError, Variables,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::entity::{Entity, null_as_default};
use crate::error::{EntitiesError, Result};
use crate::queries::{
    ENTITY_SEARCH_QUERY, GET_ENTITIES_QUERY, GET_ENTITY_QUERY,
    TAGGING_ADD_TAGS_TO_ENTITY_MUTATION, TAGGING_DELETE_TAG_FROM_ENTITY_MUTATION,
    TAGGING_DELETE_TAG_VALUES_FROM_ENTITY_MUTATION, TAGGING_REPLACE_TAGS_ON_ENTITY_MUTATION,
};
use crate::search::{
    EntitySearchOptions, EntitySearchQueryBuilder, EntitySearchResult, EntitySearchSortCriteria,
};
use crate::tagging::{TaggingMutationResult, TaggingTagInput, TaggingTagValueInput};
use crate::types::EntityGuid;

/// Most GUIDs the API accepts in one `entities` request.
pub const MAX_ENTITIES_PER_REQUEST: usize = 25;

// ─────────────────────────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ActorResponse<T> {
    #[serde(default)]
    actor: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct EntityActor {
    #[serde(default)]
    entity: Option<Entity>,
}

#[derive(Debug, Default, Deserialize)]
struct EntitiesActor {
    #[serde(default, deserialize_with = "null_as_default")]
    entities: Vec<Entity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntitySearchActor {
    #[serde(default)]
    entity_search: Option<EntitySearchResult>,
}

#[derive(Debug, Deserialize)]
struct AddTagsResponse {
    #[serde(rename = "taggingAddTagsToEntity", alias = "TaggingAddTagsToEntity")]
    result: Option<TaggingMutationResult>,
}

#[derive(Debug, Deserialize)]
struct ReplaceTagsResponse {
    #[serde(rename = "taggingReplaceTagsOnEntity", alias = "TaggingReplaceTagsOnEntity")]
    result: Option<TaggingMutationResult>,
}

#[derive(Debug, Deserialize)]
struct DeleteTagsResponse {
    #[serde(rename = "taggingDeleteTagFromEntity", alias = "TaggingDeleteTagFromEntity")]
    result: Option<TaggingMutationResult>,
}

#[derive(Debug, Deserialize)]
struct DeleteTagValuesResponse {
    #[serde(
        rename = "taggingDeleteTagValuesFromEntity",
        alias = "TaggingDeleteTagValuesFromEntity"
    )]
    result: Option<TaggingMutationResult>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Entity and tagging operations.
///
/// Stateless between calls; clones share the executor's transport.
#[derive(Debug, Clone)]
pub struct EntitiesClient {
    executor: QueryExecutor,
}

impl EntitiesClient {
    /// Create a client over an executor.
    #[must_use]
    pub const fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Create a client backed by the default HTTP transport.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(QueryExecutor::new(transport)))
    }

    /// The underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Fetch one entity by GUID.
    #[instrument(skip(self, cancel, guid), fields(guid = %guid))]
    pub async fn get_entity(&self, cancel: &CancellationToken, guid: &EntityGuid) -> Result<Entity> {
        let mut variables = Variables::new();
        insert(&mut variables, "guid", guid)?;

        let response: ActorResponse<EntityActor> = self
            .executor
            .execute(cancel, GET_ENTITY_QUERY, variables)
            .await?;

        response
            .actor
            .and_then(|actor| actor.entity)
            .ok_or_else(|| EntitiesError::NotFound(guid.to_string()))
    }

    /// Fetch several entities by GUID, in server order.
    ///
    /// The API caps a request at [`MAX_ENTITIES_PER_REQUEST`] GUIDs.
    #[instrument(skip(self, cancel, guids), fields(count = guids.len()))]
    pub async fn get_entities(
        &self,
        cancel: &CancellationToken,
        guids: &[EntityGuid],
    ) -> Result<Vec<Entity>> {
        let mut variables = Variables::new();
        insert(&mut variables, "guids", guids)?;

        let response: ActorResponse<EntitiesActor> = self
            .executor
            .execute(cancel, GET_ENTITIES_QUERY, variables)
            .await?;

        let entities = response
            .actor
            .map(|actor| actor.entities)
            .unwrap_or_default();
        if entities.is_empty() {
            return Err(EntitiesError::NotFound(join_guids(guids)));
        }
        debug!(returned = entities.len(), "Fetched entities");
        Ok(entities)
    }

    /// Search entities and return one page of outlines.
    ///
    /// Exactly one of `query` and `query_builder` must be given; an empty
    /// query string or an empty builder counts as absent. Pass
    /// [`EntitySearchResult::next_cursor`] back through
    /// [`EntitySearchOptions::cursor`] to fetch the next page.
    #[instrument(skip_all, fields(has_cursor = options.cursor.is_some()))]
    pub async fn get_entity_search(
        &self,
        cancel: &CancellationToken,
        options: EntitySearchOptions,
        query: Option<&str>,
        query_builder: Option<EntitySearchQueryBuilder>,
        sort_by: &[EntitySearchSortCriteria],
    ) -> Result<EntitySearchResult> {
        let query = query.filter(|query| !query.is_empty());
        let query_builder = query_builder.filter(|builder| !builder.is_empty());

        let mut variables = Variables::new();
        match (query, query_builder) {
            (Some(query), None) => insert(&mut variables, "query", query)?,
            (None, Some(builder)) => insert(&mut variables, "queryBuilder", &builder)?,
            (Some(_), Some(_)) => {
                return Err(EntitiesError::InvalidSearch(
                    "supply either a query or a query builder, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(EntitiesError::InvalidSearch(
                    "a query or a query builder is required".to_string(),
                ));
            }
        }
        insert(&mut variables, "options", &options)?;
        if !sort_by.is_empty() {
            insert(&mut variables, "sortBy", sort_by)?;
        }
        if let Some(cursor) = &options.cursor {
            insert(&mut variables, "cursor", cursor)?;
        }

        let response: ActorResponse<EntitySearchActor> = self
            .executor
            .execute(cancel, ENTITY_SEARCH_QUERY, variables)
            .await?;

        let result = response
            .actor
            .and_then(|actor| actor.entity_search)
            .ok_or_else(|| missing_payload("actor.entitySearch"))?;
        debug!(
            count = result.count,
            page = result.entities().len(),
            "Entity search page"
        );
        Ok(result)
    }

    /// Add tags to an entity, keeping the ones it already has.
    #[instrument(skip(self, cancel, guid, tags), fields(guid = %guid))]
    pub async fn tagging_add_tags_to_entity(
        &self,
        cancel: &CancellationToken,
        guid: &EntityGuid,
        tags: &[TaggingTagInput],
    ) -> Result<TaggingMutationResult> {
        let variables = tag_variables(guid, "tags", tags)?;
        let response: AddTagsResponse = self
            .executor
            .execute(cancel, TAGGING_ADD_TAGS_TO_ENTITY_MUTATION, variables)
            .await?;
        response
            .result
            .ok_or_else(|| missing_payload("taggingAddTagsToEntity"))
    }

    /// Replace every tag on an entity.
    #[instrument(skip(self, cancel, guid, tags), fields(guid = %guid))]
    pub async fn tagging_replace_tags_on_entity(
        &self,
        cancel: &CancellationToken,
        guid: &EntityGuid,
        tags: &[TaggingTagInput],
    ) -> Result<TaggingMutationResult> {
        let variables = tag_variables(guid, "tags", tags)?;
        let response: ReplaceTagsResponse = self
            .executor
            .execute(cancel, TAGGING_REPLACE_TAGS_ON_ENTITY_MUTATION, variables)
            .await?;
        response
            .result
            .ok_or_else(|| missing_payload("taggingReplaceTagsOnEntity"))
    }

    /// Delete tag keys, and all their values, from an entity.
    #[instrument(skip(self, cancel, guid, tag_keys), fields(guid = %guid))]
    pub async fn tagging_delete_tag_from_entity(
        &self,
        cancel: &CancellationToken,
        guid: &EntityGuid,
        tag_keys: &[String],
    ) -> Result<TaggingMutationResult> {
        let variables = tag_variables(guid, "tagKeys", tag_keys)?;
        let response: DeleteTagsResponse = self
            .executor
            .execute(cancel, TAGGING_DELETE_TAG_FROM_ENTITY_MUTATION, variables)
            .await?;
        response
            .result
            .ok_or_else(|| missing_payload("taggingDeleteTagFromEntity"))
    }

    /// Delete specific key/value pairs from an entity.
    #[instrument(skip(self, cancel, guid, tag_values), fields(guid = %guid))]
    pub async fn tagging_delete_tag_values_from_entity(
        &self,
        cancel: &CancellationToken,
        guid: &EntityGuid,
        tag_values: &[TaggingTagValueInput],
    ) -> Result<TaggingMutationResult> {
        let variables = tag_variables(guid, "tagValues", tag_values)?;
        let response: DeleteTagValuesResponse = self
            .executor
            .execute(cancel, TAGGING_DELETE_TAG_VALUES_FROM_ENTITY_MUTATION, variables)
            .await?;
        response
            .result
            .ok_or_else(|| missing_payload("taggingDeleteTagValuesFromEntity"))
    }
}

fn insert<T: Serialize + ?Sized>(variables: &mut Variables, name: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)
        .map_err(|err| EntitiesError::Query(TransportError::from(err).into()))?;
    variables.insert(name.to_string(), value);
    Ok(())
}

fn tag_variables<T: Serialize>(guid: &EntityGuid, name: &str, values: &[T]) -> Result<Variables> {
    let mut variables = Variables::new();
    insert(&mut variables, "guid", guid)?;
    insert(&mut variables, name, values)?;
    Ok(variables)
}

fn missing_payload(field: &str) -> EntitiesError {
    EntitiesError::Query(QueryError::Protocol {
        message: format!("response has no {field}"),
    })
}

fn join_guids(guids: &[EntityGuid]) -> String {
    guids
        .iter()
        .map(EntityGuid::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_variables_shape() {
        let variables = tag_variables(
            &EntityGuid::new("MXxBUE18"),
            "tagValues",
            &[TaggingTagValueInput::new("env", "prod")],
        )
        .expect("variables");
        assert_eq!(
            serde_json::Value::Object(variables),
            serde_json::json!({
                "guid": "MXxBUE18",
                "tagValues": [{"key": "env", "value": "prod"}]
            })
        );
    }

    #[test]
    fn tagging_payload_accepts_either_case() {
        let lower: AddTagsResponse =
            serde_json::from_value(serde_json::json!({"taggingAddTagsToEntity": {"errors": []}}))
                .expect("lower");
        let upper: AddTagsResponse =
            serde_json::from_value(serde_json::json!({"TaggingAddTagsToEntity": {"errors": []}}))
                .expect("upper");
        assert_eq!(lower.result, upper.result);
    }

    #[test]
    fn not_found_names_requested_guids() {
        let guids = [EntityGuid::new("A"), EntityGuid::new("B")];
        assert_eq!(join_guids(&guids), "A, B");
    }
}
