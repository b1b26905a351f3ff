use serde_json::json;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Artifact, ArtifactDetail, ArtifactTypeCode, ArtifactUpdate, DiagramContent, Id, NewArtifact,
    NewDiagram, UserContext,
};
use crate::store::traits::Store;

/// Diagram artifacts of a business function.
///
/// The canvas (`content`) is stored as given; node and edge shapes are the
/// editor's business.
pub struct DiagramOperations;

impl DiagramOperations {
    async fn diagram_type_id<S: Store>(store: &S) -> CatalogResult<Id> {
        store
            .get_artifact_type_by_code(ArtifactTypeCode::Diagrams.as_str())
            .await?
            .map(|artifact_type| artifact_type.id)
            .ok_or_else(|| {
                CatalogError::ReferenceDataMissing(
                    "Diagram artifact type not found in database".to_string(),
                )
            })
    }

    /// Diagrams of a function, most recently updated first
    pub async fn list_for_function<S: Store>(
        store: &S,
        function_id: Id,
    ) -> CatalogResult<Vec<Artifact>> {
        let type_id = Self::diagram_type_id(store).await?;
        Ok(store.list_artifacts(function_id, type_id).await?)
    }

    pub async fn get<S: Store>(store: &S, id: Id) -> CatalogResult<ArtifactDetail> {
        store
            .get_artifact(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Diagram"))
    }

    pub async fn create<S: Store>(
        store: &S,
        function_id: Id,
        diagram: NewDiagram,
        user: &UserContext,
    ) -> CatalogResult<Artifact> {
        let name = diagram
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| CatalogError::Validation("Diagram name is required".to_string()))?;

        let type_id = Self::diagram_type_id(store).await?;

        if store.get_business_function(function_id).await?.is_none() {
            return Err(CatalogError::not_found("Business function"));
        }

        Ok(store
            .create_artifact(NewArtifact {
                function_id,
                artifact_type_id: type_id,
                name,
                description: diagram.description,
                content: diagram.content.unwrap_or_else(|| json!({})),
                created_by: user.user_id,
            })
            .await?)
    }

    /// Partial update; fields left out keep their stored values
    pub async fn update<S: Store>(
        store: &S,
        id: Id,
        update: ArtifactUpdate,
    ) -> CatalogResult<Artifact> {
        store
            .update_artifact(id, update)
            .await?
            .ok_or_else(|| CatalogError::not_found("Diagram"))
    }

    pub async fn delete<S: Store>(store: &S, id: Id) -> CatalogResult<()> {
        if store.delete_artifact(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found("Diagram"))
        }
    }

    /// Replace the canvas with the given nodes and edges
    pub async fn save_content<S: Store>(
        store: &S,
        id: Id,
        content: DiagramContent,
    ) -> CatalogResult<Artifact> {
        let (Some(nodes), Some(edges)) = (content.nodes, content.edges) else {
            return Err(CatalogError::Validation(
                "Nodes and edges are required".to_string(),
            ));
        };

        Self::update(
            store,
            id,
            ArtifactUpdate {
                content: Some(json!({ "nodes": nodes, "edges": edges })),
                ..ArtifactUpdate::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::{seed_artifact_types, CatalogBuilder};
    use crate::model::BusinessFunction;
    use crate::store::MemoryStore;

    async fn function_fixture(store: &MemoryStore) -> BusinessFunction {
        let builder = CatalogBuilder::new(store);
        let client = builder.client("C1", "Acme").await;
        let company = builder.company(client.id, "CO1", "Acme EU").await;
        let erp = builder.erp_system(company.id, "ERP1", "SAP").await;
        builder.function(erp.id, "BF1", "Finance").await
    }

    fn new_diagram(name: Option<&str>) -> NewDiagram {
        NewDiagram {
            name: name.map(str::to_string),
            description: Some("GL and AP/AR data model".to_string()),
            content: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_content_and_lists_newest_first() {
        let store = MemoryStore::new();
        seed_artifact_types(&store).await;
        let function = function_fixture(&store).await;
        let user = UserContext::new(1);

        let first =
            DiagramOperations::create(&store, function.id, new_diagram(Some("First")), &user)
                .await
                .unwrap();
        let second =
            DiagramOperations::create(&store, function.id, new_diagram(Some("Second")), &user)
                .await
                .unwrap();

        assert_eq!(first.content, json!({}));
        assert_eq!(first.created_by, Some(1));

        let listed = DiagramOperations::list_for_function(&store, function.id)
            .await
            .unwrap();
        let ids: Vec<Id> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let detail = DiagramOperations::get(&store, first.id).await.unwrap();
        assert_eq!(detail.function_code.as_deref(), Some("BF1"));
    }

    #[tokio::test]
    async fn test_create_validation_and_missing_references() {
        let store = MemoryStore::new();
        let function = function_fixture(&store).await;
        let user = UserContext::default();

        let err = DiagramOperations::create(&store, function.id, new_diagram(None), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        // artifact types not seeded yet
        let err = DiagramOperations::create(&store, function.id, new_diagram(Some("X")), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ReferenceDataMissing(_)));

        seed_artifact_types(&store).await;
        let err = DiagramOperations::create(&store, 9999, new_diagram(Some("X")), &user)
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::NotFound("Business function".to_string()));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = MemoryStore::new();
        seed_artifact_types(&store).await;
        let function = function_fixture(&store).await;
        let created = DiagramOperations::create(
            &store,
            function.id,
            NewDiagram {
                name: Some("Customer Order Model".to_string()),
                description: Some("Basic entities".to_string()),
                content: Some(json!({"nodes": [], "edges": []})),
            },
            &UserContext::default(),
        )
        .await
        .unwrap();

        let updated = DiagramOperations::update(
            &store,
            created.id,
            ArtifactUpdate {
                name: Some("Order Model".to_string()),
                ..ArtifactUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Order Model");
        assert_eq!(updated.description.as_deref(), Some("Basic entities"));
        assert_eq!(updated.content, json!({"nodes": [], "edges": []}));
    }

    #[tokio::test]
    async fn test_save_content_requires_nodes_and_edges() {
        let store = MemoryStore::new();
        seed_artifact_types(&store).await;
        let function = function_fixture(&store).await;
        let created = DiagramOperations::create(
            &store,
            function.id,
            new_diagram(Some("Canvas")),
            &UserContext::default(),
        )
        .await
        .unwrap();

        let err = DiagramOperations::save_content(
            &store,
            created.id,
            DiagramContent {
                nodes: Some(json!([])),
                edges: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let saved = DiagramOperations::save_content(
            &store,
            created.id,
            DiagramContent {
                nodes: Some(json!([{"id": "1", "type": "entity"}])),
                edges: Some(json!([])),
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.content["nodes"][0]["type"], "entity");
    }

    #[tokio::test]
    async fn test_delete_missing_diagram() {
        let store = MemoryStore::new();

        let err = DiagramOperations::delete(&store, 5).await.unwrap_err();

        assert_eq!(err, CatalogError::NotFound("Diagram".to_string()));
    }
}
