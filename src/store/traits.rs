use crate::model::{
    Artifact, ArtifactDetail, ArtifactGroupCount, ArtifactType, ArtifactTypeSeed, ArtifactUpdate,
    BusinessFunction, Client, ClientFields, ClientListing, Company, ErpSystem, Id, NewArtifact,
    NewBusinessFunction, NewCompany, NewErpSystem,
};
use anyhow::Result;

// Listing contract shared by every hierarchy store: children come back ordered
// by name ignoring case (see `sort_by_name`), then id. The `*_for_*` variants
// take a whole parent set and must be a single round-trip so the materializer
// stays flat per level.

#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    async fn get_client(&self, id: Id) -> Result<Option<Client>>;
    async fn list_clients(&self) -> Result<Vec<Client>>;
    /// Clients with their company counts, ordered by name
    async fn list_clients_with_company_count(&self) -> Result<Vec<ClientListing>>;
    /// Fails with `CatalogError::Conflict` when the code is taken
    async fn create_client(&self, fields: ClientFields, created_by: Option<Id>) -> Result<Client>;
    async fn update_client(&self, id: Id, fields: ClientFields) -> Result<Option<Client>>;
    /// Removes the client and everything beneath it
    async fn delete_client(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait CompanyStore: Send + Sync {
    async fn get_company(&self, id: Id) -> Result<Option<Company>>;
    async fn list_companies(&self, client_id: Id) -> Result<Vec<Company>>;
    async fn list_companies_for_clients(&self, client_ids: &[Id]) -> Result<Vec<Company>>;
    async fn create_company(&self, company: NewCompany, created_by: Option<Id>) -> Result<Company>;
}

#[async_trait::async_trait]
pub trait ErpSystemStore: Send + Sync {
    async fn get_erp_system(&self, id: Id) -> Result<Option<ErpSystem>>;
    async fn list_erp_systems(&self, company_id: Id) -> Result<Vec<ErpSystem>>;
    async fn list_erp_systems_for_companies(&self, company_ids: &[Id]) -> Result<Vec<ErpSystem>>;
    async fn create_erp_system(
        &self,
        erp: NewErpSystem,
        created_by: Option<Id>,
    ) -> Result<ErpSystem>;
}

#[async_trait::async_trait]
pub trait BusinessFunctionStore: Send + Sync {
    async fn get_business_function(&self, id: Id) -> Result<Option<BusinessFunction>>;
    async fn list_business_functions(&self, erp_id: Id) -> Result<Vec<BusinessFunction>>;
    async fn list_business_functions_for_erp_systems(
        &self,
        erp_ids: &[Id],
    ) -> Result<Vec<BusinessFunction>>;
    async fn create_business_function(
        &self,
        function: NewBusinessFunction,
        created_by: Option<Id>,
    ) -> Result<BusinessFunction>;
}

#[async_trait::async_trait]
pub trait ArtifactTypeStore: Send + Sync {
    async fn get_artifact_type(&self, id: Id) -> Result<Option<ArtifactType>>;
    /// All reference rows in seed (id) order
    async fn list_artifact_types(&self) -> Result<Vec<ArtifactType>>;
    async fn get_artifact_type_by_code(&self, code: &str) -> Result<Option<ArtifactType>>;
    /// Inserts missing types, leaves existing codes alone. Returns the rows inserted.
    async fn seed_artifact_types(&self, seeds: &[ArtifactTypeSeed]) -> Result<Vec<ArtifactType>>;
}

#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn get_artifact(&self, id: Id) -> Result<Option<ArtifactDetail>>;
    /// Artifacts of one type under a function, most recently updated first
    async fn list_artifacts(&self, function_id: Id, artifact_type_id: Id) -> Result<Vec<Artifact>>;
    /// Row counts grouped by `(function_id, artifact_type_id)` over the whole id set
    async fn count_artifacts_by_function(
        &self,
        function_ids: &[Id],
    ) -> Result<Vec<ArtifactGroupCount>>;
    async fn create_artifact(&self, artifact: NewArtifact) -> Result<Artifact>;
    async fn update_artifact(&self, id: Id, update: ArtifactUpdate) -> Result<Option<Artifact>>;
    async fn delete_artifact(&self, id: Id) -> Result<bool>;
}

pub trait Store:
    ClientStore
    + CompanyStore
    + ErpSystemStore
    + BusinessFunctionStore
    + ArtifactTypeStore
    + ArtifactStore
    + Send
    + Sync
{
}
