use anyhow::{anyhow, Result};
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::CatalogError;
use crate::model::{
    sort_by_name, Artifact, ArtifactDetail, ArtifactGroupCount, ArtifactType, ArtifactTypeSeed,
    ArtifactUpdate, BusinessFunction, Client, ClientFields, ClientListing, Company, ErpSystem, Id,
    NewArtifact, NewBusinessFunction, NewCompany, NewErpSystem,
};
use crate::store::traits::{
    ArtifactStore, ArtifactTypeStore, BusinessFunctionStore, ClientStore, CompanyStore,
    ErpSystemStore, Store,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: Id,
    clients: Vec<Client>,
    companies: Vec<Company>,
    erp_systems: Vec<ErpSystem>,
    business_functions: Vec<BusinessFunction>,
    artifact_types: Vec<ArtifactType>,
    artifacts: Vec<Artifact>,
}

impl Tables {
    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    /// Mirrors `ON DELETE CASCADE` down the hierarchy
    fn cascade_from_clients(&mut self, client_ids: &HashSet<Id>) {
        let company_ids: HashSet<Id> = self
            .companies
            .iter()
            .filter(|c| client_ids.contains(&c.client_id))
            .map(|c| c.id)
            .collect();
        self.companies.retain(|c| !company_ids.contains(&c.id));

        let erp_ids: HashSet<Id> = self
            .erp_systems
            .iter()
            .filter(|e| company_ids.contains(&e.company_id))
            .map(|e| e.id)
            .collect();
        self.erp_systems.retain(|e| !erp_ids.contains(&e.id));

        let function_ids: HashSet<Id> = self
            .business_functions
            .iter()
            .filter(|f| erp_ids.contains(&f.erp_id))
            .map(|f| f.id)
            .collect();
        self.business_functions.retain(|f| !function_ids.contains(&f.id));

        self.artifacts.retain(|a| !function_ids.contains(&a.function_id));
    }
}

/// In-process store with the same contracts as [`PostgresStore`](crate::store::PostgresStore).
///
/// Used by tests and local demos. Every read counts as one round-trip so
/// callers can assert how many queries an operation issues, and reads can be
/// made to fail to stand in for a lost database connection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    round_trips: AtomicUsize,
    /// Round-trip number from which reads fail; 0 never fails
    failing_from: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read calls served since creation or the last reset
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    pub fn reset_round_trips(&self) {
        self.round_trips.store(0, Ordering::SeqCst);
    }

    /// Let the next `reads` reads succeed, then fail every read after them
    pub fn fail_reads_after(&self, reads: usize) {
        self.failing_from.store(self.round_trips() + reads + 1, Ordering::SeqCst);
    }

    pub fn restore_reads(&self) {
        self.failing_from.store(0, Ordering::SeqCst);
    }

    fn read(&self) -> Result<parking_lot::RwLockReadGuard<'_, Tables>> {
        let trip = self.round_trips.fetch_add(1, Ordering::SeqCst) + 1;
        let failing_from = self.failing_from.load(Ordering::SeqCst);
        if failing_from != 0 && trip >= failing_from {
            return Err(anyhow!("connection reset on read {}", trip));
        }
        Ok(self.tables.read())
    }
}

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[async_trait::async_trait]
impl ClientStore for MemoryStore {
    async fn get_client(&self, id: Id) -> Result<Option<Client>> {
        Ok(self.read()?.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        let mut clients = self.read()?.clients.clone();
        sort_by_name(&mut clients);
        Ok(clients)
    }

    async fn list_clients_with_company_count(&self) -> Result<Vec<ClientListing>> {
        let tables = self.read()?;
        let mut clients = tables.clients.clone();
        sort_by_name(&mut clients);

        Ok(clients
            .into_iter()
            .map(|client| {
                let company_count = tables
                    .companies
                    .iter()
                    .filter(|c| c.client_id == client.id)
                    .count() as i64;
                ClientListing {
                    client,
                    company_count,
                }
            })
            .collect())
    }

    async fn create_client(&self, fields: ClientFields, created_by: Option<Id>) -> Result<Client> {
        let mut tables = self.tables.write();
        if tables.clients.iter().any(|c| c.code == fields.code) {
            return Err(CatalogError::duplicate_client_code().into());
        }

        let timestamp = now();
        let client = Client {
            id: tables.allocate_id(),
            code: fields.code,
            name: fields.name,
            description: fields.description,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn update_client(&self, id: Id, fields: ClientFields) -> Result<Option<Client>> {
        let mut tables = self.tables.write();
        if tables
            .clients
            .iter()
            .any(|c| c.code == fields.code && c.id != id)
        {
            return Err(CatalogError::duplicate_client_code().into());
        }

        let Some(client) = tables.clients.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        client.code = fields.code;
        client.name = fields.name;
        client.description = fields.description;
        client.updated_at = now();
        Ok(Some(client.clone()))
    }

    async fn delete_client(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        if tables.clients.len() == before {
            return Ok(false);
        }

        tables.cascade_from_clients(&HashSet::from([id]));
        Ok(true)
    }
}

#[async_trait::async_trait]
impl CompanyStore for MemoryStore {
    async fn get_company(&self, id: Id) -> Result<Option<Company>> {
        Ok(self.read()?.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list_companies(&self, client_id: Id) -> Result<Vec<Company>> {
        self.list_companies_for_clients(&[client_id]).await
    }

    async fn list_companies_for_clients(&self, client_ids: &[Id]) -> Result<Vec<Company>> {
        let mut companies: Vec<Company> = self
            .read()?
            .companies
            .iter()
            .filter(|c| client_ids.contains(&c.client_id))
            .cloned()
            .collect();
        sort_by_name(&mut companies);
        Ok(companies)
    }

    async fn create_company(&self, company: NewCompany, created_by: Option<Id>) -> Result<Company> {
        let mut tables = self.tables.write();
        if !tables.clients.iter().any(|c| c.id == company.client_id) {
            return Err(anyhow!("client {} does not exist", company.client_id));
        }
        if tables
            .companies
            .iter()
            .any(|c| c.client_id == company.client_id && c.code == company.code)
        {
            return Err(anyhow!(
                "company code '{}' already used by client {}",
                company.code,
                company.client_id
            ));
        }

        let timestamp = now();
        let row = Company {
            id: tables.allocate_id(),
            client_id: company.client_id,
            code: company.code,
            name: company.name,
            description: company.description,
            location: company.location,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.companies.push(row.clone());
        Ok(row)
    }
}

#[async_trait::async_trait]
impl ErpSystemStore for MemoryStore {
    async fn get_erp_system(&self, id: Id) -> Result<Option<ErpSystem>> {
        Ok(self.read()?.erp_systems.iter().find(|e| e.id == id).cloned())
    }

    async fn list_erp_systems(&self, company_id: Id) -> Result<Vec<ErpSystem>> {
        self.list_erp_systems_for_companies(&[company_id]).await
    }

    async fn list_erp_systems_for_companies(&self, company_ids: &[Id]) -> Result<Vec<ErpSystem>> {
        let mut erp_systems: Vec<ErpSystem> = self
            .read()?
            .erp_systems
            .iter()
            .filter(|e| company_ids.contains(&e.company_id))
            .cloned()
            .collect();
        sort_by_name(&mut erp_systems);
        Ok(erp_systems)
    }

    async fn create_erp_system(
        &self,
        erp: NewErpSystem,
        created_by: Option<Id>,
    ) -> Result<ErpSystem> {
        let mut tables = self.tables.write();
        if !tables.companies.iter().any(|c| c.id == erp.company_id) {
            return Err(anyhow!("company {} does not exist", erp.company_id));
        }
        if tables
            .erp_systems
            .iter()
            .any(|e| e.company_id == erp.company_id && e.code == erp.code)
        {
            return Err(anyhow!(
                "ERP code '{}' already used by company {}",
                erp.code,
                erp.company_id
            ));
        }

        let timestamp = now();
        let row = ErpSystem {
            id: tables.allocate_id(),
            company_id: erp.company_id,
            code: erp.code,
            name: erp.name,
            description: erp.description,
            vendor: erp.vendor,
            version: erp.version,
            environment: erp.environment,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.erp_systems.push(row.clone());
        Ok(row)
    }
}

#[async_trait::async_trait]
impl BusinessFunctionStore for MemoryStore {
    async fn get_business_function(&self, id: Id) -> Result<Option<BusinessFunction>> {
        Ok(self
            .read()?
            .business_functions
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn list_business_functions(&self, erp_id: Id) -> Result<Vec<BusinessFunction>> {
        self.list_business_functions_for_erp_systems(&[erp_id]).await
    }

    async fn list_business_functions_for_erp_systems(
        &self,
        erp_ids: &[Id],
    ) -> Result<Vec<BusinessFunction>> {
        let mut functions: Vec<BusinessFunction> = self
            .read()?
            .business_functions
            .iter()
            .filter(|f| erp_ids.contains(&f.erp_id))
            .cloned()
            .collect();
        sort_by_name(&mut functions);
        Ok(functions)
    }

    async fn create_business_function(
        &self,
        function: NewBusinessFunction,
        created_by: Option<Id>,
    ) -> Result<BusinessFunction> {
        let mut tables = self.tables.write();
        if !tables.erp_systems.iter().any(|e| e.id == function.erp_id) {
            return Err(anyhow!("ERP system {} does not exist", function.erp_id));
        }
        if tables
            .business_functions
            .iter()
            .any(|f| f.erp_id == function.erp_id && f.code == function.code)
        {
            return Err(anyhow!(
                "function code '{}' already used by ERP system {}",
                function.code,
                function.erp_id
            ));
        }

        let timestamp = now();
        let row = BusinessFunction {
            id: tables.allocate_id(),
            erp_id: function.erp_id,
            code: function.code,
            name: function.name,
            description: function.description,
            icon: function.icon,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.business_functions.push(row.clone());
        Ok(row)
    }
}

#[async_trait::async_trait]
impl ArtifactTypeStore for MemoryStore {
    async fn get_artifact_type(&self, id: Id) -> Result<Option<ArtifactType>> {
        Ok(self.read()?.artifact_types.iter().find(|t| t.id == id).cloned())
    }

    async fn list_artifact_types(&self) -> Result<Vec<ArtifactType>> {
        let mut types = self.read()?.artifact_types.clone();
        types.sort_by_key(|t| t.id);
        Ok(types)
    }

    async fn get_artifact_type_by_code(&self, code: &str) -> Result<Option<ArtifactType>> {
        Ok(self
            .read()?
            .artifact_types
            .iter()
            .find(|t| t.code == code)
            .cloned())
    }

    async fn seed_artifact_types(&self, seeds: &[ArtifactTypeSeed]) -> Result<Vec<ArtifactType>> {
        let mut tables = self.tables.write();
        let mut inserted = Vec::new();

        for seed in seeds {
            if tables.artifact_types.iter().any(|t| t.code == seed.code.as_str()) {
                continue;
            }
            let row = ArtifactType {
                id: tables.allocate_id(),
                code: seed.code.as_str().to_string(),
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                icon: Some(seed.icon.to_string()),
            };
            tables.artifact_types.push(row.clone());
            inserted.push(row);
        }

        Ok(inserted)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryStore {
    async fn get_artifact(&self, id: Id) -> Result<Option<ArtifactDetail>> {
        let tables = self.read()?;
        let Some(artifact) = tables.artifacts.iter().find(|a| a.id == id).cloned() else {
            return Ok(None);
        };

        let function = tables
            .business_functions
            .iter()
            .find(|f| f.id == artifact.function_id);

        Ok(Some(ArtifactDetail {
            function_name: function.map(|f| f.name.clone()),
            function_code: function.map(|f| f.code.clone()),
            artifact,
        }))
    }

    async fn list_artifacts(&self, function_id: Id, artifact_type_id: Id) -> Result<Vec<Artifact>> {
        let mut artifacts: Vec<Artifact> = self
            .read()?
            .artifacts
            .iter()
            .filter(|a| a.function_id == function_id && a.artifact_type_id == artifact_type_id)
            .cloned()
            .collect();
        artifacts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        Ok(artifacts)
    }

    async fn count_artifacts_by_function(
        &self,
        function_ids: &[Id],
    ) -> Result<Vec<ArtifactGroupCount>> {
        let tables = self.read()?;
        let wanted: HashSet<Id> = function_ids.iter().copied().collect();

        Ok(tables
            .artifacts
            .iter()
            .filter(|a| wanted.contains(&a.function_id))
            .counts_by(|a| (a.function_id, a.artifact_type_id))
            .into_iter()
            .map(|((function_id, artifact_type_id), count)| ArtifactGroupCount {
                function_id,
                artifact_type_id,
                count: count as i64,
            })
            .collect())
    }

    async fn create_artifact(&self, artifact: NewArtifact) -> Result<Artifact> {
        let mut tables = self.tables.write();
        if !tables
            .business_functions
            .iter()
            .any(|f| f.id == artifact.function_id)
        {
            return Err(anyhow!(
                "business function {} does not exist",
                artifact.function_id
            ));
        }
        if !tables
            .artifact_types
            .iter()
            .any(|t| t.id == artifact.artifact_type_id)
        {
            return Err(anyhow!(
                "artifact type {} does not exist",
                artifact.artifact_type_id
            ));
        }

        let timestamp = now();
        let row = Artifact {
            id: tables.allocate_id(),
            function_id: artifact.function_id,
            artifact_type_id: artifact.artifact_type_id,
            name: artifact.name,
            description: artifact.description,
            content: artifact.content,
            created_by: artifact.created_by,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.artifacts.push(row.clone());
        Ok(row)
    }

    async fn update_artifact(&self, id: Id, update: ArtifactUpdate) -> Result<Option<Artifact>> {
        let mut tables = self.tables.write();
        let Some(artifact) = tables.artifacts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            artifact.name = name;
        }
        if let Some(description) = update.description {
            artifact.description = Some(description);
        }
        if let Some(content) = update.content {
            artifact.content = content;
        }
        artifact.updated_at = now();
        Ok(Some(artifact.clone()))
    }

    async fn delete_artifact(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.artifacts.len();
        tables.artifacts.retain(|a| a.id != id);
        Ok(tables.artifacts.len() != before)
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactTypeCode;

    fn client_fields(code: &str, name: &str) -> ClientFields {
        ClientFields {
            code: code.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_client_code_is_conflict() {
        let store = MemoryStore::new();
        store.create_client(client_fields("C1", "Acme"), None).await.unwrap();

        let err = store
            .create_client(client_fields("C1", "Other"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            CatalogError::from(err),
            CatalogError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_client_cascades() {
        let store = MemoryStore::new();
        store
            .seed_artifact_types(&[ArtifactTypeCode::Diagrams.seed()])
            .await
            .unwrap();
        let diagrams = store.get_artifact_type_by_code("diagrams").await.unwrap().unwrap();

        let client = store.create_client(client_fields("C1", "Acme"), None).await.unwrap();
        let company = store
            .create_company(
                NewCompany {
                    client_id: client.id,
                    code: "CO1".to_string(),
                    name: "Acme EU".to_string(),
                    description: None,
                    location: None,
                },
                None,
            )
            .await
            .unwrap();
        let erp = store
            .create_erp_system(
                NewErpSystem {
                    company_id: company.id,
                    code: "ERP1".to_string(),
                    name: "SAP".to_string(),
                    description: None,
                    vendor: None,
                    version: None,
                    environment: None,
                },
                None,
            )
            .await
            .unwrap();
        let function = store
            .create_business_function(
                NewBusinessFunction {
                    erp_id: erp.id,
                    code: "BF1".to_string(),
                    name: "Finance".to_string(),
                    description: None,
                    icon: None,
                },
                None,
            )
            .await
            .unwrap();
        let artifact = store
            .create_artifact(NewArtifact {
                function_id: function.id,
                artifact_type_id: diagrams.id,
                name: "GL".to_string(),
                description: None,
                content: serde_json::json!({}),
                created_by: None,
            })
            .await
            .unwrap();

        assert!(store.delete_client(client.id).await.unwrap());
        assert!(store.get_company(company.id).await.unwrap().is_none());
        assert!(store.get_erp_system(erp.id).await.unwrap().is_none());
        assert!(store.get_business_function(function.id).await.unwrap().is_none());
        assert!(store.get_artifact(artifact.id).await.unwrap().is_none());
        // reference data is not owned by the hierarchy
        assert!(store.get_artifact_type(diagrams.id).await.unwrap().is_some());

        assert!(!store.delete_client(client.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_seeding_artifact_types_is_idempotent() {
        let store = MemoryStore::new();
        let seeds: Vec<_> = ArtifactTypeCode::ALL.iter().map(|c| c.seed()).collect();

        let first = store.seed_artifact_types(&seeds).await.unwrap();
        let second = store.seed_artifact_types(&seeds).await.unwrap();

        assert_eq!(first.len(), 6);
        assert!(second.is_empty());

        let codes: Vec<String> = store
            .list_artifact_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.code)
            .collect();
        assert_eq!(
            codes,
            vec!["diagrams", "models", "mappings", "validations", "documentation", "metadata"]
        );
    }

    #[tokio::test]
    async fn test_company_listing_orders_by_name_then_id() {
        let store = MemoryStore::new();
        let client = store.create_client(client_fields("C1", "Acme"), None).await.unwrap();

        for (code, name) in [("Z", "Zeta"), ("B2", "Beta"), ("A", "Alpha"), ("B1", "Beta")] {
            store
                .create_company(
                    NewCompany {
                        client_id: client.id,
                        code: code.to_string(),
                        name: name.to_string(),
                        description: None,
                        location: None,
                    },
                    None,
                )
                .await
                .unwrap();
        }

        let codes: Vec<String> = store
            .list_companies(client.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["A", "B2", "B1", "Z"]);
    }

    #[tokio::test]
    async fn test_failed_reads_until_restored() {
        let store = MemoryStore::new();
        store.create_client(client_fields("C1", "Acme"), None).await.unwrap();

        store.fail_reads_after(1);
        assert_eq!(store.list_clients().await.unwrap().len(), 1);
        let err = store.list_clients().await.unwrap_err();
        assert!(matches!(
            CatalogError::from(err),
            CatalogError::StoreUnavailable(_)
        ));
        // writes keep working while reads fail
        store.create_client(client_fields("C2", "Beta"), None).await.unwrap();

        store.restore_reads();
        assert_eq!(store.list_clients().await.unwrap().len(), 2);
    }
}
