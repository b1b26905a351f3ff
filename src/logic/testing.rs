//! Fixtures shared by the logic tests.

use crate::model::{
    ArtifactTypeCode, BusinessFunction, Client, ClientFields, Company, ErpSystem, Id,
    NewArtifact, NewBusinessFunction, NewCompany, NewErpSystem,
};
use crate::store::traits::{
    ArtifactStore, ArtifactTypeStore, BusinessFunctionStore, ClientStore, CompanyStore,
    ErpSystemStore,
};
use crate::store::MemoryStore;

pub async fn seed_artifact_types(store: &MemoryStore) {
    let seeds: Vec<_> = ArtifactTypeCode::ALL.iter().map(|code| code.seed()).collect();
    store.seed_artifact_types(&seeds).await.unwrap();
}

/// Terse constructors for hierarchy rows
pub struct CatalogBuilder<'a> {
    store: &'a MemoryStore,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    pub async fn client(&self, code: &str, name: &str) -> Client {
        self.store
            .create_client(
                ClientFields {
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                },
                None,
            )
            .await
            .unwrap()
    }

    pub async fn company(&self, client_id: Id, code: &str, name: &str) -> Company {
        self.store
            .create_company(
                NewCompany {
                    client_id,
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                    location: Some("Stockholm".to_string()),
                },
                None,
            )
            .await
            .unwrap()
    }

    pub async fn erp_system(&self, company_id: Id, code: &str, name: &str) -> ErpSystem {
        self.store
            .create_erp_system(
                NewErpSystem {
                    company_id,
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                    vendor: Some("SAP".to_string()),
                    version: Some("S/4HANA 2023".to_string()),
                    environment: Some("production".to_string()),
                },
                None,
            )
            .await
            .unwrap()
    }

    pub async fn function(&self, erp_id: Id, code: &str, name: &str) -> BusinessFunction {
        self.store
            .create_business_function(
                NewBusinessFunction {
                    erp_id,
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                    icon: None,
                },
                None,
            )
            .await
            .unwrap()
    }

    /// Adds `n` artifacts of one type to a function
    pub async fn artifacts(&self, function_id: Id, code: ArtifactTypeCode, n: usize) {
        let artifact_type = self
            .store
            .get_artifact_type_by_code(code.as_str())
            .await
            .unwrap()
            .expect("artifact type must be seeded");

        for i in 0..n {
            self.store
                .create_artifact(NewArtifact {
                    function_id,
                    artifact_type_id: artifact_type.id,
                    name: format!("{} {}", code, i + 1),
                    description: None,
                    content: serde_json::json!({}),
                    created_by: None,
                })
                .await
                .unwrap();
        }
    }
}
