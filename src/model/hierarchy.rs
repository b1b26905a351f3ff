//! Materialized hierarchy documents.
//!
//! These are the read models produced by the hierarchy engine. They carry no
//! audit columns and serialize with the camelCase child-list keys the UI
//! consumes (`erpSystems`, `businessFunctions`). Child lists are plain `Vec`s
//! so an empty branch always serializes as `[]`.

use crate::model::{ArtifactTypeCode, BusinessFunction, Client, Company, ErpSystem, Id};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCount {
    pub count: i64,
}

/// Per-type artifact counts of one business function; every code is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCounts {
    pub diagrams: ArtifactCount,
    pub models: ArtifactCount,
    pub mappings: ArtifactCount,
    pub validations: ArtifactCount,
    pub documentation: ArtifactCount,
    #[serde(rename = "businessMetadata")]
    pub metadata: ArtifactCount,
}

impl ArtifactCounts {
    fn slot_mut(&mut self, code: ArtifactTypeCode) -> &mut ArtifactCount {
        match code {
            ArtifactTypeCode::Diagrams => &mut self.diagrams,
            ArtifactTypeCode::Models => &mut self.models,
            ArtifactTypeCode::Mappings => &mut self.mappings,
            ArtifactTypeCode::Validations => &mut self.validations,
            ArtifactTypeCode::Documentation => &mut self.documentation,
            ArtifactTypeCode::Metadata => &mut self.metadata,
        }
    }

    pub fn get(&self, code: ArtifactTypeCode) -> i64 {
        match code {
            ArtifactTypeCode::Diagrams => self.diagrams.count,
            ArtifactTypeCode::Models => self.models.count,
            ArtifactTypeCode::Mappings => self.mappings.count,
            ArtifactTypeCode::Validations => self.validations.count,
            ArtifactTypeCode::Documentation => self.documentation.count,
            ArtifactTypeCode::Metadata => self.metadata.count,
        }
    }

    pub fn add(&mut self, code: ArtifactTypeCode, count: i64) {
        self.slot_mut(code).count += count;
    }

    pub fn total(&self) -> i64 {
        ArtifactTypeCode::ALL.iter().map(|code| self.get(*code)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFunctionNode {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub artifacts: ArtifactCounts,
}

impl BusinessFunctionNode {
    pub fn new(function: BusinessFunction, artifacts: ArtifactCounts) -> Self {
        Self {
            id: function.id,
            code: function.code,
            name: function.name,
            description: function.description,
            icon: function.icon,
            artifacts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErpSystemNode {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub environment: Option<String>,
    pub business_functions: Vec<BusinessFunctionNode>,
}

impl ErpSystemNode {
    pub fn new(erp: ErpSystem, business_functions: Vec<BusinessFunctionNode>) -> Self {
        Self {
            id: erp.id,
            code: erp.code,
            name: erp.name,
            description: erp.description,
            vendor: erp.vendor,
            version: erp.version,
            environment: erp.environment,
            business_functions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyNode {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub erp_systems: Vec<ErpSystemNode>,
}

impl CompanyNode {
    pub fn new(company: Company, erp_systems: Vec<ErpSystemNode>) -> Self {
        Self {
            id: company.id,
            code: company.code,
            name: company.name,
            description: company.description,
            location: company.location,
            erp_systems,
        }
    }
}

/// Fully materialized tree rooted at one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientHierarchy {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub companies: Vec<CompanyNode>,
}

impl ClientHierarchy {
    pub fn new(client: Client, companies: Vec<CompanyNode>) -> Self {
        Self {
            id: client.id,
            code: client.code,
            name: client.name,
            description: client.description,
            companies,
        }
    }

    /// Every business function in the tree, in document order
    pub fn business_functions(&self) -> impl Iterator<Item = &BusinessFunctionNode> {
        self.companies
            .iter()
            .flat_map(|company| company.erp_systems.iter())
            .flat_map(|erp| erp.business_functions.iter())
    }
}

/// Company entry of the shallow client listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub location: Option<String>,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            code: company.code,
            name: company.name,
            location: company.location,
        }
    }
}

/// Client with only its direct companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub companies: Vec<CompanySummary>,
}

impl ClientSummary {
    pub fn new(client: Client, companies: Vec<CompanySummary>) -> Self {
        Self {
            id: client.id,
            code: client.code,
            name: client.name,
            description: client.description,
            companies,
        }
    }
}
