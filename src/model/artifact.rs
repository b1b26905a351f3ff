use crate::model::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of artifact categories.
///
/// The `artifact_types` table maps row ids onto these codes, but membership is
/// closed: every business function reports a count for each variant, zero or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactTypeCode {
    Diagrams,
    Models,
    Mappings,
    Validations,
    Documentation,
    Metadata,
}

impl ArtifactTypeCode {
    /// Seed order, which is also the id order of a freshly seeded table
    pub const ALL: [ArtifactTypeCode; 6] = [
        ArtifactTypeCode::Diagrams,
        ArtifactTypeCode::Models,
        ArtifactTypeCode::Mappings,
        ArtifactTypeCode::Validations,
        ArtifactTypeCode::Documentation,
        ArtifactTypeCode::Metadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactTypeCode::Diagrams => "diagrams",
            ArtifactTypeCode::Models => "models",
            ArtifactTypeCode::Mappings => "mappings",
            ArtifactTypeCode::Validations => "validations",
            ArtifactTypeCode::Documentation => "documentation",
            ArtifactTypeCode::Metadata => "metadata",
        }
    }

    /// Reference row inserted for this code when seeding
    pub fn seed(&self) -> ArtifactTypeSeed {
        let (name, description, icon) = match self {
            ArtifactTypeCode::Diagrams => (
                "Data Model Diagrams",
                "Visual ER diagrams and data models",
                "📊",
            ),
            ArtifactTypeCode::Models => (
                "Data Models",
                "Structured data models and schemas",
                "🗂️",
            ),
            ArtifactTypeCode::Mappings => (
                "S2T Mappings",
                "Source-to-target field mappings",
                "🔄",
            ),
            ArtifactTypeCode::Validations => (
                "Data Validations",
                "Data quality rules and validations",
                "✅",
            ),
            ArtifactTypeCode::Documentation => (
                "Documentation",
                "Technical documentation and guides",
                "📚",
            ),
            ArtifactTypeCode::Metadata => (
                "Business Metadata",
                "Business glossary and metadata",
                "🏷️",
            ),
        };

        ArtifactTypeSeed {
            code: *self,
            name,
            description,
            icon,
        }
    }
}

impl fmt::Display for ArtifactTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactTypeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactTypeCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown artifact type code '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactTypeSeed {
    pub code: ArtifactTypeCode,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Row of the `artifact_types` reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtifactType {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl ArtifactType {
    /// `None` when the table holds a code outside the fixed set
    pub fn type_code(&self) -> Option<ArtifactTypeCode> {
        self.code.parse().ok()
    }
}

/// A modeling artifact. `content` is stored and returned untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artifact {
    pub id: Id,
    pub function_id: Id,
    pub artifact_type_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub content: serde_json::Value,
    pub created_by: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Artifact together with the business function it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDetail {
    #[serde(flatten)]
    pub artifact: Artifact,
    pub function_name: Option<String>,
    pub function_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArtifact {
    pub function_id: Id,
    pub artifact_type_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub content: serde_json::Value,
    pub created_by: Option<Id>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
}

/// Request body for creating a diagram under a business function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDiagram {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
}

/// Request body for replacing a diagram's canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramContent {
    pub nodes: Option<serde_json::Value>,
    pub edges: Option<serde_json::Value>,
}

/// One group of the `(function_id, artifact_type_id)` count query
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ArtifactGroupCount {
    pub function_id: Id,
    pub artifact_type_id: Id,
    pub count: i64,
}
