use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::model::{
    ArtifactType, ArtifactTypeCode, ClientFields, Id, NewArtifact, NewBusinessFunction,
    NewCompany, NewErpSystem,
};
use crate::store::traits::Store;

const DEMO_CLIENT_CODE: &str = "ACME";

/// Insert the fixed artifact type rows. Existing codes are left untouched,
/// so this runs on every startup.
pub async fn seed_artifact_types<S: Store>(store: &S) -> Result<Vec<ArtifactType>> {
    let seeds: Vec<_> = ArtifactTypeCode::ALL.iter().map(|code| code.seed()).collect();
    let inserted = store.seed_artifact_types(&seeds).await?;

    if inserted.is_empty() {
        log::debug!("Artifact types already present");
    } else {
        log::info!("Seeded {} artifact types", inserted.len());
    }

    Ok(inserted)
}

/// Two-entity canvas used by the demo diagram
fn customer_order_canvas() -> Value {
    json!({
        "nodes": [
            {
                "id": "1",
                "type": "entity",
                "position": { "x": 100, "y": 100 },
                "data": {
                    "name": "Customer",
                    "description": "Customer master data",
                    "columns": [
                        { "name": "customer_id", "type": "INTEGER", "isPrimaryKey": true, "isNullable": false },
                        { "name": "first_name", "type": "VARCHAR(50)", "isPrimaryKey": false, "isNullable": false },
                        { "name": "email", "type": "VARCHAR(100)", "isPrimaryKey": false, "isNullable": false }
                    ]
                }
            },
            {
                "id": "2",
                "type": "entity",
                "position": { "x": 500, "y": 100 },
                "data": {
                    "name": "Order",
                    "description": "Sales orders",
                    "columns": [
                        { "name": "order_id", "type": "INTEGER", "isPrimaryKey": true, "isNullable": false },
                        { "name": "customer_id", "type": "INTEGER", "isForeignKey": true, "isNullable": false },
                        { "name": "order_date", "type": "DATE", "isPrimaryKey": false, "isNullable": false }
                    ]
                }
            }
        ],
        "edges": [
            {
                "id": "e1-2",
                "source": "1",
                "target": "2",
                "type": "relationship",
                "data": { "cardinality": "1:N", "type": "identifying", "name": "places" }
            }
        ]
    })
}

/// Load a small demo catalog: one client down to two diagrams.
///
/// Skipped when the demo client already exists.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    let existing = store.list_clients().await?;
    if existing.iter().any(|c| c.code == DEMO_CLIENT_CODE) {
        log::info!("Demo client {} already present, skipping seed", DEMO_CLIENT_CODE);
        return Ok(());
    }

    seed_artifact_types(store).await?;
    let diagram_type = store
        .get_artifact_type_by_code(ArtifactTypeCode::Diagrams.as_str())
        .await?
        .context("diagrams artifact type missing after seeding")?;

    let client = store
        .create_client(
            ClientFields {
                code: DEMO_CLIENT_CODE.to_string(),
                name: "Acme Corporation".to_string(),
                description: Some("Demo client".to_string()),
            },
            None,
        )
        .await?;

    let company = store
        .create_company(
            NewCompany {
                client_id: client.id,
                code: "ACME-EU".to_string(),
                name: "Acme Europe".to_string(),
                description: None,
                location: Some("Stockholm".to_string()),
            },
            None,
        )
        .await?;

    let erp = store
        .create_erp_system(
            NewErpSystem {
                company_id: company.id,
                code: "SAP-PRD".to_string(),
                name: "SAP S/4HANA".to_string(),
                description: Some("Production ERP".to_string()),
                vendor: Some("SAP".to_string()),
                version: Some("2023".to_string()),
                environment: Some("production".to_string()),
            },
            None,
        )
        .await?;

    let mut function_ids: Vec<Id> = Vec::new();
    for (code, name, icon) in [
        ("FIN", "Finance", "💰"),
        ("SCM", "Supply Chain", "🚚"),
        ("SD", "Sales", "🛒"),
    ] {
        let function = store
            .create_business_function(
                NewBusinessFunction {
                    erp_id: erp.id,
                    code: code.to_string(),
                    name: name.to_string(),
                    description: None,
                    icon: Some(icon.to_string()),
                },
                None,
            )
            .await?;
        function_ids.push(function.id);
    }

    let finance = function_ids[0];
    for (name, description, content) in [
        (
            "Customer Order Model",
            "Basic customer and order entities",
            customer_order_canvas(),
        ),
        (
            "Financial Transactions",
            "GL and AP/AR data model",
            json!({ "nodes": [], "edges": [] }),
        ),
    ] {
        store
            .create_artifact(NewArtifact {
                function_id: finance,
                artifact_type_id: diagram_type.id,
                name: name.to_string(),
                description: Some(description.to_string()),
                content,
                created_by: None,
            })
            .await?;
    }

    log::info!(
        "Loaded demo client {} with {} business functions",
        client.code,
        function_ids.len()
    );
    Ok(())
}
