use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Row};

use crate::error::CatalogError;
use crate::model::{
    Artifact, ArtifactDetail, ArtifactGroupCount, ArtifactType, ArtifactTypeSeed, ArtifactUpdate,
    BusinessFunction, Client, ClientFields, ClientListing, Company, ErpSystem, Id, NewArtifact,
    NewBusinessFunction, NewCompany, NewErpSystem,
};
use crate::store::traits::{
    ArtifactStore, ArtifactTypeStore, BusinessFunctionStore, ClientStore, CompanyStore,
    ErpSystemStore, Store,
};

const CLIENT_COLUMNS: &str = "id, code, name, description, created_by, created_at, updated_at";
const COMPANY_COLUMNS: &str =
    "id, client_id, code, name, description, location, created_by, created_at, updated_at";
const ERP_COLUMNS: &str = "id, company_id, code, name, description, vendor, version, environment, created_by, created_at, updated_at";
const FUNCTION_COLUMNS: &str =
    "id, erp_id, code, name, description, icon, created_by, created_at, updated_at";
const ARTIFACT_COLUMNS: &str = "id, function_id, artifact_type_id, name, description, content, created_by, created_at, updated_at";

/// Case-insensitive name order, matching `sort_by_name`
const NAME_ORDER: &str = "LOWER(name), name COLLATE \"C\", id";

/// Unique constraint PostgreSQL generates for `clients.code`
const CLIENT_CODE_CONSTRAINT: &str = "clients_code_key";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_constraint_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

#[async_trait::async_trait]
impl ClientStore for PostgresStore {
    async fn get_client(&self, id: Id) -> Result<Option<Client>> {
        let query = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch client")
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        let query = format!(
            "SELECT {} FROM clients ORDER BY {}",
            CLIENT_COLUMNS, NAME_ORDER
        );
        sqlx::query_as::<_, Client>(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list clients")
    }

    async fn list_clients_with_company_count(&self) -> Result<Vec<ClientListing>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.code, c.name, c.description, c.created_by, c.created_at, c.updated_at,
                   COUNT(comp.id) AS company_count
            FROM clients c
            LEFT JOIN companies comp ON comp.client_id = c.id
            GROUP BY c.id
            ORDER BY LOWER(c.name), c.name COLLATE "C", c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list clients")?;

        rows.iter()
            .map(|row| {
                Ok(ClientListing {
                    client: Client::from_row(row)?,
                    company_count: row.try_get("company_count")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .context("Failed to decode client listing")
    }

    async fn create_client(&self, fields: ClientFields, created_by: Option<Id>) -> Result<Client> {
        let query = format!(
            "INSERT INTO clients (code, name, description, created_by) VALUES ($1, $2, $3, $4) RETURNING {}",
            CLIENT_COLUMNS
        );
        let result = sqlx::query_as::<_, Client>(&query)
            .bind(&fields.code)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(client) => Ok(client),
            Err(e) if is_constraint_violation(&e, CLIENT_CODE_CONSTRAINT) => {
                Err(CatalogError::duplicate_client_code().into())
            }
            Err(e) => Err(e).context("Failed to create client"),
        }
    }

    async fn update_client(&self, id: Id, fields: ClientFields) -> Result<Option<Client>> {
        let query = format!(
            "UPDATE clients SET code = $1, name = $2, description = $3, updated_at = NOW() WHERE id = $4 RETURNING {}",
            CLIENT_COLUMNS
        );
        let result = sqlx::query_as::<_, Client>(&query)
            .bind(&fields.code)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(client) => Ok(client),
            Err(e) if is_constraint_violation(&e, CLIENT_CODE_CONSTRAINT) => {
                Err(CatalogError::duplicate_client_code().into())
            }
            Err(e) => Err(e).context("Failed to update client"),
        }
    }

    async fn delete_client(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete client")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl CompanyStore for PostgresStore {
    async fn get_company(&self, id: Id) -> Result<Option<Company>> {
        let query = format!("SELECT {} FROM companies WHERE id = $1", COMPANY_COLUMNS);
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch company")
    }

    async fn list_companies(&self, client_id: Id) -> Result<Vec<Company>> {
        self.list_companies_for_clients(&[client_id]).await
    }

    async fn list_companies_for_clients(&self, client_ids: &[Id]) -> Result<Vec<Company>> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM companies WHERE client_id = ANY($1) ORDER BY {}",
            COMPANY_COLUMNS, NAME_ORDER
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(client_ids)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list companies")
    }

    async fn create_company(&self, company: NewCompany, created_by: Option<Id>) -> Result<Company> {
        let query = format!(
            "INSERT INTO companies (client_id, code, name, description, location, created_by) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COMPANY_COLUMNS
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(company.client_id)
            .bind(&company.code)
            .bind(&company.name)
            .bind(&company.description)
            .bind(&company.location)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create company")
    }
}

#[async_trait::async_trait]
impl ErpSystemStore for PostgresStore {
    async fn get_erp_system(&self, id: Id) -> Result<Option<ErpSystem>> {
        let query = format!("SELECT {} FROM erp_systems WHERE id = $1", ERP_COLUMNS);
        sqlx::query_as::<_, ErpSystem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch ERP system")
    }

    async fn list_erp_systems(&self, company_id: Id) -> Result<Vec<ErpSystem>> {
        self.list_erp_systems_for_companies(&[company_id]).await
    }

    async fn list_erp_systems_for_companies(&self, company_ids: &[Id]) -> Result<Vec<ErpSystem>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM erp_systems WHERE company_id = ANY($1) ORDER BY {}",
            ERP_COLUMNS, NAME_ORDER
        );
        sqlx::query_as::<_, ErpSystem>(&query)
            .bind(company_ids)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list ERP systems")
    }

    async fn create_erp_system(
        &self,
        erp: NewErpSystem,
        created_by: Option<Id>,
    ) -> Result<ErpSystem> {
        let query = format!(
            "INSERT INTO erp_systems (company_id, code, name, description, vendor, version, environment, created_by) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            ERP_COLUMNS
        );
        sqlx::query_as::<_, ErpSystem>(&query)
            .bind(erp.company_id)
            .bind(&erp.code)
            .bind(&erp.name)
            .bind(&erp.description)
            .bind(&erp.vendor)
            .bind(&erp.version)
            .bind(&erp.environment)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create ERP system")
    }
}

#[async_trait::async_trait]
impl BusinessFunctionStore for PostgresStore {
    async fn get_business_function(&self, id: Id) -> Result<Option<BusinessFunction>> {
        let query = format!("SELECT {} FROM business_functions WHERE id = $1", FUNCTION_COLUMNS);
        sqlx::query_as::<_, BusinessFunction>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch business function")
    }

    async fn list_business_functions(&self, erp_id: Id) -> Result<Vec<BusinessFunction>> {
        self.list_business_functions_for_erp_systems(&[erp_id]).await
    }

    async fn list_business_functions_for_erp_systems(
        &self,
        erp_ids: &[Id],
    ) -> Result<Vec<BusinessFunction>> {
        if erp_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM business_functions WHERE erp_id = ANY($1) ORDER BY {}",
            FUNCTION_COLUMNS, NAME_ORDER
        );
        sqlx::query_as::<_, BusinessFunction>(&query)
            .bind(erp_ids)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list business functions")
    }

    async fn create_business_function(
        &self,
        function: NewBusinessFunction,
        created_by: Option<Id>,
    ) -> Result<BusinessFunction> {
        let query = format!(
            "INSERT INTO business_functions (erp_id, code, name, description, icon, created_by) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            FUNCTION_COLUMNS
        );
        sqlx::query_as::<_, BusinessFunction>(&query)
            .bind(function.erp_id)
            .bind(&function.code)
            .bind(&function.name)
            .bind(&function.description)
            .bind(&function.icon)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create business function")
    }
}

#[async_trait::async_trait]
impl ArtifactTypeStore for PostgresStore {
    async fn get_artifact_type(&self, id: Id) -> Result<Option<ArtifactType>> {
        sqlx::query_as::<_, ArtifactType>(
            "SELECT id, code, name, description, icon FROM artifact_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch artifact type")
    }

    async fn list_artifact_types(&self) -> Result<Vec<ArtifactType>> {
        sqlx::query_as::<_, ArtifactType>(
            "SELECT id, code, name, description, icon FROM artifact_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list artifact types")
    }

    async fn get_artifact_type_by_code(&self, code: &str) -> Result<Option<ArtifactType>> {
        sqlx::query_as::<_, ArtifactType>(
            "SELECT id, code, name, description, icon FROM artifact_types WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch artifact type")
    }

    async fn seed_artifact_types(&self, seeds: &[ArtifactTypeSeed]) -> Result<Vec<ArtifactType>> {
        let mut inserted = Vec::new();

        for seed in seeds {
            let row = sqlx::query_as::<_, ArtifactType>(
                r#"
                INSERT INTO artifact_types (code, name, description, icon)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (code) DO NOTHING
                RETURNING id, code, name, description, icon
                "#,
            )
            .bind(seed.code.as_str())
            .bind(seed.name)
            .bind(seed.description)
            .bind(seed.icon)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to seed artifact type '{}'", seed.code))?;

            inserted.extend(row);
        }

        Ok(inserted)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for PostgresStore {
    async fn get_artifact(&self, id: Id) -> Result<Option<ArtifactDetail>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.function_id, a.artifact_type_id, a.name, a.description, a.content,
                   a.created_by, a.created_at, a.updated_at,
                   bf.name AS function_name, bf.code AS function_code
            FROM artifacts a
            LEFT JOIN business_functions bf ON a.function_id = bf.id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch artifact")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(ArtifactDetail {
            artifact: Artifact::from_row(&row).context("Failed to decode artifact")?,
            function_name: row.try_get("function_name")?,
            function_code: row.try_get("function_code")?,
        }))
    }

    async fn list_artifacts(&self, function_id: Id, artifact_type_id: Id) -> Result<Vec<Artifact>> {
        let query = format!(
            "SELECT {} FROM artifacts WHERE function_id = $1 AND artifact_type_id = $2 ORDER BY updated_at DESC, id DESC",
            ARTIFACT_COLUMNS
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(function_id)
            .bind(artifact_type_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list artifacts")
    }

    async fn count_artifacts_by_function(
        &self,
        function_ids: &[Id],
    ) -> Result<Vec<ArtifactGroupCount>> {
        if function_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ArtifactGroupCount>(
            r#"
            SELECT function_id, artifact_type_id, COUNT(*) AS count
            FROM artifacts
            WHERE function_id = ANY($1)
            GROUP BY function_id, artifact_type_id
            "#,
        )
        .bind(function_ids)
        .fetch_all(&self.pool)
        .await
        .context("Failed to count artifacts")
    }

    async fn create_artifact(&self, artifact: NewArtifact) -> Result<Artifact> {
        let query = format!(
            "INSERT INTO artifacts (function_id, artifact_type_id, name, description, content, created_by) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ARTIFACT_COLUMNS
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(artifact.function_id)
            .bind(artifact.artifact_type_id)
            .bind(&artifact.name)
            .bind(&artifact.description)
            .bind(&artifact.content)
            .bind(artifact.created_by)
            .fetch_one(&self.pool)
            .await
            .context("Failed to create artifact")
    }

    async fn update_artifact(&self, id: Id, update: ArtifactUpdate) -> Result<Option<Artifact>> {
        let query = format!(
            r#"
            UPDATE artifacts
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ARTIFACT_COLUMNS
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(&update.name)
            .bind(&update.description)
            .bind(&update.content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update artifact")
    }

    async fn delete_artifact(&self, id: Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete artifact")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
