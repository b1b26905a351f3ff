use crate::error::{CatalogError, CatalogResult};
use crate::model::{Client, ClientDetail, ClientListing, Id, NewClient, UserContext};
use crate::store::traits::Store;

/// Client maintenance behind `/api/clients`
pub struct ClientOperations;

impl ClientOperations {
    pub async fn list<S: Store>(store: &S) -> CatalogResult<Vec<ClientListing>> {
        Ok(store.list_clients_with_company_count().await?)
    }

    pub async fn get<S: Store>(store: &S, id: Id) -> CatalogResult<ClientDetail> {
        let client = store
            .get_client(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Client"))?;
        let companies = store.list_companies(id).await?;

        Ok(ClientDetail { client, companies })
    }

    pub async fn create<S: Store>(
        store: &S,
        new_client: NewClient,
        user: &UserContext,
    ) -> CatalogResult<Client> {
        let fields = new_client
            .validate()
            .ok_or_else(|| CatalogError::Validation("Code and name are required".to_string()))?;

        Ok(store.create_client(fields, user.user_id).await?)
    }

    pub async fn update<S: Store>(
        store: &S,
        id: Id,
        new_client: NewClient,
    ) -> CatalogResult<Client> {
        let fields = new_client
            .validate()
            .ok_or_else(|| CatalogError::Validation("Code and name are required".to_string()))?;

        store
            .update_client(id, fields)
            .await?
            .ok_or_else(|| CatalogError::not_found("Client"))
    }

    /// Deletes the client and its whole subtree
    pub async fn delete<S: Store>(store: &S, id: Id) -> CatalogResult<()> {
        if store.delete_client(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found("Client"))
        }
    }
}
