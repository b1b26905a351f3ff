use std::collections::HashSet;

use crate::error::CatalogResult;
use crate::logic::materialize::{group_by_parent, ids_of, HierarchyMaterializer};
use crate::model::{sort_by_name, ClientHierarchy, ClientSummary, CompanySummary, Id};
use crate::store::traits::Store;

/// Read operations behind the `/api/hierarchy` endpoints
pub struct HierarchyService;

impl HierarchyService {
    /// Full Company → ERP system → business function tree of one client.
    ///
    /// A client without descendants is returned with `companies: []`; only a
    /// missing client is `NotFound`.
    pub async fn get_client_hierarchy<S: Store>(
        store: &S,
        client_id: Id,
    ) -> CatalogResult<ClientHierarchy> {
        HierarchyMaterializer::materialize_client(store, client_id).await
    }

    /// Every client with its direct companies only.
    ///
    /// Two reads, never touches ERP systems, functions or artifact counts.
    pub async fn get_all_clients_with_companies<S: Store>(
        store: &S,
    ) -> CatalogResult<Vec<ClientSummary>> {
        let mut clients = store.list_clients().await?;
        sort_by_name(&mut clients);

        let companies = store.list_companies_for_clients(&ids_of(&clients)).await?;
        let client_ids: HashSet<Id> = clients.iter().map(|c| c.id).collect();
        let mut companies_by_client = group_by_parent(
            companies,
            &client_ids,
            |c| c.client_id,
            ("company", "client"),
        );

        Ok(clients
            .into_iter()
            .map(|client| {
                let companies = companies_by_client
                    .remove(&client.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(CompanySummary::from)
                    .collect();
                ClientSummary::new(client, companies)
            })
            .collect())
    }
}
