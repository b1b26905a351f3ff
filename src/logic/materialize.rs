use itertools::Itertools;
use std::collections::{HashMap, HashSet};

use crate::error::{CatalogError, CatalogResult};
use crate::logic::aggregate::ArtifactCountAggregator;
use crate::model::{
    sort_by_name, ArtifactCounts, BusinessFunction, BusinessFunctionNode, Client, ClientHierarchy,
    Company, CompanyNode, ErpSystem, ErpSystemNode, Id, Named,
};
use crate::store::traits::Store;

/// Builds nested client documents from the normalized tables.
///
/// Traversal is breadth-first with one batched read per level (companies,
/// ERP systems, business functions) and a single aggregator call for the
/// artifact counts, so the number of store round-trips is fixed no matter how
/// wide the tree is. Nothing is written and no transaction is held; a row
/// written between levels may or may not show up.
pub struct HierarchyMaterializer;

/// Rows of every level below the root clients, as fetched from the store
#[derive(Debug, Default)]
pub struct HierarchyRows {
    pub companies: Vec<Company>,
    pub erp_systems: Vec<ErpSystem>,
    pub business_functions: Vec<BusinessFunction>,
    pub artifact_counts: HashMap<Id, ArtifactCounts>,
}

impl HierarchyMaterializer {
    /// Materialize one client, or every client when `root` is `None`
    pub async fn materialize<S: Store>(
        store: &S,
        root: Option<Id>,
    ) -> CatalogResult<Vec<ClientHierarchy>> {
        let clients = match root {
            Some(client_id) => vec![store
                .get_client(client_id)
                .await?
                .ok_or_else(|| CatalogError::not_found("Client"))?],
            None => store.list_clients().await?,
        };

        Self::materialize_clients(store, clients).await
    }

    /// Materialize the tree under a single client
    pub async fn materialize_client<S: Store>(
        store: &S,
        client_id: Id,
    ) -> CatalogResult<ClientHierarchy> {
        Self::materialize(store, Some(client_id))
            .await?
            .pop()
            .ok_or_else(|| CatalogError::not_found("Client"))
    }

    async fn materialize_clients<S: Store>(
        store: &S,
        clients: Vec<Client>,
    ) -> CatalogResult<Vec<ClientHierarchy>> {
        let rows = Self::fetch_rows(store, &ids_of(&clients)).await?;
        log::debug!(
            "Materializing {} clients: {} companies, {} ERP systems, {} business functions",
            clients.len(),
            rows.companies.len(),
            rows.erp_systems.len(),
            rows.business_functions.len()
        );

        Ok(Self::assemble(clients, rows))
    }

    async fn fetch_rows<S: Store>(store: &S, client_ids: &[Id]) -> CatalogResult<HierarchyRows> {
        let companies = store.list_companies_for_clients(client_ids).await?;
        let erp_systems = store
            .list_erp_systems_for_companies(&ids_of(&companies))
            .await?;
        let business_functions = store
            .list_business_functions_for_erp_systems(&ids_of(&erp_systems))
            .await?;
        let artifact_counts =
            ArtifactCountAggregator::counts_by_function(store, &ids_of(&business_functions))
                .await?;

        Ok(HierarchyRows {
            companies,
            erp_systems,
            business_functions,
            artifact_counts,
        })
    }

    /// Nest the fetched rows under their clients, bottom-up.
    ///
    /// Every level is sorted by name then id here, whatever order the store
    /// used. A row whose parent is not among the fetched parents is dropped
    /// together with its subtree and logged as an invalid reference.
    pub fn assemble(mut clients: Vec<Client>, rows: HierarchyRows) -> Vec<ClientHierarchy> {
        let HierarchyRows {
            companies,
            erp_systems,
            business_functions,
            artifact_counts,
        } = rows;

        sort_by_name(&mut clients);

        let erp_ids: HashSet<Id> = erp_systems.iter().map(|e| e.id).collect();
        let mut functions_by_erp = group_by_parent(
            business_functions,
            &erp_ids,
            |f| f.erp_id,
            ("business function", "ERP system"),
        );

        let company_ids: HashSet<Id> = companies.iter().map(|c| c.id).collect();
        let mut erp_systems_by_company = group_by_parent(
            erp_systems,
            &company_ids,
            |e| e.company_id,
            ("ERP system", "company"),
        );

        let client_ids: HashSet<Id> = clients.iter().map(|c| c.id).collect();
        let mut companies_by_client = group_by_parent(
            companies,
            &client_ids,
            |c| c.client_id,
            ("company", "client"),
        );

        let mut documents = Vec::with_capacity(clients.len());
        for client in clients {
            let mut company_nodes = Vec::new();

            for company in companies_by_client.remove(&client.id).unwrap_or_default() {
                let mut erp_nodes = Vec::new();

                for erp in erp_systems_by_company.remove(&company.id).unwrap_or_default() {
                    let function_nodes = functions_by_erp
                        .remove(&erp.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|function| {
                            let counts = artifact_counts
                                .get(&function.id)
                                .copied()
                                .unwrap_or_default();
                            BusinessFunctionNode::new(function, counts)
                        })
                        .collect();

                    erp_nodes.push(ErpSystemNode::new(erp, function_nodes));
                }

                company_nodes.push(CompanyNode::new(company, erp_nodes));
            }

            documents.push(ClientHierarchy::new(client, company_nodes));
        }

        documents
    }
}

pub(crate) fn ids_of<T: Named>(items: &[T]) -> Vec<Id> {
    items.iter().map(|item| item.id()).collect()
}

/// Sort children by name and bucket them under their parent id.
///
/// Children pointing at a parent outside `parent_ids` are skipped with a
/// data-quality warning.
pub(crate) fn group_by_parent<C: Named>(
    mut children: Vec<C>,
    parent_ids: &HashSet<Id>,
    parent_of: fn(&C) -> Id,
    (entity, parent): (&'static str, &'static str),
) -> HashMap<Id, Vec<C>> {
    sort_by_name(&mut children);

    children
        .into_iter()
        .filter(|child| {
            let parent_id = parent_of(child);
            if parent_ids.contains(&parent_id) {
                return true;
            }

            log::warn!(
                "Skipping orphaned node: {}",
                CatalogError::InvalidReference {
                    entity,
                    id: child.id(),
                    parent,
                    parent_id,
                }
            );
            false
        })
        .into_group_map_by(|child| parent_of(child))
}
