use std::collections::HashMap;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{ArtifactCounts, ArtifactTypeCode, Id};
use crate::store::traits::Store;

/// Per-function artifact counts, keyed by artifact type code.
pub struct ArtifactCountAggregator;

impl ArtifactCountAggregator {
    /// Count artifacts for every function in `function_ids`.
    ///
    /// Issues two reads regardless of how many functions are asked for: the
    /// artifact type table and one grouped count over the whole id set. Every
    /// requested function is present in the result with all six codes, so a
    /// function without diagrams reports `diagrams: 0` instead of omitting it.
    /// Groups whose type id does not resolve to one of the fixed codes are
    /// dropped.
    pub async fn counts_by_function<S: Store>(
        store: &S,
        function_ids: &[Id],
    ) -> CatalogResult<HashMap<Id, ArtifactCounts>> {
        let mut counts: HashMap<Id, ArtifactCounts> = function_ids
            .iter()
            .map(|id| (*id, ArtifactCounts::default()))
            .collect();

        if function_ids.is_empty() {
            return Ok(counts);
        }

        let (artifact_types, groups) = tokio::try_join!(
            store.list_artifact_types(),
            store.count_artifacts_by_function(function_ids)
        )?;

        let codes_by_type_id: HashMap<Id, ArtifactTypeCode> = artifact_types
            .iter()
            .filter_map(|artifact_type| match artifact_type.type_code() {
                Some(code) => Some((artifact_type.id, code)),
                None => {
                    log::debug!(
                        "Ignoring artifact type {} with unrecognised code '{}'",
                        artifact_type.id,
                        artifact_type.code
                    );
                    None
                }
            })
            .collect();

        for group in groups {
            let Some(code) = codes_by_type_id.get(&group.artifact_type_id) else {
                log::warn!(
                    "{}",
                    CatalogError::InvalidReference {
                        entity: "artifacts of business function",
                        id: group.function_id,
                        parent: "artifact type",
                        parent_id: group.artifact_type_id,
                    }
                );
                continue;
            };

            match counts.get_mut(&group.function_id) {
                Some(function_counts) => function_counts.add(*code, group.count),
                None => log::debug!(
                    "Store returned counts for unrequested business function {}",
                    group.function_id
                ),
            }
        }

        Ok(counts)
    }
}
