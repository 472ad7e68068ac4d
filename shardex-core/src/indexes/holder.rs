/// Shared registry of index managers, keyed by entity type and shard identifier.
///
/// Lookups are idempotent: asking twice for the same (entity, shard) pair yields the
/// same manager instance. Creation happens under the write lock, so re-entrant setup
/// never produces duplicates. The derived index name is only a label handed to the
/// factory; two pairs rendering the same name still get distinct managers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::core::errors::Result;
use crate::core::properties::Properties;
use crate::indexes::context::{BuildContext, EntityType};
use crate::indexes::manager::IndexManager;

/// Registry key: entity type plus shard identifier (`None` when unsharded)
type ShardSlot = (EntityType, Option<String>);

#[derive(Debug, Default)]
pub struct IndexManagerHolder {
    managers: Arc<RwLock<HashMap<ShardSlot, Arc<dyn IndexManager>>>>,
}

impl IndexManagerHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index name for a shard: the entity name, suffixed with `.<shard>` when sharded.
    pub fn index_name(entity_type: &EntityType, shard_identifier: Option<&str>) -> String {
        match shard_identifier {
            Some(shard) => format!("{}.{}", entity_type.name(), shard),
            None => entity_type.name().to_string(),
        }
    }

    pub fn get_or_create_index_manager(
        &self,
        shard_identifier: Option<&str>,
        properties: &Properties,
        entity_type: &EntityType,
        context: &BuildContext,
    ) -> Result<Arc<dyn IndexManager>> {
        let slot: ShardSlot = (entity_type.clone(), shard_identifier.map(str::to_string));

        if let Some(existing) = self.managers.read().get(&slot) {
            debug!(index = existing.index_name(), "Reusing existing index manager");
            return Ok(Arc::clone(existing));
        }

        let mut managers = self.managers.write();
        if let Some(existing) = managers.get(&slot) {
            return Ok(Arc::clone(existing));
        }

        let index_name = Self::index_name(entity_type, shard_identifier);
        let manager = context
            .index_manager_factory
            .create_index_manager(&index_name, properties)?;
        managers.insert(slot, Arc::clone(&manager));
        info!(index = %index_name, entity = %entity_type, "Index manager created");

        Ok(manager)
    }

    pub fn get(
        &self,
        entity_type: &EntityType,
        shard_identifier: Option<&str>,
    ) -> Option<Arc<dyn IndexManager>> {
        let slot: ShardSlot = (entity_type.clone(), shard_identifier.map(str::to_string));
        self.managers.read().get(&slot).cloned()
    }

    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .managers
            .read()
            .values()
            .map(|m| m.index_name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.managers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.read().is_empty()
    }
}
