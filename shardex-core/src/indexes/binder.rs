/// Binding of an entity type to a fixed set of shards.
///
/// The binder runs once per entity at startup. It resolves one index manager per
/// shard through the shared holder, instantiates and initializes the sharding
/// strategy, and produces an immutable `EntityIndexBinding` that routes works.
/// Any error is fatal for the entity being bound.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::errors::{ErrorCode, Result, ShardexError};
use crate::core::properties::{Properties, SHARDING_STRATEGY};
use crate::indexes::context::{BuildContext, EntityType};
use crate::indexes::holder::IndexManagerHolder;
use crate::indexes::manager::IndexManager;
use crate::sharding::catalog::StrategyRef;
use crate::sharding::strategy::{IndexShardingStrategy, ShardOrdinal, ShardTarget};
use crate::workload::work::{Work, WorkType};

/// Decision returned by an interceptor for a single work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingOverride {
    /// Keep the work as is
    ApplyDefault,
    /// Drop the work
    Skip,
    /// Turn the work into an update (upsert)
    Update,
    /// Turn the work into a delete
    Remove,
}

/// Hook letting an entity veto or rewrite works before routing.
pub trait IndexingInterceptor: Send + Sync {
    fn on_add(&self, _work: &Work) -> IndexingOverride {
        IndexingOverride::ApplyDefault
    }

    fn on_update(&self, _work: &Work) -> IndexingOverride {
        IndexingOverride::ApplyDefault
    }

    fn on_delete(&self, _work: &Work) -> IndexingOverride {
        IndexingOverride::ApplyDefault
    }
}

/// A work addressed to one shard of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedWork {
    pub shard: ShardOrdinal,
    pub work: Work,
}

pub trait EntityIndexBinder {
    fn bind(
        &self,
        holder: &IndexManagerHolder,
        entity_type: &EntityType,
        interceptor: Option<Arc<dyn IndexingInterceptor>>,
        context: &BuildContext,
    ) -> Result<EntityIndexBinding>;
}

/// Binder for a shard layout fixed at configuration time.
#[derive(Debug, Clone)]
pub struct NonDynamicShardingBinder {
    strategy: StrategyRef,
    shard_properties: Vec<Properties>,
}

impl NonDynamicShardingBinder {
    pub fn new(strategy: StrategyRef, shard_properties: Vec<Properties>) -> Self {
        Self {
            strategy,
            shard_properties,
        }
    }

    /// Build from the flat configuration of `index_name`.
    ///
    /// The strategy is read from the `sharding_strategy` key of the first shard and
    /// defaults to no sharding for one shard, id hashing otherwise.
    pub fn from_properties(index_name: &str, properties: &Properties) -> Result<Self> {
        let shard_properties = properties.shard_bundles(index_name)?;
        let strategy = shard_properties
            .first()
            .and_then(|first| first.get(SHARDING_STRATEGY))
            .map(StrategyRef::new)
            .unwrap_or_else(|| StrategyRef::default_for(shard_properties.len()));
        Ok(Self::new(strategy, shard_properties))
    }

    pub fn strategy(&self) -> &StrategyRef {
        &self.strategy
    }

    pub fn shard_count(&self) -> usize {
        self.shard_properties.len()
    }

    fn pre_initialize_index_managers(
        &self,
        holder: &IndexManagerHolder,
        entity_type: &EntityType,
        context: &BuildContext,
    ) -> Result<Vec<Arc<dyn IndexManager>>> {
        let nbr_of_index_managers = self.shard_properties.len();
        let mut index_managers = Vec::with_capacity(nbr_of_index_managers);
        for (index, index_props) in self.shard_properties.iter().enumerate() {
            let shard_identifier = (nbr_of_index_managers > 1).then(|| index.to_string());
            let manager = holder.get_or_create_index_manager(
                shard_identifier.as_deref(),
                index_props,
                entity_type,
                context,
            )?;
            index_managers.push(manager);
        }
        Ok(index_managers)
    }
}

impl EntityIndexBinder for NonDynamicShardingBinder {
    fn bind(
        &self,
        holder: &IndexManagerHolder,
        entity_type: &EntityType,
        interceptor: Option<Arc<dyn IndexingInterceptor>>,
        context: &BuildContext,
    ) -> Result<EntityIndexBinding> {
        if self.shard_properties.is_empty() {
            return Err(ShardexError::entity_with_no_shard(entity_type.name()));
        }
        let mut sharding_strategy = context.strategies.instantiate(&self.strategy)?;
        let index_managers = self.pre_initialize_index_managers(holder, entity_type, context)?;

        let masked_properties = self.shard_properties[0].masked(SHARDING_STRATEGY);
        sharding_strategy.initialize(&masked_properties, &index_managers)?;

        info!(
            entity = %entity_type,
            strategy = %self.strategy,
            shards = index_managers.len(),
            "Entity bound to index managers"
        );

        Ok(EntityIndexBinding {
            entity_type: entity_type.clone(),
            strategy_name: self.strategy.clone(),
            sharding_strategy,
            index_managers,
            interceptor,
        })
    }
}

/// Immutable link between an entity type, its strategy and its shards.
pub struct EntityIndexBinding {
    entity_type: EntityType,
    strategy_name: StrategyRef,
    sharding_strategy: Box<dyn IndexShardingStrategy>,
    index_managers: Vec<Arc<dyn IndexManager>>,
    interceptor: Option<Arc<dyn IndexingInterceptor>>,
}

impl EntityIndexBinding {
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    pub fn sharding_strategy(&self) -> &dyn IndexShardingStrategy {
        self.sharding_strategy.as_ref()
    }

    pub fn index_managers(&self) -> &[Arc<dyn IndexManager>] {
        &self.index_managers
    }

    pub fn interceptor(&self) -> Option<&Arc<dyn IndexingInterceptor>> {
        self.interceptor.as_ref()
    }

    /// Work after the interceptor's verdict, or `None` when skipped.
    fn intercept(&self, work: &Work) -> Option<Work> {
        let Some(interceptor) = &self.interceptor else {
            return Some(work.clone());
        };
        let decision = match work.work_type {
            WorkType::Add => interceptor.on_add(work),
            WorkType::Update => interceptor.on_update(work),
            WorkType::Delete => interceptor.on_delete(work),
        };
        let rewritten = match decision {
            IndexingOverride::ApplyDefault => work.clone(),
            IndexingOverride::Skip => return None,
            IndexingOverride::Update => Work::update(work.payload.clone()),
            IndexingOverride::Remove => Work::delete(work.payload.clone()),
        };
        if decision != IndexingOverride::ApplyDefault {
            debug!(work = %work, override_ = ?decision, "Interceptor overrode work");
        }
        Some(rewritten)
    }

    /// Shards `work` must be dispatched to, after interception.
    pub fn route(&self, work: &Work) -> Vec<RoutedWork> {
        let Some(work) = self.intercept(work) else {
            return Vec::new();
        };
        let id = work.id_string();
        self.sharding_strategy
            .shards_for(ShardTarget::Document(&id))
            .into_iter()
            .map(|shard| RoutedWork {
                shard,
                work: work.clone(),
            })
            .collect()
    }

    /// Route and apply `work`; returns how many shards received it.
    pub fn apply(&self, work: &Work) -> Result<usize> {
        let routed = self.route(work);
        for routed_work in &routed {
            let manager = self.index_managers.get(routed_work.shard).ok_or_else(|| {
                ShardexError::IndexManagerError {
                    code: ErrorCode::ShardOutOfRange,
                    message: format!(
                        "strategy '{}' routed to shard {} of {}",
                        self.strategy_name,
                        routed_work.shard,
                        self.index_managers.len()
                    ),
                }
            })?;
            manager.perform_work(&routed_work.work)?;
        }
        Ok(routed.len())
    }

    /// Broadcast a purge to every shard selected for `ShardTarget::All`.
    pub fn purge_all(&self) {
        for shard in self.sharding_strategy.shards_for(ShardTarget::All) {
            if let Some(manager) = self.index_managers.get(shard) {
                manager.purge_all();
            }
        }
    }

    /// Documents across all shards
    pub fn document_count(&self) -> usize {
        self.index_managers.iter().map(|m| m.document_count()).sum()
    }
}

impl fmt::Debug for EntityIndexBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityIndexBinding")
            .field("entity_type", &self.entity_type)
            .field("strategy", &self.strategy_name)
            .field("index_managers", &self.index_managers)
            .field("intercepted", &self.interceptor.is_some())
            .finish()
    }
}
