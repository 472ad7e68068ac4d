/// Sharding strategies routing index works to physical shards.
///
/// A strategy is constructed empty, then initialized exactly once with the shard
/// configuration and every index manager of the entity. Routing is deterministic
/// for a given id once initialized.

use std::sync::Arc;

use tracing::debug;

use crate::core::errors::{ErrorCode, Result, ShardexError};
use crate::core::properties::{Properties, NBR_OF_SHARDS};
use crate::indexes::manager::IndexManager;

/// Position of a shard inside a binding (0..shard_count)
pub type ShardOrdinal = usize;

/// Routing key with its precomputed hash
#[derive(Debug, Clone)]
pub struct ShardKey {
    pub doc_id: String,
    pub hash: u64,
}

impl ShardKey {
    pub fn new(doc_id: impl Into<String>) -> Self {
        let doc_id = doc_id.into();
        let hash = Self::compute_hash(&doc_id);
        Self { doc_id, hash }
    }

    /// FNV-1a
    fn compute_hash(doc_id: &str) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
        const FNV_PRIME: u64 = 1099511628211;

        let mut hash = FNV_OFFSET_BASIS;
        for byte in doc_id.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    /// Map the key onto `[0, num_shards)`.
    pub fn ordinal(&self, num_shards: usize) -> ShardOrdinal {
        if num_shards <= 1 {
            return 0;
        }
        (self.hash % num_shards as u64) as usize
    }
}

/// What a routing decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardTarget<'a> {
    /// A keyed work on a single document
    Document(&'a str),
    /// Broadcast works (purge-all, queries)
    All,
}

pub trait IndexShardingStrategy: Send + Sync {
    /// Called once, before any routing call.
    fn initialize(
        &mut self,
        properties: &Properties,
        index_managers: &[Arc<dyn IndexManager>],
    ) -> Result<()>;

    /// Shards a work must be dispatched to.
    fn shards_for(&self, target: ShardTarget<'_>) -> Vec<ShardOrdinal>;

    fn shard_count(&self) -> usize;
}

/// Every work goes to the single index manager.
#[derive(Debug, Default)]
pub struct NotShardedStrategy {
    initialized: bool,
}

impl IndexShardingStrategy for NotShardedStrategy {
    fn initialize(
        &mut self,
        _properties: &Properties,
        index_managers: &[Arc<dyn IndexManager>],
    ) -> Result<()> {
        if index_managers.len() != 1 {
            return Err(ShardexError::config(
                ErrorCode::StrategyInitFailed,
                format!(
                    "NotShardedStrategy expects exactly one index manager, got {}",
                    index_managers.len()
                ),
            ));
        }
        self.initialized = true;
        Ok(())
    }

    fn shards_for(&self, _target: ShardTarget<'_>) -> Vec<ShardOrdinal> {
        vec![0]
    }

    fn shard_count(&self) -> usize {
        1
    }
}

/// Static N-shard layout, keyed works routed by id hash modulo N.
#[derive(Debug, Default)]
pub struct IdHashShardingStrategy {
    num_shards: usize,
}

impl IndexShardingStrategy for IdHashShardingStrategy {
    fn initialize(
        &mut self,
        properties: &Properties,
        index_managers: &[Arc<dyn IndexManager>],
    ) -> Result<()> {
        if index_managers.is_empty() {
            return Err(ShardexError::config(
                ErrorCode::StrategyInitFailed,
                "IdHashShardingStrategy needs at least one index manager",
            ));
        }
        if let Some(declared) = properties.get_usize(NBR_OF_SHARDS)? {
            if declared != index_managers.len() {
                return Err(ShardexError::config(
                    ErrorCode::StrategyInitFailed,
                    format!(
                        "{} declares {} shard(s) but {} index manager(s) were bound",
                        NBR_OF_SHARDS,
                        declared,
                        index_managers.len()
                    ),
                ));
            }
        }
        self.num_shards = index_managers.len();
        debug!(num_shards = self.num_shards, "IdHashShardingStrategy initialized");
        Ok(())
    }

    fn shards_for(&self, target: ShardTarget<'_>) -> Vec<ShardOrdinal> {
        match target {
            ShardTarget::Document(id) => vec![ShardKey::new(id).ordinal(self.num_shards)],
            ShardTarget::All => (0..self.num_shards).collect(),
        }
    }

    fn shard_count(&self) -> usize {
        self.num_shards
    }
}
