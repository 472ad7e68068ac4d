/// Named constructors for sharding strategies.
///
/// Configuration refers to a strategy by name (the value of the `sharding_strategy`
/// property); the catalog turns that reference into a fresh, uninitialized instance.

use std::collections::HashMap;
use std::fmt;

use crate::core::errors::{Result, ShardexError};
use crate::sharding::strategy::{IdHashShardingStrategy, IndexShardingStrategy, NotShardedStrategy};

pub const NOT_SHARDED: &str = "none";
pub const ID_HASH: &str = "id-hash";

/// Default constructor for a strategy implementation.
pub type StrategyConstructor = fn() -> Box<dyn IndexShardingStrategy>;

/// Reference to a strategy implementation, resolved against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrategyRef(String);

impl StrategyRef {
    pub fn new(name: impl Into<String>) -> Self {
        StrategyRef(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Default choice for a shard count: no sharding for one shard, id hashing otherwise.
    pub fn default_for(shard_count: usize) -> Self {
        if shard_count > 1 {
            StrategyRef::new(ID_HASH)
        } else {
            StrategyRef::new(NOT_SHARDED)
        }
    }
}

impl fmt::Display for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct StrategyCatalog {
    constructors: HashMap<String, StrategyConstructor>,
}

impl StrategyCatalog {
    /// Empty catalog
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: StrategyConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn contains(&self, reference: &StrategyRef) -> bool {
        self.constructors.contains_key(reference.name())
    }

    pub fn instantiate(&self, reference: &StrategyRef) -> Result<Box<dyn IndexShardingStrategy>> {
        let constructor = self.constructors.get(reference.name()).ok_or_else(|| {
            ShardexError::InstantiationError {
                role: "IndexShardingStrategy",
                reference: reference.name().to_string(),
                message: "no implementation registered under this name".to_string(),
            }
        })?;
        Ok(constructor())
    }
}

impl Default for StrategyCatalog {
    /// Catalog with the built-in strategies
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register(NOT_SHARDED, not_sharded);
        catalog.register(ID_HASH, id_hash);
        catalog
    }
}

fn not_sharded() -> Box<dyn IndexShardingStrategy> {
    Box::new(NotShardedStrategy::default())
}

fn id_hash() -> Box<dyn IndexShardingStrategy> {
    Box::new(IdHashShardingStrategy::default())
}

impl fmt::Debug for StrategyCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("StrategyCatalog").field("strategies", &names).finish()
    }
}
