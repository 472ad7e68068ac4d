pub mod catalog;
pub mod strategy;

pub use catalog::{StrategyCatalog, StrategyConstructor, StrategyRef, ID_HASH, NOT_SHARDED};
pub use strategy::{
    IdHashShardingStrategy, IndexShardingStrategy, NotShardedStrategy, ShardKey, ShardOrdinal,
    ShardTarget,
};
