// ============================================================================
// CORE TYPES & CONFIGURATION
// ============================================================================
pub mod core;
pub mod config;
pub mod logging;

// ============================================================================
// SHARDING & INDEX BINDING
// ============================================================================
pub mod sharding;
pub mod indexes;

// ============================================================================
// WORKLOAD GENERATION & CONSISTENCY ORACLE
// ============================================================================
pub mod workload;

// Re-export commonly used types
pub use crate::core::{ErrorCode, Properties, Result, ShardexError};
pub use config::WorkloadConfig;
pub use indexes::{
    BuildContext, EntityIndexBinder, EntityIndexBinding, EntityType, IndexManager,
    IndexManagerHolder, IndexingInterceptor, IndexingOverride, NonDynamicShardingBinder,
};
pub use sharding::{IndexShardingStrategy, ShardTarget, StrategyCatalog, StrategyRef};
pub use workload::{Consistency, Quote, Work, WorkGenerator, WorkLedger, WorkLog, WorkType};
