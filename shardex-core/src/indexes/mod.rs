pub mod binder;
pub mod context;
pub mod holder;
pub mod manager;

pub use binder::{
    EntityIndexBinder, EntityIndexBinding, IndexingInterceptor, IndexingOverride,
    NonDynamicShardingBinder, RoutedWork,
};
pub use context::{BuildContext, EntityType};
pub use holder::IndexManagerHolder;
pub use manager::{IndexManager, IndexManagerFactory, MemoryIndexManager, MemoryIndexManagerFactory};
