use std::fmt;
use std::sync::Arc;

use crate::indexes::manager::{IndexManagerFactory, MemoryIndexManagerFactory};
use crate::sharding::catalog::StrategyCatalog;

/// Logical entity type whose documents are indexed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        EntityType(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Services available while bindings are built.
#[derive(Clone)]
pub struct BuildContext {
    pub index_manager_factory: Arc<dyn IndexManagerFactory>,
    pub strategies: StrategyCatalog,
}

impl BuildContext {
    pub fn new(index_manager_factory: Arc<dyn IndexManagerFactory>, strategies: StrategyCatalog) -> Self {
        Self {
            index_manager_factory,
            strategies,
        }
    }

    /// In-memory managers with the built-in strategies
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryIndexManagerFactory::new()),
            StrategyCatalog::default(),
        )
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}
