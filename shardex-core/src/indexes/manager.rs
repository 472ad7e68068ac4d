/// Physical index managers: one per shard of a bound entity.
///
/// The in-memory manager is the reference engine used by the workload harness; it
/// stores the latest payload per document id and nothing else.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::errors::{ErrorCode, Result, ShardexError};
use crate::core::properties::Properties;
use crate::workload::work::{DocumentId, Quote, Work, WorkType};

/// Storage backend selector read by the factory.
pub const DIRECTORY_PROVIDER: &str = "directory_provider";

pub trait IndexManager: Send + Sync + fmt::Debug {
    fn index_name(&self) -> &str;

    /// Apply a single work. Deleting an unknown id is a no-op.
    fn perform_work(&self, work: &Work) -> Result<()>;

    /// Drop every document of this shard.
    fn purge_all(&self);

    fn document_count(&self) -> usize;
}

#[derive(Debug)]
pub struct MemoryIndexManager {
    index_name: String,
    properties: Properties,
    documents: RwLock<HashMap<DocumentId, Quote>>,
}

impl MemoryIndexManager {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self::with_properties(index_name, Properties::new())
    }

    pub fn with_properties(index_name: impl Into<String>, properties: Properties) -> Self {
        Self {
            index_name: index_name.into(),
            properties,
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn get(&self, id: DocumentId) -> Option<Quote> {
        self.documents.read().get(&id).cloned()
    }
}

impl IndexManager for MemoryIndexManager {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    fn perform_work(&self, work: &Work) -> Result<()> {
        let mut documents = self.documents.write();
        match work.work_type {
            WorkType::Add | WorkType::Update => {
                documents.insert(work.id, work.payload.clone());
            }
            WorkType::Delete => {
                documents.remove(&work.id);
            }
        }
        Ok(())
    }

    fn purge_all(&self) {
        self.documents.write().clear();
    }

    fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

/// Creates index managers on behalf of the registry.
pub trait IndexManagerFactory: Send + Sync {
    fn create_index_manager(
        &self,
        index_name: &str,
        properties: &Properties,
    ) -> Result<Arc<dyn IndexManager>>;
}

/// Factory for `MemoryIndexManager`; accepts `directory_provider` = `ram` or unset.
#[derive(Debug, Default)]
pub struct MemoryIndexManagerFactory {
    created: AtomicUsize,
}

impl MemoryIndexManagerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of managers created so far
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

impl IndexManagerFactory for MemoryIndexManagerFactory {
    fn create_index_manager(
        &self,
        index_name: &str,
        properties: &Properties,
    ) -> Result<Arc<dyn IndexManager>> {
        match properties.get(DIRECTORY_PROVIDER) {
            None | Some("ram") => {}
            Some(other) => {
                return Err(ShardexError::IndexManagerError {
                    code: ErrorCode::IndexManagerCreationFailed,
                    message: format!(
                        "index '{}': unsupported {} '{}'",
                        index_name, DIRECTORY_PROVIDER, other
                    ),
                })
            }
        }
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(MemoryIndexManager::with_properties(
            index_name,
            properties.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_manager_applies_works() {
        let manager = MemoryIndexManager::new("quotes");
        manager.perform_work(&Work::add(Quote::new(1, "a"))).unwrap();
        manager.perform_work(&Work::add(Quote::new(2, "b"))).unwrap();
        manager.perform_work(&Work::update(Quote::new(1, "c"))).unwrap();
        assert_eq!(manager.document_count(), 2);
        assert_eq!(manager.get(1).map(|q| q.text), Some("c".to_string()));

        manager.perform_work(&Work::delete(Quote::new(2, "b"))).unwrap();
        manager.perform_work(&Work::delete(Quote::new(99, "x"))).unwrap();
        assert_eq!(manager.document_count(), 1);

        manager.purge_all();
        assert_eq!(manager.document_count(), 0);
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let factory = MemoryIndexManagerFactory::new();
        let props = Properties::new().with(DIRECTORY_PROVIDER, "filesystem");
        assert!(factory.create_index_manager("quotes", &props).is_err());
        assert_eq!(factory.created_count(), 0);

        let manager = factory.create_index_manager("quotes", &Properties::new()).unwrap();
        assert_eq!(manager.index_name(), "quotes");
        assert_eq!(factory.created_count(), 1);
    }
}
