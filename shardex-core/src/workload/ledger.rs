/// Append-only record of works confirmed by the engine under test.
///
/// Writers append in confirmation order from any thread. `expected_size` replays a
/// snapshot of the log taken under the read lock, so a reader sees a prefix of the
/// confirmations and never a half-written entry.

use std::collections::HashSet;
use std::fmt;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::workload::work::{DocumentId, Work, WorkType};

/// Replay `(type, id)` entries from an empty index and return the document count.
pub fn replay<I>(entries: I) -> usize
where
    I: IntoIterator<Item = (WorkType, DocumentId)>,
{
    let mut present = HashSet::new();
    for (work_type, id) in entries {
        match work_type {
            WorkType::Delete => {
                present.remove(&id);
            }
            WorkType::Add | WorkType::Update => {
                present.insert(id);
            }
        }
    }
    present.len()
}

/// Outcome of comparing the engine's count with the replayed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consistency {
    pub expected: usize,
    pub observed: usize,
}

impl Consistency {
    pub fn is_consistent(&self) -> bool {
        self.expected == self.observed
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consistent() {
            write!(f, "consistent ({} documents)", self.expected)
        } else {
            write!(
                f,
                "diverged: expected {} documents, engine reports {}",
                self.expected, self.observed
            )
        }
    }
}

#[derive(Debug, Default)]
pub struct WorkLedger {
    applied: RwLock<Vec<Work>>,
    known_ids: Mutex<HashSet<DocumentId>>,
}

impl WorkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a work the engine confirmed; Adds also register their id as known.
    pub fn record_applied(&self, work: Work) {
        let added = (work.work_type == WorkType::Add).then_some(work.id);
        self.applied.write().push(work);
        if let Some(id) = added {
            self.known_ids.lock().insert(id);
        }
    }

    /// Expected document count after every work recorded so far.
    pub fn expected_size(&self) -> usize {
        let snapshot: Vec<(WorkType, DocumentId)> = self
            .applied
            .read()
            .iter()
            .map(|work| (work.work_type, work.id))
            .collect();
        replay(snapshot)
    }

    /// Compare the engine's reported count with the replay.
    pub fn check(&self, observed: usize) -> Consistency {
        let consistency = Consistency {
            expected: self.expected_size(),
            observed,
        };
        if consistency.is_consistent() {
            debug!(documents = observed, "Index consistent with work ledger");
        } else {
            warn!(
                expected = consistency.expected,
                observed = consistency.observed,
                applied = self.len(),
                "Index diverged from work ledger"
            );
        }
        consistency
    }

    /// Number of recorded works
    pub fn len(&self) -> usize {
        self.applied.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.read().is_empty()
    }

    /// Copy of the log in confirmation order
    pub fn snapshot(&self) -> Vec<Work> {
        self.applied.read().clone()
    }

    /// Whether an Add for `id` has ever been confirmed.
    ///
    /// Deleted ids stay known; the set only grows.
    pub fn is_known(&self, id: DocumentId) -> bool {
        self.known_ids.lock().contains(&id)
    }

    pub fn known_count(&self) -> usize {
        self.known_ids.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::work::Quote;
    use std::sync::Arc;
    use std::thread;

    fn q(id: DocumentId) -> Quote {
        Quote::new(id, "quote")
    }

    #[test]
    fn test_add_add_delete() {
        let ledger = WorkLedger::new();
        ledger.record_applied(Work::add(q(1)));
        ledger.record_applied(Work::add(q(2)));
        ledger.record_applied(Work::delete(q(1)));
        assert_eq!(ledger.expected_size(), 1);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_update_counts_once_and_delete_is_idempotent() {
        let ledger = WorkLedger::new();
        ledger.record_applied(Work::add(q(1)));
        ledger.record_applied(Work::update(q(1)));
        ledger.record_applied(Work::update(q(1)));
        assert_eq!(ledger.expected_size(), 1);

        ledger.record_applied(Work::delete(q(1)));
        ledger.record_applied(Work::delete(q(1)));
        assert_eq!(ledger.expected_size(), 0);

        // update after delete re-creates the document
        ledger.record_applied(Work::update(q(1)));
        assert_eq!(ledger.expected_size(), 1);
    }

    #[test]
    fn test_known_ids_only_track_adds() {
        let ledger = WorkLedger::new();
        ledger.record_applied(Work::add(q(5)));
        ledger.record_applied(Work::update(q(6)));
        assert!(ledger.is_known(5));
        assert!(!ledger.is_known(6));
        assert_eq!(ledger.known_count(), 1);
    }

    #[test]
    fn test_deleted_ids_stay_known() {
        let ledger = WorkLedger::new();
        ledger.record_applied(Work::add(q(9)));
        ledger.record_applied(Work::delete(q(9)));
        assert!(ledger.is_known(9));
        assert_eq!(ledger.known_count(), 1);
        assert_eq!(ledger.expected_size(), 0);
    }

    #[test]
    fn test_concurrent_adds_either_order() {
        for _ in 0..50 {
            let ledger = Arc::new(WorkLedger::new());
            let handles: Vec<_> = [1, 2]
                .into_iter()
                .map(|id| {
                    let ledger = Arc::clone(&ledger);
                    thread::spawn(move || ledger.record_applied(Work::add(q(id))))
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(ledger.expected_size(), 2);
        }
    }

    #[test]
    fn test_reader_sees_monotonic_prefix() {
        let ledger = Arc::new(WorkLedger::new());
        let writers: Vec<_> = (0..4u64)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..500 {
                        ledger.record_applied(Work::add(q(t * 1_000 + i)));
                    }
                })
            })
            .collect();

        let reader = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..200 {
                    let size = ledger.expected_size();
                    assert!(size >= last);
                    last = size;
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();
        assert_eq!(ledger.expected_size(), 2_000);
        assert_eq!(ledger.known_count(), 2_000);
    }

    #[test]
    fn test_check_reports_divergence() {
        let ledger = WorkLedger::new();
        ledger.record_applied(Work::add(q(1)));
        assert!(ledger.check(1).is_consistent());

        let diverged = ledger.check(3);
        assert!(!diverged.is_consistent());
        assert_eq!(diverged.to_string(), "diverged: expected 1 documents, engine reports 3");
    }
}
