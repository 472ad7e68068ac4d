/// Randomized index workload honoring fixed Add/Update/Delete proportions.
///
/// Quotas are computed once with integer division; rounding leftovers go to the
/// delete quota. Every step picks uniformly among the work types that can still be
/// emitted: a type needs remaining quota, and Update/Delete additionally need at
/// least one id added earlier in this sequence.
///
/// The pool of added ids belongs to the generator and is updated the moment an Add
/// is emitted. Ids stay in the pool after a Delete, so a later Update re-creates
/// the document and a later Delete is a no-op on replay; this keeps every quota
/// reachable whatever the proportions.

use std::iter::FusedIterator;

use rand::Rng;

use crate::core::errors::{ErrorCode, Result, ShardexError};
use crate::workload::work::{DocumentId, Quote, Work, WorkType};

/// Remaining works per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkQuotas {
    pub add: usize,
    pub update: usize,
    pub delete: usize,
}

impl WorkQuotas {
    /// Split `total` works by percentage; validation is the caller's job.
    pub fn split(total: usize, pct_add: u32, pct_update: u32) -> Self {
        let share = |pct: u32| ((total as u128 * pct as u128) / 100) as usize;
        let add = share(pct_add);
        let update = share(pct_update);
        Self {
            add,
            update,
            delete: total - add - update,
        }
    }

    pub fn total(&self) -> usize {
        self.add + self.update + self.delete
    }

    pub fn get(&self, work_type: WorkType) -> usize {
        match work_type {
            WorkType::Add => self.add,
            WorkType::Update => self.update,
            WorkType::Delete => self.delete,
        }
    }

    fn decrement(&mut self, work_type: WorkType) {
        match work_type {
            WorkType::Add => self.add -= 1,
            WorkType::Update => self.update -= 1,
            WorkType::Delete => self.delete -= 1,
        }
    }
}

pub struct WorkGenerator<R: Rng> {
    rng: R,
    remaining: WorkQuotas,
    added_ids: Vec<DocumentId>,
    next_id: DocumentId,
}

impl<R: Rng> WorkGenerator<R> {
    /// `pct_add` and `pct_update` are in 0..=100; the delete share is implied.
    pub fn generate(total: usize, pct_add: u32, pct_update: u32, rng: R) -> Result<Self> {
        if pct_add as u64 + pct_update as u64 > 100 {
            return Err(ShardexError::config(
                ErrorCode::InvalidWorkloadRatio,
                format!(
                    "add ({}%) and update ({}%) percentages must not exceed 100",
                    pct_add, pct_update
                ),
            ));
        }
        if pct_add == 0 {
            return Err(ShardexError::config(
                ErrorCode::InvalidWorkloadRatio,
                "add percentage must be greater than 0",
            ));
        }
        let quotas = WorkQuotas::split(total, pct_add, pct_update);
        if quotas.add == 0 {
            return Err(ShardexError::config(
                ErrorCode::InvalidWorkloadRatio,
                format!(
                    "at least one document must be added ({} works at {}% add rounds to 0)",
                    total, pct_add
                ),
            ));
        }

        Ok(Self {
            rng,
            remaining: quotas,
            added_ids: Vec::new(),
            next_id: 1,
        })
    }

    pub fn remaining(&self) -> WorkQuotas {
        self.remaining
    }

    /// Ids emitted by an Add so far
    pub fn added_ids(&self) -> &[DocumentId] {
        &self.added_ids
    }

    fn eligible(&self) -> ([WorkType; 3], usize) {
        let mut kinds = [WorkType::Add; 3];
        let mut len = 0;
        for work_type in WorkType::ALL {
            let has_target = !work_type.requires_existing() || !self.added_ids.is_empty();
            if self.remaining.get(work_type) > 0 && has_target {
                kinds[len] = work_type;
                len += 1;
            }
        }
        (kinds, len)
    }

    fn previously_added_id(&mut self) -> DocumentId {
        let idx = self.rng.gen_range(0..self.added_ids.len());
        self.added_ids[idx]
    }
}

impl<R: Rng> Iterator for WorkGenerator<R> {
    type Item = Work;

    fn next(&mut self) -> Option<Work> {
        let (kinds, len) = self.eligible();
        // Ids are only ever added to the pool and the add quota is at least one, so
        // nothing is eligible exactly when every quota is spent.
        if len == 0 {
            return None;
        }
        let work_type = kinds[self.rng.gen_range(0..len)];

        let work = match work_type {
            WorkType::Add => {
                let id = self.next_id;
                self.next_id += 1;
                self.added_ids.push(id);
                Work::add(Quote::random(id, &mut self.rng))
            }
            WorkType::Update => {
                let id = self.previously_added_id();
                Work::update(Quote::random(id, &mut self.rng))
            }
            WorkType::Delete => {
                let id = self.previously_added_id();
                Work::delete(Quote::random(id, &mut self.rng))
            }
        };
        self.remaining.decrement(work_type);
        Some(work)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining.total();
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for WorkGenerator<R> {}

impl<R: Rng> FusedIterator for WorkGenerator<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn count(works: &[Work], work_type: WorkType) -> usize {
        works.iter().filter(|w| w.work_type == work_type).count()
    }

    #[test]
    fn test_fifteen_works_eighty_twenty() {
        let works: Vec<Work> = WorkGenerator::generate(15, 80, 20, rng(1)).unwrap().collect();
        assert_eq!(works.len(), 15);
        assert_eq!(count(&works, WorkType::Add), 12);
        assert_eq!(count(&works, WorkType::Update), 3);
        assert_eq!(count(&works, WorkType::Delete), 0);
    }

    #[test]
    fn test_rounding_remainder_goes_to_delete() {
        let quotas = WorkQuotas::split(10, 33, 33);
        assert_eq!(quotas, WorkQuotas { add: 3, update: 3, delete: 4 });
    }

    #[test]
    fn test_updates_and_deletes_follow_an_add() {
        let works: Vec<Work> = WorkGenerator::generate(500, 20, 30, rng(42)).unwrap().collect();
        let mut seen = HashSet::new();
        for work in &works {
            match work.work_type {
                WorkType::Add => assert!(seen.insert(work.id), "ids are never reused"),
                _ => assert!(seen.contains(&work.id), "{} before its add", work),
            }
        }
    }

    #[test]
    fn test_skewed_delete_quota_completes() {
        // 1 add, 99 deletes
        let works: Vec<Work> = WorkGenerator::generate(100, 1, 0, rng(3)).unwrap().collect();
        assert_eq!(works.len(), 100);
        assert_eq!(works[0].work_type, WorkType::Add);
        assert!(works[1..].iter().all(|w| w.work_type == WorkType::Delete && w.id == works[0].id));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a: Vec<Work> = WorkGenerator::generate(50, 60, 20, rng(9)).unwrap().collect();
        let b: Vec<Work> = WorkGenerator::generate(50, 60, 20, rng(9)).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_generator_stays_exhausted() {
        let mut generator = WorkGenerator::generate(4, 100, 0, rng(0)).unwrap();
        assert_eq!(generator.len(), 4);
        assert_eq!(generator.by_ref().count(), 4);
        assert!(generator.next().is_none());
        assert_eq!(generator.remaining(), WorkQuotas::default());
    }

    #[test]
    fn test_invalid_ratios() {
        assert!(WorkGenerator::generate(10, 80, 30, rng(0)).is_err());
        assert!(WorkGenerator::generate(10, 0, 50, rng(0)).is_err());
        // 3 works at 10% add rounds to zero adds
        let err = WorkGenerator::generate(3, 10, 0, rng(0)).err().unwrap();
        assert_eq!(err.code(), ErrorCode::InvalidWorkloadRatio);
    }

    #[test]
    fn test_zero_total_is_rejected() {
        assert!(WorkGenerator::generate(0, 100, 0, rng(0)).is_err());
    }
}
