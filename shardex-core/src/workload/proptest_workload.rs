//! Property-based tests for workload generation and ledger replay.

use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::generator::{WorkGenerator, WorkQuotas};
use super::ledger::{replay, WorkLedger};
use super::work::{DocumentId, Work, WorkType};

/// Valid (total, pct_add, pct_update) triples: non-zero add quota, sum within 100.
fn valid_ratio() -> impl Strategy<Value = (usize, u32, u32)> {
    (1u32..=100)
        .prop_flat_map(|pct_add| (Just(pct_add), 0u32..=(100 - pct_add)))
        .prop_flat_map(|(pct_add, pct_update)| {
            let min_total = (100 + pct_add as usize - 1) / pct_add as usize;
            (min_total..min_total + 400, Just(pct_add), Just(pct_update))
        })
}

/// Reorder works while keeping each id's own works in order.
fn interleave(works: &[Work], seed: u64) -> Vec<Work> {
    let mut per_id: HashMap<DocumentId, VecDeque<Work>> = HashMap::new();
    let mut slots = Vec::with_capacity(works.len());
    for work in works {
        per_id.entry(work.id).or_default().push_back(work.clone());
        slots.push(work.id);
    }
    slots.shuffle(&mut StdRng::seed_from_u64(seed));
    slots
        .into_iter()
        .filter_map(|id| per_id.get_mut(&id).and_then(VecDeque::pop_front))
        .collect()
}

proptest! {
    /// Property: the generator emits exactly its quotas, with referential validity.
    #[test]
    fn prop_generator_honors_quotas((total, pct_add, pct_update) in valid_ratio(), seed in any::<u64>()) {
        let expected = WorkQuotas::split(total, pct_add, pct_update);
        let works: Vec<Work> = WorkGenerator::generate(total, pct_add, pct_update, StdRng::seed_from_u64(seed))
            .unwrap()
            .collect();

        prop_assert_eq!(works.len(), total);
        let mut added = HashSet::new();
        let mut counts = WorkQuotas::default();
        for work in &works {
            match work.work_type {
                WorkType::Add => {
                    counts.add += 1;
                    prop_assert!(added.insert(work.id));
                }
                WorkType::Update => {
                    counts.update += 1;
                    prop_assert!(added.contains(&work.id));
                }
                WorkType::Delete => {
                    counts.delete += 1;
                    prop_assert!(added.contains(&work.id));
                }
            }
        }
        prop_assert_eq!(counts, expected);
    }

    /// Property: a zero add percentage is always rejected.
    #[test]
    fn prop_zero_add_rejected(total in 0usize..10_000, pct_update in 0u32..=100) {
        let result = WorkGenerator::generate(total, 0, pct_update, StdRng::seed_from_u64(0));
        prop_assert!(result.err().map(|e| e.is_config_error()).unwrap_or(false));
    }

    /// Property: replay depends only on the per-id order of works.
    #[test]
    fn prop_replay_ignores_cross_id_interleaving(
        (total, pct_add, pct_update) in valid_ratio(),
        seed in any::<u64>(),
        shuffle_seed in any::<u64>(),
    ) {
        let works: Vec<Work> = WorkGenerator::generate(total, pct_add, pct_update, StdRng::seed_from_u64(seed))
            .unwrap()
            .collect();

        let in_order = WorkLedger::new();
        for work in works.iter().cloned() {
            in_order.record_applied(work);
        }
        let shuffled = WorkLedger::new();
        for work in interleave(&works, shuffle_seed) {
            shuffled.record_applied(work);
        }

        // an id is present iff its last work is not a delete
        let mut last: HashMap<DocumentId, WorkType> = HashMap::new();
        for work in &works {
            last.insert(work.id, work.work_type);
        }
        let net_present = last.values().filter(|t| **t != WorkType::Delete).count();

        prop_assert_eq!(in_order.expected_size(), net_present);
        prop_assert_eq!(shuffled.expected_size(), net_present);
        prop_assert_eq!(replay(works.iter().map(|w| (w.work_type, w.id))), net_present);
    }
}
