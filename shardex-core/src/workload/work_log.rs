/// Generator and ledger packaged for multi-threaded load tests.
///
/// `next_work` serializes access to the generator behind its own mutex; the ledger
/// keeps separate locks, so confirming works never waits on generation.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::errors::Result;
use crate::workload::generator::{WorkGenerator, WorkQuotas};
use crate::workload::ledger::{Consistency, WorkLedger};
use crate::workload::work::Work;

pub struct WorkLog<R: Rng = StdRng> {
    generator: Mutex<WorkGenerator<R>>,
    ledger: WorkLedger,
}

impl WorkLog<StdRng> {
    /// Seeded work log
    pub fn new(total: usize, pct_add: u32, pct_update: u32, seed: u64) -> Result<Self> {
        Self::with_rng(total, pct_add, pct_update, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WorkLog<R> {
    pub fn with_rng(total: usize, pct_add: u32, pct_update: u32, rng: R) -> Result<Self> {
        Ok(Self {
            generator: Mutex::new(WorkGenerator::generate(total, pct_add, pct_update, rng)?),
            ledger: WorkLedger::new(),
        })
    }

    /// Next work to send to the engine, or `None` once the workload is exhausted.
    pub fn next_work(&self) -> Option<Work> {
        self.generator.lock().next()
    }

    pub fn work_applied(&self, work: Work) {
        self.ledger.record_applied(work);
    }

    pub fn calculate_index_size(&self) -> usize {
        self.ledger.expected_size()
    }

    pub fn check(&self, observed: usize) -> Consistency {
        self.ledger.check(observed)
    }

    pub fn remaining(&self) -> WorkQuotas {
        self.generator.lock().remaining()
    }

    pub fn ledger(&self) -> &WorkLedger {
        &self.ledger
    }
}
