/// Concurrent load driver: feeds a work log through a binding and checks convergence.
///
/// One dispatcher pulls works from the log and hands each one to a writer thread
/// chosen by document id. All works on one id therefore go through the same writer,
/// which applies them to the engine and confirms them to the ledger in generation
/// order; works on different ids interleave freely.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::core::errors::Result;
use crate::indexes::binder::EntityIndexBinding;
use crate::sharding::strategy::ShardKey;
use crate::workload::ledger::Consistency;
use crate::workload::work::Work;
use crate::workload::work_log::WorkLog;

#[derive(Debug, Clone, Copy)]
pub struct LoadReport {
    pub applied: usize,
    pub elapsed: Duration,
    pub consistency: Consistency,
}

impl LoadReport {
    pub fn works_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return self.applied as f64;
        }
        self.applied as f64 / secs
    }
}

pub fn run_load<R>(
    binding: Arc<EntityIndexBinding>,
    work_log: Arc<WorkLog<R>>,
    writers: usize,
) -> Result<LoadReport>
where
    R: Rng + Send + 'static,
{
    let writers = writers.max(1);
    let start = Instant::now();

    let mut senders = Vec::with_capacity(writers);
    let mut handles = Vec::with_capacity(writers);
    for writer_id in 0..writers {
        let (tx, rx) = mpsc::channel::<Work>();
        senders.push(tx);

        let binding = Arc::clone(&binding);
        let work_log = Arc::clone(&work_log);
        handles.push(thread::spawn(move || -> Result<usize> {
            let mut applied = 0;
            for work in rx {
                binding.apply(&work)?;
                work_log.work_applied(work);
                applied += 1;
            }
            debug!(writer = writer_id, applied, "Writer drained");
            Ok(applied)
        }));
    }

    while let Some(work) = work_log.next_work() {
        let writer = ShardKey::new(work.id_string()).ordinal(writers);
        // A closed channel means the writer failed; its error surfaces on join.
        if senders[writer].send(work).is_err() {
            break;
        }
    }
    drop(senders);

    let mut applied = 0;
    let mut first_error = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(count)) => applied += count,
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    let consistency = work_log.check(binding.document_count());
    let report = LoadReport {
        applied,
        elapsed: start.elapsed(),
        consistency,
    };
    info!(
        entity = %binding.entity_type(),
        applied = report.applied,
        writers,
        works_per_sec = report.works_per_sec(),
        expected = consistency.expected,
        observed = consistency.observed,
        "Load run finished"
    );
    Ok(report)
}
