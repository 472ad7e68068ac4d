pub mod generator;
pub mod harness;
pub mod ledger;
pub mod work;
pub mod work_log;

#[cfg(test)]
mod proptest_workload;

pub use generator::{WorkGenerator, WorkQuotas};
pub use harness::{run_load, LoadReport};
pub use ledger::{replay, Consistency, WorkLedger};
pub use work::{DocumentId, Quote, Work, WorkType};
pub use work_log::WorkLog;
