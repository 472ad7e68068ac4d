// Concurrent indexing load test: binds an entity across shards, replays a random
// workload through writer threads and compares the index against the work ledger.

use std::process::ExitCode;
use std::sync::Arc;

use shardex_core::config::WorkloadConfig;
use shardex_core::logging::init_logging;
use shardex_core::workload::run_load;
use shardex_core::{
    BuildContext, EntityIndexBinder, EntityType, IndexManagerHolder, NonDynamicShardingBinder,
    Properties, Result, WorkLog,
};

const INDEX_NAME: &str = "Quote";

fn run(config: &WorkloadConfig) -> Result<bool> {
    config.validate()?;

    let properties = Properties::new()
        .with(
            format!("{}.sharding_strategy.nbr_of_shards", INDEX_NAME),
            config.shards.to_string(),
        )
        .with(format!("{}.directory_provider", INDEX_NAME), "ram");

    let binder = NonDynamicShardingBinder::from_properties(INDEX_NAME, &properties)?;
    let holder = IndexManagerHolder::new();
    let binding = binder.bind(
        &holder,
        &EntityType::new(INDEX_NAME),
        None,
        &BuildContext::in_memory(),
    )?;

    let work_log = WorkLog::new(
        config.total_works,
        config.pct_add,
        config.pct_update,
        config.seed,
    )?;

    let report = run_load(Arc::new(binding), Arc::new(work_log), config.writers)?;

    println!("=== Work Log Load Test ===");
    println!("  Works applied: {}", report.applied);
    println!("  Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    println!("  Rate: {:.0} works/sec", report.works_per_sec());
    println!("  Result: {}", report.consistency);

    Ok(report.consistency.is_consistent())
}

fn main() -> ExitCode {
    init_logging();
    let config = WorkloadConfig::from_env();
    tracing::info!(?config, "Starting work log load test");

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!(error = %e, "Load test aborted");
            ExitCode::FAILURE
        }
    }
}
