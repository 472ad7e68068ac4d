use crate::core::errors::{ErrorCode, Result, ShardexError};

/// Load-test configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub total_works: usize,
    pub pct_add: u32,
    pub pct_update: u32,
    pub writers: usize,    // Threads applying works concurrently
    pub shards: usize,     // Shards of the bound entity
    pub seed: u64,         // Seed of the workload generator
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            total_works: 10_000,
            pct_add: 70,
            pct_update: 20,
            writers: 4,
            shards: 4,
            seed: 42,
        }
    }
}

impl WorkloadConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let mut config = WorkloadConfig::default();

        if let Ok(total) = std::env::var("SHARDEX_TOTAL_WORKS") {
            config.total_works = total.parse().unwrap_or(config.total_works);
        }
        if let Ok(pct) = std::env::var("SHARDEX_PCT_ADD") {
            config.pct_add = pct.parse().unwrap_or(config.pct_add);
        }
        if let Ok(pct) = std::env::var("SHARDEX_PCT_UPDATE") {
            config.pct_update = pct.parse().unwrap_or(config.pct_update);
        }
        if let Ok(writers) = std::env::var("SHARDEX_WRITERS") {
            config.writers = writers.parse().unwrap_or(config.writers);
        }
        if let Ok(shards) = std::env::var("SHARDEX_SHARDS") {
            config.shards = shards.parse().unwrap_or(config.shards);
        }
        if let Ok(seed) = std::env::var("SHARDEX_SEED") {
            config.seed = seed.parse().unwrap_or(config.seed);
        }

        config
    }

    /// Ratios are checked by the generator itself.
    pub fn validate(&self) -> Result<()> {
        if self.writers == 0 {
            return Err(ShardexError::config(
                ErrorCode::InvalidConfiguration,
                "at least one writer thread is required",
            ));
        }
        if self.shards == 0 {
            return Err(ShardexError::config(
                ErrorCode::InvalidConfiguration,
                "at least one shard is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(WorkloadConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_writers_rejected() {
        let config = WorkloadConfig {
            writers: 0,
            ..WorkloadConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
