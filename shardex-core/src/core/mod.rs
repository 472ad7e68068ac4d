pub mod errors;
pub mod properties;

pub use errors::{ErrorCode, Result, ShardexError};
pub use properties::{Properties, NBR_OF_SHARDS, SHARDING_STRATEGY};
