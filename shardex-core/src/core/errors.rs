use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// 1700-1799: Configuration/Validation errors
    InvalidConfiguration = 1701,
    EntityWithNoShard = 1702,
    InvalidWorkloadRatio = 1703,
    InvalidPropertyValue = 1704,

    /// 1900-1999: Strategy instantiation errors
    UnknownStrategy = 1901,
    StrategyInitFailed = 1902,

    /// 2000-2099: Index manager errors
    IndexManagerCreationFailed = 2001,
    ShardOutOfRange = 2002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorCode::EntityWithNoShard => "ENTITY_WITH_NO_SHARD",
            ErrorCode::InvalidWorkloadRatio => "INVALID_WORKLOAD_RATIO",
            ErrorCode::InvalidPropertyValue => "INVALID_PROPERTY_VALUE",
            ErrorCode::UnknownStrategy => "UNKNOWN_STRATEGY",
            ErrorCode::StrategyInitFailed => "STRATEGY_INIT_FAILED",
            ErrorCode::IndexManagerCreationFailed => "INDEX_MANAGER_CREATION_FAILED",
            ErrorCode::ShardOutOfRange => "SHARD_OUT_OF_RANGE",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShardexError {
    /// Static configuration mistake; never retried
    #[error("[{}] Config error: {message}", .code.as_str())]
    ConfigError { code: ErrorCode, message: String },

    /// A strategy reference could not be turned into a usable instance
    #[error("[{}] Unable to instantiate {role} '{reference}': {message}", ErrorCode::UnknownStrategy.as_str())]
    InstantiationError {
        role: &'static str,
        reference: String,
        message: String,
    },

    /// Index manager failure surfaced by a factory or a shard
    #[error("[{}] Index manager error: {message}", .code.as_str())]
    IndexManagerError { code: ErrorCode, message: String },
}

impl ShardexError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ShardexError::ConfigError { code, .. } => *code,
            ShardexError::InstantiationError { .. } => ErrorCode::UnknownStrategy,
            ShardexError::IndexManagerError { code, .. } => *code,
        }
    }

    pub(crate) fn config(code: ErrorCode, message: impl Into<String>) -> Self {
        ShardexError::ConfigError {
            code,
            message: message.into(),
        }
    }

    /// Raised when an entity type is bound to an empty shard configuration array.
    pub fn entity_with_no_shard(entity_type: &str) -> Self {
        ShardexError::config(
            ErrorCode::EntityWithNoShard,
            format!("entity '{}' has no shard configured", entity_type),
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, ShardexError::ConfigError { .. })
    }
}

pub type Result<T> = std::result::Result<T, ShardexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_carries_code() {
        let err = ShardexError::entity_with_no_shard("Quote");
        let msg = err.to_string();
        assert!(msg.starts_with("[ENTITY_WITH_NO_SHARD]"));
        assert!(msg.contains("Quote"));
        assert_eq!(err.code(), ErrorCode::EntityWithNoShard);
    }

    #[test]
    fn test_instantiation_error_code() {
        let err = ShardexError::InstantiationError {
            role: "IndexShardingStrategy",
            reference: "nope".to_string(),
            message: "not registered".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::UnknownStrategy);
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("'nope'"));
    }
}
