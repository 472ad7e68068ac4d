/// Key/value configuration bundles handed to index managers and sharding strategies.
///
/// A logical index is configured with a flat set of properties:
/// - `<index>.<key>` applies to every shard of the index
/// - `<index>.<shard>.<key>` overrides `<key>` for one shard only
/// - `<index>.sharding_strategy.nbr_of_shards` sets the shard count (default 1)
///
/// `shard_bundles` expands that flat set into one bundle per shard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ErrorCode, Result, ShardexError};

/// Selector key naming the sharding strategy implementation.
pub const SHARDING_STRATEGY: &str = "sharding_strategy";

/// Shard count key, relative to the selector key.
pub const NBR_OF_SHARDS: &str = "nbr_of_shards";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Parse a numeric property; a present but malformed value is a configuration error.
    pub fn get_usize(&self, key: &str) -> Result<Option<usize>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<usize>().map(Some).map_err(|_| {
                ShardexError::config(
                    ErrorCode::InvalidPropertyValue,
                    format!("property '{}' is not a non-negative integer: '{}'", key, raw),
                )
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// View of these properties with `key` removed.
    ///
    /// Entries nested under `key.` are re-exposed without the prefix, so a strategy
    /// reads `nbr_of_shards` rather than `sharding_strategy.nbr_of_shards`. The bare
    /// selector itself never appears in the result. Nested entries win over
    /// same-named top-level ones.
    pub fn masked(&self, key: &str) -> Properties {
        let prefix = format!("{}.", key);
        let mut entries = BTreeMap::new();
        let mut nested = Vec::new();

        for (k, v) in &self.entries {
            if k == key {
                continue;
            }
            match k.strip_prefix(&prefix) {
                Some(rest) if !rest.is_empty() => nested.push((rest.to_string(), v.clone())),
                _ => {
                    entries.insert(k.clone(), v.clone());
                }
            }
        }
        entries.extend(nested);

        Properties { entries }
    }

    /// Parse a JSON object of string values into a bundle.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ShardexError::config(
                ErrorCode::InvalidConfiguration,
                format!("invalid properties document: {}", e),
            )
        })
    }

    /// Expand the flat configuration of `index_name` into one bundle per shard.
    pub fn shard_bundles(&self, index_name: &str) -> Result<Vec<Properties>> {
        let index_prefix = format!("{}.", index_name);
        let mut shared = Properties::new();
        let mut overrides: BTreeMap<usize, Properties> = BTreeMap::new();

        for (k, v) in &self.entries {
            let Some(rest) = k.strip_prefix(&index_prefix) else {
                continue;
            };
            let shard_scoped = rest
                .split_once('.')
                .filter(|(_, tail)| !tail.is_empty())
                .and_then(|(head, tail)| head.parse::<usize>().ok().map(|shard| (shard, tail)));
            match shard_scoped {
                Some((shard, tail)) => overrides.entry(shard).or_default().set(tail, v.clone()),
                None => shared.set(rest, v.clone()),
            }
        }

        let shard_count_key = format!("{}.{}", SHARDING_STRATEGY, NBR_OF_SHARDS);
        let shard_count = shared.get_usize(&shard_count_key)?.unwrap_or(1);
        if shard_count == 0 {
            return Err(ShardexError::config(
                ErrorCode::InvalidConfiguration,
                format!("index '{}': {} must be at least 1", index_name, shard_count_key),
            ));
        }
        if let Some((&highest, _)) = overrides.iter().next_back() {
            if highest >= shard_count {
                return Err(ShardexError::config(
                    ErrorCode::InvalidConfiguration,
                    format!(
                        "index '{}': override for shard {} but only {} shard(s) configured",
                        index_name, highest, shard_count
                    ),
                ));
            }
        }

        Ok((0..shard_count)
            .map(|shard| {
                let mut bundle = shared.clone();
                if let Some(specific) = overrides.get(&shard) {
                    bundle.entries.extend(specific.entries.clone());
                }
                bundle
            })
            .collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Properties {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
