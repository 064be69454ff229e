//! Dictionary configuration.

use serde::{Deserialize, Serialize};

/// How values are allocated for new keys.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Polynomial string hash of the composite key, salted once with a hash
    /// of the whole store when the value is taken. Values depend only on the
    /// key and the store contents, so they are reproducible across runs.
    #[default]
    Hashed,
    /// `1, 2, 3, ...` in insertion order. Strictly injective; the counter is
    /// only rewound by a full clear.
    Sequential,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub allocation: AllocationStrategy,
}

impl DictionaryConfig {
    pub fn with_allocation(mut self, allocation: AllocationStrategy) -> Self {
        self.allocation = allocation;
        self
    }
}
