//! JSON catalogs of flag definitions.
//!
//! A registry round-trips through a JSON array of definitions so
//! applications can ship flag catalogs as config. Hooks are function
//! values and do not survive serialization; reattach them after loading.

use thiserror::Error;

use crate::{Flag, FlagRegistry};

/// Error raised at the catalog (de)serialization boundary.
#[derive(Debug, Error)]
pub enum FlagsError {
    #[error("invalid flag catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl FlagRegistry {
    /// Load a registry from a JSON array of definitions.
    ///
    /// Definitions are registered through the normal path, so duplicate
    /// names in the catalog collapse under the usual overwrite semantics.
    pub fn from_json(json: &str) -> Result<Self, FlagsError> {
        let flags: Vec<Flag> = serde_json::from_str(json)?;
        Ok(Self::with_flags(flags))
    }

    /// Serialize the registry as a JSON array of definitions.
    pub fn to_json(&self) -> Result<String, FlagsError> {
        Ok(serde_json::to_string(self)?)
    }
}
