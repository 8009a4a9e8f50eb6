//! Core flag types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Open-ended payload carried by a flag or alongside a flag set.
pub type Data = serde_json::Map<String, serde_json::Value>;

/// A data transform attached to a flag, run during merge operations.
pub type Hook = Arc<dyn Fn(Data) -> Data + Send + Sync>;

/// A flag definition.
///
/// Names compare case-insensitively (ASCII); codes compare exactly.
/// Hooks are plain function values and are skipped by serde — a definition
/// loaded from a catalog comes back without them.
#[derive(Clone, Serialize, Deserialize)]
pub struct Flag {
    pub name: String,
    /// Short code used for compact serialization, conventionally one character.
    pub code: String,
    /// Level used for threshold (`name+`) comparisons.
    #[serde(default)]
    pub lvl: u32,
    /// Default payload stored under this flag's name when it is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    /// Opaque marker for embedding applications; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,
    /// Run when this flag is activated by a merge.
    #[serde(skip)]
    pub add: Option<Hook>,
    /// Run when this flag is deactivated by a merge.
    #[serde(skip)]
    pub remove: Option<Hook>,
}

impl Flag {
    /// Create a flag with the given name and code, level 0, no payload.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            lvl: 0,
            data: None,
            lock: None,
            add: None,
            remove: None,
        }
    }

    /// Set the level used for threshold comparisons.
    pub fn with_lvl(mut self, lvl: u32) -> Self {
        self.lvl = lvl;
        self
    }

    /// Attach a default payload.
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach an opaque lock marker.
    pub fn with_lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    /// Attach a transform run when the flag is activated.
    pub fn on_add<F>(mut self, hook: F) -> Self
    where
        F: Fn(Data) -> Data + Send + Sync + 'static,
    {
        self.add = Some(Arc::new(hook));
        self
    }

    /// Attach a transform run when the flag is deactivated.
    pub fn on_remove<F>(mut self, hook: F) -> Self
    where
        F: Fn(Data) -> Data + Send + Sync + 'static,
    {
        self.remove = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("lvl", &self.lvl)
            .field("data", &self.data)
            .field("lock", &self.lock)
            .field("add", &self.add.is_some())
            .field("remove", &self.remove.is_some())
            .finish()
    }
}
