//! The flag registry: registration, lookup, and flag-list operations.

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

use crate::{Data, Flag, FlagExpr};

/// The registry of known flag definitions.
///
/// Definitions are kept in registration order; lookups scan in order and
/// return the first match. At most one definition exists per lowercase
/// name — registering a colliding name overwrites it in place.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FlagRegistry {
    flags: Vec<Flag>,
}

/// The outcome of a merge: the new flag list and the threaded data map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetResult {
    pub flags: String,
    pub data: Data,
}

impl FlagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with initial definitions.
    pub fn with_flags(flags: impl IntoIterator<Item = Flag>) -> Self {
        let mut registry = Self::new();
        registry.add(flags);
        registry
    }

    /// Register one or more definitions.
    ///
    /// A definition whose name collides case-insensitively with an existing
    /// one replaces it in place: the stored name is lowercased, the incoming
    /// code and level are kept, and `data`/`lock`/hooks are reset to absent.
    /// A fresh definition is appended as given.
    pub fn add(&mut self, flags: impl IntoIterator<Item = Flag>) {
        for flag in flags {
            self.insert(flag);
        }
    }

    fn insert(&mut self, flag: Flag) {
        match self
            .flags
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&flag.name))
        {
            Some(existing) => {
                *existing = Flag {
                    name: existing.name.to_ascii_lowercase(),
                    code: flag.code,
                    lvl: flag.lvl,
                    data: None,
                    lock: None,
                    add: None,
                    remove: None,
                };
            }
            None => self.flags.push(flag),
        }
    }

    /// Resolve a token against every definition's name (case-insensitive)
    /// or code (exact). First match in registration order.
    pub fn exists(&self, token: &str) -> Option<&Flag> {
        self.flags
            .iter()
            .find(|flag| flag.name.eq_ignore_ascii_case(token) || flag.code == token)
    }

    /// Highest level among the resolved tokens of `list`.
    ///
    /// Unresolved tokens contribute 0; an empty list yields 0.
    pub fn lvl(&self, list: &str) -> u32 {
        list.split_whitespace()
            .filter_map(|token| self.exists(token))
            .map(|flag| flag.lvl)
            .max()
            .unwrap_or(0)
    }

    /// Concatenated codes for the tokens of `list`, in token order.
    ///
    /// Unresolved tokens contribute nothing; repeated flags repeat their code.
    pub fn codes(&self, list: &str) -> String {
        list.split_whitespace()
            .filter_map(|token| self.exists(token))
            .map(|flag| flag.code.as_str())
            .collect()
    }

    /// Check a flag list against an expression.
    ///
    /// Empty and whitespace-only expressions hold vacuously.
    pub fn check(&self, list: &str, expr: &str) -> bool {
        FlagExpr::parse(expr).matches(self, list)
    }

    /// Merge an expression into a flag list and its data map.
    ///
    /// Directives are processed in order. `!name` removes the raw name from
    /// the working set, deletes `data[name]`, and runs the named flag's
    /// `remove` hook if one is registered. Any other directive resolves
    /// through [`FlagRegistry::exists`]; on success the definition's stored
    /// name joins the set, its default payload seeds `data[name]` when that
    /// key is absent, and its `add` hook runs. Unresolved directives are
    /// ignored.
    pub fn set(&self, list: &str, data: Data, expr: &str) -> SetResult {
        let mut data = data;
        let mut working: IndexSet<String> =
            list.split_whitespace().map(str::to_string).collect();

        for directive in expr.split_whitespace() {
            if let Some(name) = directive.strip_prefix('!') {
                working.shift_remove(name);
                data.remove(name);
                if let Some(hook) = self.exists(name).and_then(|flag| flag.remove.clone()) {
                    data = hook(data);
                }
            } else if let Some(flag) = self.exists(directive) {
                working.insert(flag.name.clone());
                if let Some(default) = &flag.data {
                    if !data.contains_key(&flag.name) {
                        data.insert(flag.name.clone(), Value::Object(default.clone()));
                    }
                }
                if let Some(hook) = flag.add.clone() {
                    data = hook(data);
                }
            }
        }

        SetResult {
            flags: working
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            data,
        }
    }

    /// All registered definitions, in registration order.
    pub fn all(&self) -> &[Flag] {
        &self.flags
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<Flag> for FlagRegistry {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self::with_flags(iter)
    }
}

impl Extend<Flag> for FlagRegistry {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        self.add(iter);
    }
}
