//! vexil: named-flag registry and expression evaluator.
//!
//! Flags are short symbolic tags (roles, permissions) with an optional
//! compact code, a numeric level, and optional attached data with hooks.
//! A [`FlagRegistry`] resolves space-separated flag lists against boolean
//! expressions and can merge a declarative expression into an existing
//! flag set plus an associated data bag.
//!
//! # Grammar
//!
//! An expression is a space-separated list of terms, implicitly ANDed:
//! - `name` — the raw token must be present in the current list
//! - `!name` — the raw token must be absent from the current list
//! - `a|b|!c` — at least one alternative must pass the membership rule
//! - `name+` — the current list must reach `name`'s registered level
//!
//! # Example
//!
//! ```
//! use vexil::{Flag, FlagRegistry};
//!
//! let mut registry = FlagRegistry::new();
//! registry.add([
//!     Flag::new("admin", "A").with_lvl(3),
//!     Flag::new("user", "U").with_lvl(1),
//! ]);
//!
//! assert!(registry.check("admin user", "admin !guest"));
//! assert_eq!(registry.lvl("admin user"), 3);
//! assert_eq!(registry.codes("admin user"), "AU");
//! ```

pub mod flag;
pub mod registry;
pub mod expr;
pub mod catalog;

pub use flag::*;
pub use registry::*;
pub use expr::*;
pub use catalog::*;
