//! Flag expression parsing and evaluation.
//!
//! An expression is a whitespace-separated list of terms; the expression
//! holds when every term holds. Membership terms test the raw tokens of
//! the current flag list exactly — no case folding, no code resolution.
//! Only threshold terms resolve through the registry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::FlagRegistry;

/// A single requirement within a flag expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// `a|b|!c` — at least one alternative passes the membership rule.
    ///
    /// Alternatives support only the leading-`!` negation; a trailing `+`
    /// inside an alternation is part of the literal token.
    AnyOf(Vec<String>),
    /// `name+` — the current list must reach the named flag's level.
    /// Unknown names fail the term.
    AtLeast(String),
    /// `name` or `!name` — exact membership test against the raw token set.
    Membership(String),
}

/// A parsed flag expression: the conjunction of its terms.
///
/// An expression with no terms is vacuously true.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlagExpr {
    terms: Vec<Term>,
}

impl FlagExpr {
    /// Parse an expression string.
    ///
    /// Splits on whitespace and classifies each term. Alternation is
    /// recognized before the threshold suffix, so `a|b+` is an alternation
    /// whose second alternative is the literal token `b+`.
    ///
    /// # Examples
    /// ```
    /// use vexil::FlagExpr;
    /// assert!(FlagExpr::parse("").is_empty());
    /// assert_eq!(FlagExpr::parse("admin !guest").terms().len(), 2);
    /// ```
    pub fn parse(input: &str) -> Self {
        let terms = input
            .split_whitespace()
            .map(|term| {
                if term.contains('|') {
                    Term::AnyOf(term.split('|').map(str::to_string).collect())
                } else if let Some(base) = term.strip_suffix('+') {
                    Term::AtLeast(base.to_string())
                } else {
                    Term::Membership(term.to_string())
                }
            })
            .collect();
        Self { terms }
    }

    /// Whether the expression contains no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The parsed terms, in input order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Evaluate against a registry and a current flag list.
    pub fn matches(&self, registry: &FlagRegistry, list: &str) -> bool {
        let present: HashSet<&str> = list.split_whitespace().collect();
        self.terms
            .iter()
            .all(|term| term.matches(registry, list, &present))
    }
}

impl Term {
    fn matches(&self, registry: &FlagRegistry, list: &str, present: &HashSet<&str>) -> bool {
        match self {
            Self::AnyOf(alternatives) => alternatives.iter().any(|alt| member(alt, present)),
            Self::AtLeast(base) => registry
                .exists(base)
                .is_some_and(|flag| registry.lvl(list) >= flag.lvl),
            Self::Membership(token) => member(token, present),
        }
    }
}

/// Membership rule shared by plain terms and alternation alternatives:
/// a leading `!` inverts an exact test against the raw token set.
fn member(token: &str, present: &HashSet<&str>) -> bool {
    match token.strip_prefix('!') {
        Some(rest) => !present.contains(rest),
        None => present.contains(token),
    }
}
