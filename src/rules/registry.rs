//! Rule registry for a single classification scope.
//!
//! A [`Registry`] holds the rules one handler classifies against: an exact
//! set of faults that pass through unchanged, direct fault-to-fault mappings,
//! ordered pattern rules matched against message text, and an optional
//! fallback. Registration is plain key-value configuration: re-registering a
//! key overwrites silently, duplicates are not errors.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use thiserror::Error;

use crate::fault::Fault;

/// Errors that can occur while registering rules.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The supplied regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A pattern rule matched against a fault's message text.
#[derive(Debug)]
pub enum Pattern {
    /// Matches when the message starts with the literal prefix.
    Prefix(String),
    /// Matches when the compiled regex matches anywhere in the message.
    Regex(Regex),
}

impl Pattern {
    /// Checks whether this pattern matches the given message text.
    pub fn matches(&self, message: &str) -> bool {
        match self {
            Pattern::Prefix(prefix) => message.starts_with(prefix.as_str()),
            Pattern::Regex(regex) => regex.is_match(message),
        }
    }

    /// Returns the source text the pattern was registered with.
    pub fn source(&self) -> &str {
        match self {
            Pattern::Prefix(prefix) => prefix,
            Pattern::Regex(regex) => regex.as_str(),
        }
    }
}

/// Classification rules for one scope.
///
/// Pattern rules are kept in registration order and the first matching
/// pattern wins, so overlapping patterns behave deterministically: register
/// the more specific pattern first.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) exact: HashSet<Fault>,
    pub(crate) mappings: HashMap<Fault, Fault>,
    pub(crate) patterns: Vec<(Pattern, Fault)>,
    pub(crate) fallback: Option<Fault>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fault that must pass through classification unchanged.
    pub fn register_exact(&mut self, fault: Fault) {
        self.exact.insert(fault);
    }

    /// Registers a direct substitution: `from` classifies as `to`.
    ///
    /// Re-registering the same source fault overwrites the previous target.
    pub fn register_mapping(&mut self, from: Fault, to: Fault) {
        self.mappings.insert(from, to);
    }

    /// Registers a literal message-prefix rule.
    ///
    /// Re-registering an identical prefix replaces its target in place,
    /// keeping the original position in the match order.
    pub fn register_prefix(&mut self, prefix: impl Into<String>, fault: Fault) {
        self.insert_pattern(Pattern::Prefix(prefix.into()), fault);
    }

    /// Registers a regular-expression rule matched against message text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPattern`] if the regex fails to compile.
    pub fn register_regex(&mut self, pattern: &str, fault: Fault) -> Result<(), RegistryError> {
        let regex = Regex::new(pattern)?;
        self.insert_pattern(Pattern::Regex(regex), fault);
        Ok(())
    }

    /// Sets the fallback fault used when no other rule matches. Overwrites.
    pub fn set_fallback(&mut self, fault: Fault) {
        self.fallback = Some(fault);
    }

    /// Returns the configured fallback fault, if any.
    pub fn fallback(&self) -> Option<&Fault> {
        self.fallback.as_ref()
    }

    /// Returns the registered pattern rules in match order.
    pub fn patterns(&self) -> &[(Pattern, Fault)] {
        &self.patterns
    }

    /// Returns the total number of registered rules, fallback included.
    pub fn rule_count(&self) -> usize {
        self.exact.len()
            + self.mappings.len()
            + self.patterns.len()
            + usize::from(self.fallback.is_some())
    }

    fn insert_pattern(&mut self, pattern: Pattern, fault: Fault) {
        if let Some(slot) = self
            .patterns
            .iter_mut()
            .find(|(existing, _)| existing.source() == pattern.source())
        {
            *slot = (pattern, fault);
        } else {
            self.patterns.push((pattern, fault));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_has_no_rules() {
        let registry = Registry::new();
        assert_eq!(registry.rule_count(), 0);
        assert!(registry.fallback().is_none());
        assert!(registry.patterns().is_empty());
    }

    #[test]
    fn test_register_exact_is_idempotent() {
        let mut registry = Registry::new();
        let fault = Fault::new("known");

        registry.register_exact(fault.clone());
        registry.register_exact(fault);

        assert_eq!(registry.rule_count(), 1);
    }

    #[test]
    fn test_register_mapping_last_write_wins() {
        let mut registry = Registry::new();
        let from = Fault::new("raw");
        let first = Fault::new("first target");
        let second = Fault::new("second target");

        registry.register_mapping(from.clone(), first);
        registry.register_mapping(from.clone(), second.clone());

        assert_eq!(registry.rule_count(), 1);
        assert_eq!(registry.mappings.get(&from), Some(&second));
    }

    #[test]
    fn test_prefix_pattern_matches_start_only() {
        let pattern = Pattern::Prefix("disk:".to_string());
        assert!(pattern.matches("disk: no space"));
        assert!(!pattern.matches("bad disk: no space"));
    }

    #[test]
    fn test_regex_pattern_matches_anywhere() {
        let mut registry = Registry::new();
        registry
            .register_regex(r"(?i)time(d)?\s*out", Fault::new("timeout"))
            .unwrap();

        let (pattern, _) = &registry.patterns()[0];
        assert!(pattern.matches("operation Timed Out after 30s"));
        assert!(!pattern.matches("operation failed"));
    }

    #[test]
    fn test_register_regex_rejects_invalid_pattern() {
        let mut registry = Registry::new();
        let result = registry.register_regex(r"(unclosed", Fault::new("bad"));
        assert!(matches!(result, Err(RegistryError::InvalidPattern(_))));
    }

    #[test]
    fn test_reregistered_pattern_keeps_position() {
        let mut registry = Registry::new();
        let first = Fault::new("first");
        let replacement = Fault::new("replacement");
        let second = Fault::new("second");

        registry.register_prefix("disk:", first);
        registry.register_prefix("net:", second);
        registry.register_prefix("disk:", replacement.clone());

        assert_eq!(registry.patterns().len(), 2);
        let (pattern, target) = &registry.patterns()[0];
        assert_eq!(pattern.source(), "disk:");
        assert_eq!(target, &replacement);
    }

    #[test]
    fn test_set_fallback_overwrites() {
        let mut registry = Registry::new();
        let first = Fault::new("first fallback");
        let second = Fault::new("second fallback");

        registry.set_fallback(first);
        registry.set_fallback(second.clone());

        assert_eq!(registry.fallback(), Some(&second));
    }
}
