//! Classification of raw faults against a registry's rules.
//!
//! Matching precedence is fixed, first match wins: exact membership, then
//! direct mapping, then pattern rules in registration order, then the
//! fallback. Explicit registrations always beat fuzzy pattern matches; the
//! fallback is strictly a backstop. An unmatched fault is returned unchanged
//! with [`MatchTier::Unmatched`] so the dispatcher can surface it loudly
//! rather than miscategorize it silently.

use crate::fault::Fault;

use super::registry::Registry;

/// Which rule tier produced a classification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    /// The fault is registered as exact and passed through unchanged.
    Exact,
    /// A direct mapping substituted the fault.
    Mapped,
    /// A pattern rule matched the fault's message text.
    Pattern,
    /// No rule matched; the configured fallback was used.
    Fallback,
    /// No rule matched and no fallback is configured; the fault passed
    /// through unchanged.
    Unmatched,
}

/// The outcome of classifying a fault: the reportable fault plus the tier
/// that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// The classified, reportable fault.
    pub fault: Fault,
    /// The rule tier that decided the outcome.
    pub tier: MatchTier,
}

impl Registry {
    /// Classifies a raw fault against this registry's rules.
    pub fn classify(&self, fault: &Fault) -> Verdict {
        if self.exact.contains(fault) {
            return Verdict {
                fault: fault.clone(),
                tier: MatchTier::Exact,
            };
        }

        if let Some(mapped) = self.mappings.get(fault) {
            return Verdict {
                fault: mapped.clone(),
                tier: MatchTier::Mapped,
            };
        }

        for (pattern, target) in &self.patterns {
            if pattern.matches(fault.message()) {
                return Verdict {
                    fault: target.clone(),
                    tier: MatchTier::Pattern,
                };
            }
        }

        if let Some(fallback) = &self.fallback {
            return Verdict {
                fault: fallback.clone(),
                tier: MatchTier::Fallback,
            };
        }

        Verdict {
            fault: fault.clone(),
            tier: MatchTier::Unmatched,
        }
    }
}
