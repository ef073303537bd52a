//! Classification rules: registries, the matching engine, and scope
//! resolution.

pub mod classify;
pub mod registry;
pub mod scope;

// Re-export main types for convenient access
pub use classify::{MatchTier, Verdict};
pub use registry::{Pattern, Registry, RegistryError};
pub use scope::{scope, SharedRegistry};
