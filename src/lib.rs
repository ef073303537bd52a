//! Triage - failure capture and rule-based error classification
//!
//! Call sites signal failed preconditions with [`ensure`] or wrap delegated
//! operations with [`check`]; the resulting [`Failure`] record (original
//! fault, backtrace, detected flag) propagates with `?` to a [`Handler`] at
//! the top of the call chain, which classifies the fault against a
//! [`Registry`] of rules, persists a case file, and reports the normalized
//! outcome.
//!
//! ```
//! use triage::{check, Fault, Handler, Registry};
//!
//! fn copy_to_disk() -> Result<(), Fault> {
//!     Err(Fault::new("disk: no space left on device"))
//! }
//!
//! let disk_full = Fault::new("storage exhausted");
//!
//! let mut registry = Registry::new();
//! registry.register_prefix("disk:", disk_full.clone());
//!
//! let handler = Handler::with_registry(registry);
//! let result = handler.run(|| {
//!     check(copy_to_disk())?;
//!     Ok(())
//! });
//! assert_eq!(result.unwrap_err(), disk_full);
//! ```

pub mod capture;
pub mod casefile;
pub mod fault;
pub mod handler;
pub mod rules;

pub use capture::{check, check_error, ensure, Failure};
pub use fault::Fault;
pub use handler::Handler;
pub use rules::{scope, MatchTier, Pattern, Registry, RegistryError, SharedRegistry, Verdict};
