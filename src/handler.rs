//! Recovery dispatcher for guarded call chains.
//!
//! A [`Handler`] sits at the outermost frame of a guarded call chain. The
//! chain's functions return `Result<_, Failure>` and propagate with `?`; the
//! handler receives the terminal result, classifies the captured fault
//! against its registry, persists the record to a case file, and either
//! invokes the configured callback ([`Handler::run`]) or hands the classified
//! fault back as an ordinary error ([`Handler::recover`]).
//!
//! The handler is a targeted recovery layer, not a catch-all: it never
//! touches panics, which propagate past it to any outer handler unchanged.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::capture::Failure;
use crate::casefile;
use crate::fault::Fault;
use crate::rules::{scope, MatchTier, Registry, SharedRegistry};

/// Callback invoked after dispatch with the detected flag and the classified
/// fault.
type FailureAction = Box<dyn Fn(bool, &Fault) + Send + Sync>;

/// The recovery dispatcher for one guarded call chain.
pub struct Handler {
    registry: SharedRegistry,
    case_file: Option<PathBuf>,
    action: Option<FailureAction>,
    unexpected: Option<Fault>,
}

impl Handler {
    /// Creates a handler classifying against a shared registry handle.
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            case_file: None,
            action: None,
            unexpected: None,
        }
    }

    /// Creates a handler owning its registry outright.
    ///
    /// The usual choice when rules are registered once, up front, by the same
    /// code that constructs the handler.
    pub fn with_registry(registry: Registry) -> Self {
        Self::new(Arc::new(RwLock::new(registry)))
    }

    /// Creates a handler bound to a named scope from the process-wide table.
    ///
    /// Call sites elsewhere in the same scope configure rules through
    /// [`scope`] or [`scoped_registry!`](crate::scoped_registry) and this
    /// handler sees them.
    pub fn for_scope(name: &'static str) -> Self {
        Self::new(scope(name))
    }

    /// Sets the destination hint for case files.
    ///
    /// Without one, each dispatch writes to a fresh temporary file.
    pub fn case_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.case_file = Some(path.into());
        self
    }

    /// Sets a callback invoked by [`Handler::run`] after a failure is
    /// dispatched, with the detected flag and the classified fault.
    pub fn on_failure(mut self, action: impl Fn(bool, &Fault) + Send + Sync + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Sets a substitute fault reported when no rule matches and no fallback
    /// is configured.
    ///
    /// Without one, an unmatched fault passes through unchanged. Either way
    /// the miss is logged loudly; missing registrations should be visible
    /// during development, not silently miscategorized.
    pub fn unexpected_fault(mut self, fault: Fault) -> Self {
        self.unexpected = Some(fault);
        self
    }

    /// Returns the handler's registry handle, for registering rules.
    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.registry)
    }

    /// Runs a guarded call chain to completion.
    ///
    /// `Ok` passes through untouched. On failure the record is classified,
    /// persisted to the case file, and reported to the callback; the
    /// classified fault becomes the returned error. Panics raised by `op`
    /// are not caught.
    ///
    /// # Panics
    ///
    /// Panics if no writable case-file destination can be obtained; a
    /// failure record that cannot be persisted is a hard dependency fault.
    pub fn run<T>(&self, op: impl FnOnce() -> Result<T, Failure>) -> Result<T, Fault> {
        match op() {
            Ok(value) => Ok(value),
            Err(failure) => {
                let detected = failure.detected();
                let classified = self.dispatch(failure);
                if let Some(action) = &self.action {
                    action(detected, &classified);
                }
                Err(classified)
            }
        }
    }

    /// Converts a guarded chain's terminal result into an ordinary error at
    /// a function boundary.
    ///
    /// Dispatches exactly like [`Handler::run`] but never invokes the
    /// callback: the classified fault is written into the returned `Result`
    /// instead.
    ///
    /// # Panics
    ///
    /// Panics under the same case-file condition as [`Handler::run`].
    pub fn recover<T>(&self, result: Result<T, Failure>) -> Result<T, Fault> {
        result.map_err(|failure| self.dispatch(failure))
    }

    /// Classifies and persists one failure record, consuming it.
    fn dispatch(&self, failure: Failure) -> Fault {
        let verdict = self
            .registry
            .read()
            .expect("registry lock poisoned")
            .classify(failure.fault());

        let classified = match verdict.tier {
            MatchTier::Unmatched => {
                warn!(
                    fault = %failure.fault().message(),
                    trace = %failure.trace(),
                    "no classification rule matched; reporting fault as-is"
                );
                match &self.unexpected {
                    Some(substitute) => substitute.clone(),
                    None => verdict.fault,
                }
            }
            tier => {
                debug!(
                    fault = %failure.fault().message(),
                    classified = %verdict.fault.message(),
                    ?tier,
                    "fault classified"
                );
                verdict.fault
            }
        };

        match casefile::persist(&failure, self.case_file.as_deref()) {
            Ok(_) => classified,
            Err(e) => panic!("failed to persist case file: {e}"),
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("case_file", &self.case_file)
            .field("has_action", &self.action.is_some())
            .field("unexpected", &self.unexpected)
            .finish_non_exhaustive()
    }
}
