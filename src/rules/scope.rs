//! Process-wide scope resolver for named registries.
//!
//! Independent components keep independent rule sets without threading a
//! registry through every call: each resolves its registry by name, typically
//! its own module path via [`scoped_registry!`](crate::scoped_registry).
//! Registries are created lazily on first resolution and live for the process
//! lifetime. Resolution is idempotent: the same name always yields the same
//! shared handle, so rules registered through one handle are visible through
//! every other.
//!
//! Handlers that want isolation instead construct their own [`Registry`] and
//! inject it directly; the scope table is the convenience layer, not the
//! only entry point.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use super::registry::Registry;

/// A registry shared between a handler and the call sites that configure it.
///
/// The lock makes concurrent registration and classification defined
/// behavior, though the expected pattern is still to register rules during
/// startup and classify afterwards.
pub type SharedRegistry = Arc<RwLock<Registry>>;

static SCOPES: OnceLock<RwLock<HashMap<&'static str, SharedRegistry>>> = OnceLock::new();

/// Resolves the registry for the given scope name, creating it on first use.
///
/// Repeated calls with the same name return handles to the same registry.
pub fn scope(name: &'static str) -> SharedRegistry {
    let table = SCOPES.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(registry) = table
        .read()
        .expect("scope table lock poisoned")
        .get(name)
    {
        return Arc::clone(registry);
    }

    let mut scopes = table.write().expect("scope table lock poisoned");
    // Re-check under the write lock; another thread may have created it.
    Arc::clone(scopes.entry(name).or_insert_with(|| {
        debug!(scope = name, "created classification scope");
        Arc::new(RwLock::new(Registry::new()))
    }))
}

/// Resolves the registry scoped to the calling module's path.
///
/// Expands to [`scope`]`(module_path!())`, so two independently authored
/// modules never share a registry unless they share a path.
#[macro_export]
macro_rules! scoped_registry {
    () => {
        $crate::rules::scope(::std::module_path!())
    };
}
