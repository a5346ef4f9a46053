// glbridge/src/registry.rs
//
//! Maps native context handles back to the contexts that own them.

use crate::{ContextID, NativeContextHandle};

use fnv::FnvHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe map from native context handle to the ID of the owning `Context`.
///
/// Every context created by a `Device` has exactly one entry here for as long as it is alive.
/// A single lock covers registration, removal and lookup, as well as ID allocation.
pub struct ContextRegistry {
    state: Mutex<RegistryState>,
}

struct RegistryState {
    contexts: FnvHashMap<NativeContextHandle, ContextID>,
    next_context_id: ContextID,
}

impl Default for ContextRegistry {
    fn default() -> ContextRegistry {
        ContextRegistry::new()
    }
}

impl ContextRegistry {
    pub fn new() -> ContextRegistry {
        ContextRegistry {
            state: Mutex::new(RegistryState {
                contexts: FnvHashMap::default(),
                next_context_id: ContextID(0),
            }),
        }
    }

    /// Allocates a fresh ID and records `handle` as owned by it.
    pub fn register(&self, handle: NativeContextHandle) -> ContextID {
        let mut state = self.lock();
        let id = state.next_context_id;
        state.next_context_id.0 += 1;
        if let Some(stale) = state.contexts.insert(handle, id) {
            warn!("glbridge: native context {:#x} was still registered to context {}",
                  handle.as_u64(),
                  stale.0);
        }
        id
    }

    /// Forgets `handle`, returning the ID it was registered to.
    pub fn unregister(&self, handle: NativeContextHandle) -> Option<ContextID> {
        self.lock().contexts.remove(&handle)
    }

    /// The owner of `handle`, or `None` if it isn't a context this registry knows about.
    pub fn lookup(&self, handle: NativeContextHandle) -> Option<ContextID> {
        self.lock().contexts.get(&handle).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().contexts.is_empty()
    }

    fn lock(&self) -> MutexGuard<RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
