// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! Process-wide dependency-injection registry.
//!
//! Spec §4.3/§9: the reference implementation's Context/DI registry is a
//! classpath-scanned, effectively-global singleton. Here it is an explicit
//! value threaded into constructors instead: the only public surface is
//! `Context::get`, which returns an existing instance keyed by `(type,
//! optional name)` or constructs one via the caller-supplied builder,
//! resolving the builder's own dependencies by recursively calling `get` on
//! the same `Context`. There is no global/static handle to reach for
//! instead.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// A type registrable in the [`Context`].
///
/// `post_inject` runs exactly once, immediately after construction with the
/// instance's own fields already populated — the sole place a freshly built
/// component may register itself with a Supervisor or ConfigTree it was
/// just handed. `close` runs during [`Context::shutdown`], in the reverse
/// of construction order.
pub trait Component: Any + Send + Sync {
    fn post_inject(self: &Arc<Self>, _ctx: &Context) {}

    fn close(&self) {}
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct Key {
    type_id: TypeId,
    name: Option<String>,
}

struct Inner {
    instances: HashMap<Key, Arc<dyn Any + Send + Sync>>,
    /// `(key, closer)` in construction order; `close()` walks this in
    /// reverse. Kept separate from `instances` because `Arc<dyn Component>`
    /// and `Arc<dyn Any + Send + Sync>` are different trait-object views of
    /// the same underlying `Arc<T>`.
    closers: Vec<(Key, Arc<dyn Component>)>,
}

/// The DI registry itself. Cheap to clone (an `Arc` around a mutex).
#[derive(Clone)]
pub struct Context {
    inner: Arc<Mutex<Inner>>,
}

impl Context {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { instances: HashMap::new(), closers: Vec::new() })) }
    }

    /// Get the existing singleton instance of `T`, or construct one with
    /// `build` (which may itself call `self.get` to resolve its own
    /// dependencies). `name` distinguishes multiple named instances of the
    /// same type; `None` is the type's singleton slot.
    pub fn get<T, B>(&self, name: Option<&str>, build: B) -> Arc<T>
    where
        T: Component,
        B: FnOnce(&Context) -> Arc<T>,
    {
        let key = Key { type_id: TypeId::of::<T>(), name: name.map(str::to_string) };

        if let Some(existing) = self.inner.lock().instances.get(&key) {
            return existing
                .clone()
                .downcast::<T>()
                .unwrap_or_else(|_| unreachable!("Context key collision for {:?}", key.type_id));
        }

        // Built outside the lock: `build` may recursively call `get`, which
        // would deadlock on a non-reentrant mutex.
        let instance = build(self);

        let mut inner = self.inner.lock();
        if let Some(existing) = inner.instances.get(&key) {
            // Another caller raced us and won; keep its result, discard ours.
            return existing
                .clone()
                .downcast::<T>()
                .unwrap_or_else(|_| unreachable!("Context key collision for {:?}", key.type_id));
        }
        inner.instances.insert(key.clone(), instance.clone() as Arc<dyn Any + Send + Sync>);
        inner.closers.push((key, instance.clone() as Arc<dyn Component>));
        drop(inner);

        instance.post_inject(self);
        instance
    }

    /// Look up an already-constructed instance without building one.
    pub fn find<T: Component>(&self, name: Option<&str>) -> Option<Arc<T>> {
        let key = Key { type_id: TypeId::of::<T>(), name: name.map(str::to_string) };
        self.inner.lock().instances.get(&key).cloned().and_then(|a| a.downcast::<T>().ok())
    }

    /// Walk instances in reverse construction order, calling `close` on
    /// each. Best-effort: a panic in one `close` is caught and reported
    /// rather than aborting teardown of the rest.
    pub fn shutdown(&self) -> Vec<String> {
        let closers: Vec<Arc<dyn Component>> = {
            let mut inner = self.inner.lock();
            let ordered: Vec<_> = inner.closers.drain(..).rev().map(|(_, c)| c).collect();
            ordered
        };
        let mut errors = Vec::new();
        for closer in closers {
            if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| closer.close())) {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::warn!(error = %message, "component close() panicked during shutdown");
                errors.push(message);
            }
        }
        errors
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
