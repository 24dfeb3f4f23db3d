//! A pool of reusable, exclusively checked-out resources.
//!
//! The encryption combinator uses two of these — one per cipher direction —
//! so that a stateful cipher instance is never used by two calls at once.

use alloc::{boxed::Box, vec::Vec};
use core::{
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};
use std::sync::Mutex;

// POOL
// ================================================================================================

/// A pool handing out exclusive, reusable instances of `T`.
///
/// [Pool::acquire] pops a free instance, or builds a fresh one via the
/// factory when none is free; the instance returns to the free list when the
/// guard drops, on every exit path. The pool never blocks — bounding
/// concurrent instance counts is the caller's concern, and in practice the
/// pool holds at most as many instances as there were concurrent calls.
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Pool<T> {
    /// Creates an empty pool that builds instances with the provided
    /// factory.
    pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self { free: Mutex::new(Vec::new()), factory: Box::new(factory) }
    }

    /// Creates a pool pre-populated with `count` instances.
    pub fn with_initial(count: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let pool = Self::new(factory);
        {
            let mut free = pool.lock_free();
            for _ in 0..count {
                free.push((pool.factory)());
            }
        }
        pool
    }

    /// Checks an instance out of the pool.
    pub fn acquire(&self) -> PoolGuard<'_, T> {
        let instance = self.lock_free().pop().unwrap_or_else(|| (self.factory)());
        PoolGuard { pool: self, instance: ManuallyDrop::new(instance) }
    }

    /// Returns the number of instances currently checked in.
    pub fn free_count(&self) -> usize {
        self.lock_free().len()
    }

    fn release(&self, instance: T) {
        self.lock_free().push(instance);
    }

    fn lock_free(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // a poisoned lock only means another thread panicked while holding
        // it; the free list itself is still a valid Vec
        self.free.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> core::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool").field("free", &self.free_count()).finish_non_exhaustive()
    }
}

// POOL GUARD
// ================================================================================================

/// Exclusive handle to a pooled instance; returns it to the pool on drop.
pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    instance: ManuallyDrop<T>,
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.instance
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.instance
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the instance is taken exactly once, here, and `self` is
        // never used again after drop
        let instance = unsafe { ManuallyDrop::take(&mut self.instance) };
        self.pool.release(instance);
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    #[test]
    fn acquire_builds_when_empty_and_reuses_after_release() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let pool = Pool::new(move || counter.fetch_add(1, Ordering::Relaxed));

        {
            let first = pool.acquire();
            assert_eq!(*first, 0);
            assert_eq!(pool.free_count(), 0);
        }
        assert_eq!(pool.free_count(), 1);

        // the released instance comes back instead of a new one
        let again = pool.acquire();
        assert_eq!(*again, 0);
        assert_eq!(built.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn concurrent_checkouts_get_distinct_instances() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let pool = Pool::new(move || c.fetch_add(1, Ordering::Relaxed));

        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(*a, *b);
        drop(a);
        drop(b);
        assert_eq!(pool.free_count(), 2);
    }

    #[test]
    fn with_initial_prepopulates() {
        let pool = Pool::with_initial(3, || 7u32);
        assert_eq!(pool.free_count(), 3);
    }

    #[test]
    fn guard_allows_mutation() {
        let pool = Pool::new(|| 0u32);
        {
            let mut guard = pool.acquire();
            *guard = 99;
        }
        assert_eq!(*pool.acquire(), 99);
    }

    #[test]
    fn shared_across_threads() {
        let pool = Arc::new(Pool::new(|| 0u64));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let mut guard = pool.acquire();
                        *guard += 1;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // every checkout was returned; drain the free list and count
        let mut guards = Vec::new();
        while pool.free_count() > 0 {
            guards.push(pool.acquire());
        }
        let total: u64 = guards.iter().map(|g| **g).sum();
        assert_eq!(total, 400);
    }
}
