//! Locking discipline of the formula pool.
//!
//! With the `thread-safe` feature the pool state sits behind a reentrant
//! mutex: releasing a formula may drop the last handles to its children,
//! which re-enters the pool while the lock is already held. Without the
//! feature the state is a bare `RefCell`, which makes the pool `!Sync` and
//! leaves it to the type system to keep it on one thread.
//!
//! In both modes callers must end every `borrow_mut()` before dropping
//! formula handles.

use std::cell::RefCell;
use std::ops::Deref;

#[cfg(feature = "thread-safe")]
pub struct PoolLock<S> {
    inner: parking_lot::ReentrantMutex<RefCell<S>>,
}

#[cfg(feature = "thread-safe")]
impl<S> PoolLock<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: parking_lot::ReentrantMutex::new(RefCell::new(state)),
        }
    }

    pub fn lock(&self) -> impl Deref<Target = RefCell<S>> + '_ {
        self.inner.lock()
    }
}

#[cfg(not(feature = "thread-safe"))]
pub struct PoolLock<S> {
    inner: RefCell<S>,
}

#[cfg(not(feature = "thread-safe"))]
impl<S> PoolLock<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: RefCell::new(state),
        }
    }

    pub fn lock(&self) -> impl Deref<Target = RefCell<S>> + '_ {
        &self.inner
    }
}
