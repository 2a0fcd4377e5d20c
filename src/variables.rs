//! Source of fresh variables.
//!
//! Tseitin placeholders need Boolean variables nobody else has used. The
//! allocator is a plain atomic counter; a process-wide instance is available
//! through [`VariablePool::global`], but pools may also be given their own.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

use log::trace;

use crate::types::{Variable, VariableType};

#[derive(Debug)]
pub struct VariablePool {
    next: AtomicU32,
}

static GLOBAL: OnceLock<Arc<VariablePool>> = OnceLock::new();

impl VariablePool {
    /// Create an allocator whose first fresh variable has id `1`.
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create an allocator whose first fresh variable has id `first`.
    pub const fn starting_at(first: u32) -> Self {
        assert!(first != 0, "Variable IDs must be >= 1");
        Self {
            next: AtomicU32::new(first),
        }
    }

    /// The process-wide allocator.
    pub fn global() -> Arc<VariablePool> {
        GLOBAL.get_or_init(|| Arc::new(VariablePool::new())).clone()
    }

    /// Allocate a variable of the given sort that was never returned before.
    pub fn fresh(&self, ty: VariableType) -> Variable {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        assert_ne!(id, u32::MAX, "Variable pool is exhausted");
        let var = Variable::new(id, ty);
        trace!("fresh variable {}", var);
        var
    }

    pub fn fresh_boolean(&self) -> Variable {
        self.fresh(VariableType::Bool)
    }

    /// Make sure ids up to and including `id` are never handed out.
    ///
    /// Called for every variable created by hand.
    pub fn reserve_until(&self, id: u32) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for VariablePool {
    fn default() -> Self {
        Self::new()
    }
}
