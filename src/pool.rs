//! The formula pool: interning, usage bookkeeping and Tseitin variables.
//!
//! A [`FormulaPool`] is an explicitly owned value; every constructor is a
//! method on it and every [`Formula`] keeps its pool alive. Cloning the pool
//! is cheap and yields another handle to the same table.
//!
//! Every operation that touches the table runs under the pool lock
//! (see [`crate::sync`]), so a concurrent reader either sees a fully published
//! pair or nothing, and two threads racing to publish the same shape end up
//! with the same node.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::node::{Content, NodePair};
use crate::reference::Formula;
use crate::shape::Shape;
use crate::sync::PoolLock;
use crate::table::UniqueTable;
use crate::theory::Theory;
use crate::types::NodeId;
use crate::variables::VariablePool;

pub(crate) struct PoolShared<T: Theory> {
    pub(crate) table: PoolLock<UniqueTable<T>>,
    constants: Arc<NodePair<T>>,
    variables: Arc<VariablePool>,
}

impl<T: Theory> PoolShared<T> {
    pub(crate) fn register(&self, id: NodeId) {
        let guard = self.table.lock();
        guard.borrow_mut().register(id);
    }

    /// Release one usage of `id`.
    ///
    /// Dropping a dead pair drops the handles to its children, which re-enters
    /// here. Those nested releases are only queued, so freeing a formula takes
    /// constant stack whatever its depth.
    pub(crate) fn release(&self, id: NodeId) {
        let guard = self.table.lock();
        if !guard.borrow_mut().enqueue_release(id) {
            return;
        }
        loop {
            let next = guard.borrow_mut().release_next();
            match next {
                Some(garbage) => drop(garbage),
                None => break,
            }
        }
    }
}

pub struct FormulaPool<T: Theory> {
    pub(crate) shared: Arc<PoolShared<T>>,
}

impl<T: Theory> FormulaPool<T> {
    /// Create a pool expecting about `capacity` formulas, drawing fresh
    /// variables from the process-wide [`VariablePool`].
    pub fn new(capacity: usize) -> Self {
        Self::with_variables(capacity, VariablePool::global())
    }

    /// Create a pool drawing fresh variables from `variables`.
    pub fn with_variables(capacity: usize, variables: Arc<VariablePool>) -> Self {
        let table = UniqueTable::new(capacity);
        let constants = table.constants();
        Self {
            shared: Arc::new(PoolShared {
                table: PoolLock::new(table),
                constants,
                variables,
            }),
        }
    }

    pub fn variables(&self) -> &Arc<VariablePool> {
        &self.shared.variables
    }

    pub(crate) fn handle(&self, pair: Arc<NodePair<T>>, negated: bool) -> Formula<T> {
        Formula::from_registered(self.shared.clone(), pair, negated)
    }

    /// The TRUE formula.
    pub fn true_formula(&self) -> Formula<T> {
        self.shared.register(NodeId::TRUE);
        self.handle(self.shared.constants.clone(), false)
    }

    /// The FALSE formula.
    pub fn false_formula(&self) -> Formula<T> {
        self.shared.register(NodeId::FALSE);
        self.handle(self.shared.constants.clone(), true)
    }

    pub fn constant(&self, value: bool) -> Formula<T> {
        if value {
            self.true_formula()
        } else {
            self.false_formula()
        }
    }

    /// Return the canonical formula for `base`, publishing it (and its
    /// negation) if the shape is new.
    ///
    /// `base` must already be canonical and must not be a NOT node.
    pub(crate) fn intern(&self, base: Content<T>) -> Formula<T> {
        self.intern_with_difficulty(base, None)
    }

    fn intern_with_difficulty(&self, base: Content<T>, difficulty: Option<f64>) -> Formula<T> {
        assert!(!matches!(base, Shape::Not), "NOT nodes are never interned");
        let key = base.fmap_ref(|f| f.id());
        let guard = self.shared.table.lock();
        let (pair, discarded) = {
            let mut table = guard.borrow_mut();
            match table.find(&key) {
                Some(pair) => (pair, Some(base)),
                None => (table.publish(base, difficulty), None),
            }
        };
        // Releases the candidate's children outside the borrow.
        drop(discarded);
        drop(guard);
        self.handle(pair, false)
    }

    /// Number of base formulas in the lookup table (TRUE/FALSE count as one).
    pub fn size(&self) -> usize {
        self.shared.table.lock().borrow().size()
    }

    /// Usages registered on the base of `formula`.
    pub fn usages(&self, formula: &Formula<T>) -> usize {
        self.shared.table.lock().borrow().usages(formula.id())
    }

    /// Whether `a` is the negation of `b`.
    pub fn formulas_inverse(&self, a: &Formula<T>, b: &Formula<T>) -> bool {
        a.is_negation_of(b)
    }

    /// The Tseitin variable of `formula`, or TRUE if it has none.
    ///
    /// Never allocates a placeholder.
    pub fn get_tseitin_var(&self, formula: &Formula<T>) -> Formula<T> {
        let found = self.shared.table.lock().borrow_mut().tseitin_var(formula.id());
        match found {
            Some(pair) => self.handle(pair, false),
            None => self.true_formula(),
        }
    }

    /// The Tseitin variable of `formula`, allocating a fresh Boolean variable
    /// the first time.
    pub fn create_tseitin_var(&self, formula: &Formula<T>) -> Formula<T> {
        let guard = self.shared.table.lock();
        let existing = guard.borrow_mut().tseitin_var(formula.id());
        if let Some(pair) = existing {
            return self.handle(pair, false);
        }

        // The placeholder must be a node nobody else refers to.
        let var = loop {
            let var = self.shared.variables.fresh_boolean();
            if !guard.borrow().contains_key(&Shape::Bool(var)) {
                break var;
            }
            debug!("skip fresh variable {}: already in the pool", var);
        };
        // Re-enters the lock we are holding.
        let placeholder = self.intern_with_difficulty(Shape::Bool(var), Some(formula.difficulty()));
        guard.borrow_mut().map_tseitin_var(formula.id(), placeholder.id());
        debug!("create_tseitin_var({}) -> {}", formula, placeholder);
        placeholder
    }
}

impl<T: Theory> Clone for FormulaPool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Theory> Default for FormulaPool<T> {
    fn default() -> Self {
        FormulaPool::new(10000)
    }
}

impl<T: Theory> fmt::Debug for FormulaPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaPool").field("size", &self.size()).finish()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::shape::FormulaType;
    use crate::testing::{pool, vars, Mock, F};
    use crate::types::Variable;

    #[test]
    fn test_constants() {
        let pool = pool();
        let t = pool.true_formula();
        let f = pool.false_formula();
        assert_eq!(t.id(), NodeId::TRUE);
        assert_eq!(f.id(), NodeId::FALSE);
        assert_eq!(-&t, f);
        assert!(pool.formulas_inverse(&t, &f));
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_ids_are_allocated_in_pairs() {
        let pool = pool();
        let v = vars(&pool, 3);
        let ids: Vec<u32> = v.iter().map(|f| f.id().get()).collect();
        assert_eq!(ids, vec![3, 5, 7]);
        assert_eq!(pool.size(), 4);
    }

    #[test]
    fn test_usage_lifecycle() {
        let pool = pool();
        let a = pool.variable(Variable::boolean(1));
        assert_eq!(pool.usages(&a), 1);

        let b = a.clone();
        let not_a = -a.clone();
        assert_eq!(pool.usages(&a), 3);
        assert_eq!(pool.usages(&not_a), 3);

        drop(b);
        drop(not_a);
        assert_eq!(pool.usages(&a), 1);

        let again = pool.variable(Variable::boolean(1));
        assert_eq!(pool.usages(&a), 2);
        drop(again);
        drop(a);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_children_are_freed_with_parent() {
        let pool = pool();
        let v = vars(&pool, 3);
        let f = pool.or([pool.and([v[0].clone(), v[1].clone()]), v[2].clone()]);
        assert_eq!(pool.size(), 6);
        drop(v);
        assert_eq!(pool.size(), 6);
        drop(f);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let pool = pool();
        let a = pool.fresh_variable();
        let id = a.id();
        drop(a);
        let b = pool.fresh_variable();
        assert!(b.id() > id);
    }

    #[test]
    fn test_interning_existing_shape_keeps_size() {
        let pool = pool();
        let v = vars(&pool, 2);
        let f = pool.and(v.clone());
        let size = pool.size();
        let g = pool.and([v[1].clone(), v[0].clone()]);
        assert_eq!(f, g);
        assert_eq!(pool.size(), size);
        assert_eq!(pool.usages(&v[0]), 2);
    }

    #[test]
    fn test_get_tseitin_var_without_mapping() {
        let pool = pool();
        let f = pool.and(vars(&pool, 2));
        let size = pool.size();
        assert!(pool.get_tseitin_var(&f).is_true());
        assert_eq!(pool.size(), size);
    }

    #[test]
    fn test_create_tseitin_var_is_idempotent() {
        let pool = pool();
        let f = pool.and(vars(&pool, 2));
        let v = pool.create_tseitin_var(&f);
        assert_eq!(v.formula_type(), FormulaType::Bool);
        assert!(v.is_base());
        assert_eq!(v.difficulty(), f.difficulty());
        assert_eq!(pool.create_tseitin_var(&f), v);
        assert_eq!(pool.get_tseitin_var(&f), v);
        // Each polarity has its own placeholder.
        assert!(pool.get_tseitin_var(&-&f).is_true());
        assert_ne!(pool.create_tseitin_var(&-&f), v);
    }

    #[test]
    fn test_tseitin_var_pins_formula() {
        let pool = pool();
        let v = vars(&pool, 2);
        let f = pool.and(v.clone());
        let id = f.id();
        let placeholder = pool.create_tseitin_var(&f);
        let size = pool.size();

        drop(f);
        assert_eq!(pool.size(), size);

        // Rebuilding revives the same node and mapping.
        let f = pool.and(v.clone());
        assert_eq!(f.id(), id);
        assert_eq!(pool.get_tseitin_var(&f), placeholder);
        drop(f);

        drop(placeholder);
        drop(v);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_formula_pins_tseitin_var() {
        let pool = pool();
        let f = pool.xor(vars(&pool, 2));
        let placeholder = pool.create_tseitin_var(&f);
        let id = placeholder.id();
        drop(placeholder);

        let again = pool.get_tseitin_var(&f);
        assert_eq!(again.id(), id);
        drop(again);

        drop(f);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_pool_handles_share_table() {
        let pool = pool();
        let other = pool.clone();
        let a = pool.variable(Variable::boolean(1));
        let b = other.variable(Variable::boolean(1));
        assert_eq!(a, b);
        assert_eq!(other.size(), 2);
    }

    #[test]
    fn test_variable_reserves_its_id() {
        let variables = Arc::new(VariablePool::new());
        let pool = FormulaPool::<Mock>::with_variables(16, variables.clone());
        let _b5 = pool.variable(Variable::boolean(5));
        assert_eq!(variables.fresh_boolean().id(), 6);
    }

    #[test]
    fn test_tseitin_var_is_never_a_user_variable() {
        let pool = FormulaPool::<Mock>::default();
        let p = pool.variable(Variable::boolean(1));
        let q = pool.variable(Variable::boolean(2));
        let f = pool.and([p.clone(), q.clone()]);
        let t = pool.create_tseitin_var(&f);
        assert_ne!(t, p);
        assert_ne!(t, q);
        assert_eq!(pool.usages(&t), 1);
        assert_eq!(t.difficulty(), f.difficulty());
        assert!(t.variable().is_some_and(|v| v.id() > 2));
    }

    #[test]
    fn test_tseitin_chain_keeps_first_placeholder() {
        let pool = pool();
        let f = pool.and(vars(&pool, 2));
        let v = pool.create_tseitin_var(&f);
        let w = pool.create_tseitin_var(&v);
        let (v_id, w_id) = (v.id(), w.id());

        drop(w);
        drop(v);
        assert_eq!(pool.get_tseitin_var(&f).id(), v_id);
        let v = pool.create_tseitin_var(&f);
        assert_eq!(v.id(), v_id);
        assert_eq!(pool.get_tseitin_var(&v).id(), w_id);

        drop(v);
        drop(f);
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_deep_formula_is_freed() {
        let pool = pool();
        let mut f = pool.fresh_variable();
        for _ in 0..100_000 {
            let v = pool.fresh_variable();
            f = pool.implies(v, f);
        }
        assert_eq!(pool.size(), 200_002);
        drop(f);
        assert_eq!(pool.size(), 1);
    }

    #[cfg(feature = "thread-safe")]
    #[test]
    fn test_concurrent_interning() {
        let pool = pool();
        let v = vars(&pool, 4);
        let results: Vec<F> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let pool = &pool;
                    let v = &v;
                    s.spawn(move || {
                        let mut ops = v.clone();
                        ops.rotate_left(i % 4);
                        pool.or([pool.and(ops.clone()), pool.xor(ops)])
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        // Variables, AND, XOR and OR, plus TRUE/FALSE.
        assert_eq!(pool.size(), 8);
        assert_eq!(pool.usages(&results[0]), 8);
        drop(results);
        assert_eq!(pool.size(), 5);
    }
}
