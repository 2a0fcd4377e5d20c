//! The unique table behind a formula pool.
//!
//! Holds every published [`NodePair`] keyed by the shape of its base node,
//! the usage count of each pair, the id allocator and both directions of the
//! Tseitin mapping. Nothing here takes a lock; [`crate::pool`] wraps the table
//! in one.
//!
//! Deleting a pair never drops it in place: removed pairs are handed back to
//! the caller, who drops them once the table is no longer borrowed. Dropping a
//! pair drops the handles to its children, which re-enters the table.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::node::{Content, Key, NodePair};
use crate::shape::Shape;
use crate::theory::Theory;
use crate::types::NodeId;

struct Slot<T: Theory> {
    pair: Arc<NodePair<T>>,
    /// Handles pointing at either polarity of the pair.
    usages: usize,
}

/// Pairs removed from the table, to be dropped outside the borrow.
pub type Garbage<T> = Vec<Arc<NodePair<T>>>;

pub struct UniqueTable<T: Theory> {
    lookup: HashMap<Key<T>, NodeId>,
    slots: HashMap<NodeId, Slot<T>>,
    next_id: u32,
    /// Formula (either polarity) -> its placeholder variable (base polarity).
    tseitin_vars: HashMap<NodeId, NodeId>,
    /// Placeholder variable -> the formula it stands for.
    tseitin_owners: HashMap<NodeId, NodeId>,
    /// Releases queued while dead pairs are being dropped.
    pending: Vec<NodeId>,
    draining: bool,
}

impl<T: Theory> UniqueTable<T> {
    /// Create a table with room for `capacity` pairs, containing TRUE/FALSE.
    pub fn new(capacity: usize) -> Self {
        let mut table = Self {
            lookup: HashMap::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            next_id: NodeId::TRUE.get(),
            tseitin_vars: HashMap::new(),
            tseitin_owners: HashMap::new(),
            pending: Vec::new(),
            draining: false,
        };
        let constants = table.publish(Shape::True, None);
        assert_eq!(constants.id, NodeId::TRUE);
        table
    }

    pub fn constants(&self) -> Arc<NodePair<T>> {
        self.slot(NodeId::TRUE).pair.clone()
    }

    fn slot(&self, id: NodeId) -> &Slot<T> {
        self.slots
            .get(&id.base())
            .unwrap_or_else(|| panic!("Formula {} is not in the pool", id))
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot<T> {
        self.slots
            .get_mut(&id.base())
            .unwrap_or_else(|| panic!("Formula {} is not in the pool", id))
    }

    /// Number of base entries in the lookup table.
    pub fn size(&self) -> usize {
        self.lookup.len()
    }

    pub fn usages(&self, id: NodeId) -> usize {
        self.slot(id).usages
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id.base())
    }

    /// Whether a node with this base shape is published.
    pub fn contains_key(&self, key: &Key<T>) -> bool {
        self.lookup.contains_key(key)
    }

    /// All published pairs with their usage counts, ordered by id.
    pub fn pairs(&self) -> Vec<(Arc<NodePair<T>>, usize)> {
        let mut pairs: Vec<_> = self.slots.values().map(|s| (s.pair.clone(), s.usages)).collect();
        pairs.sort_by_key(|(p, _)| p.id);
        pairs
    }

    /// Find the pair with the given base shape and register one usage of it.
    pub fn find(&mut self, key: &Key<T>) -> Option<Arc<NodePair<T>>> {
        let id = *self.lookup.get(key)?;
        let slot = self.slot_mut(id);
        slot.usages += 1;
        trace!("found {} [usages={}]", id, slot.usages);
        Some(slot.pair.clone())
    }

    /// Publish a new pair for `base`, with one usage registered.
    ///
    /// The caller must have checked with [`UniqueTable::find`] that the shape is new.
    pub fn publish(&mut self, base: Content<T>, difficulty: Option<f64>) -> Arc<NodePair<T>> {
        let id = NodeId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(2)
            .unwrap_or_else(|| panic!("Formula ids are exhausted"));

        let pair = Arc::new(NodePair::new(id, base, difficulty));
        let previous = self.lookup.insert(pair.key(), id);
        assert!(previous.is_none(), "Shape of {} was already published as {:?}", id, previous);
        self.slots.insert(
            id,
            Slot {
                pair: pair.clone(),
                usages: 1,
            },
        );
        debug!("publish {} ({})", id, pair.formula_type(false));
        pair
    }

    pub fn register(&mut self, id: NodeId) {
        let slot = self.slot_mut(id);
        assert!(slot.usages < usize::MAX, "Usage counter of {} overflows", id);
        slot.usages += 1;
        trace!("register {} [usages={}]", id.base(), slot.usages);
    }

    /// Queue a release of `id`.
    ///
    /// Returns `true` if the caller has to drain the queue, `false` if a drain
    /// further up the stack will pick it up.
    pub fn enqueue_release(&mut self, id: NodeId) -> bool {
        self.pending.push(id);
        !std::mem::replace(&mut self.draining, true)
    }

    /// Release the next queued id, or end the drain if the queue is empty.
    pub fn release_next(&mut self) -> Option<Garbage<T>> {
        match self.pending.pop() {
            Some(id) => Some(self.release(id)),
            None => {
                self.draining = false;
                None
            }
        }
    }

    /// Give back one usage of `id`, deleting the pair if nothing needs it anymore.
    pub fn release(&mut self, id: NodeId) -> Garbage<T> {
        let base = id.base();
        let slot = self.slot_mut(base);
        assert!(slot.usages > 0, "Releasing {} which has no usages", base);
        slot.usages -= 1;
        trace!("release {} [usages={}]", base, slot.usages);

        let mut garbage = Vec::new();
        if slot.usages == 0 {
            // Pairs linked by Tseitin mappings live and die together.
            let linked = self.tseitin_component(base);
            if linked.iter().any(|&b| self.usages(b) > 0) {
                debug!("keep {}: linked to a used Tseitin partner", base);
            } else {
                for b in linked {
                    self.delete(b, &mut garbage);
                }
            }
        }
        garbage
    }

    /// Bases reachable from `base` through Tseitin mappings in either
    /// direction and either polarity, `base` first.
    fn tseitin_component(&self, base: NodeId) -> Vec<NodeId> {
        let mut component = vec![base];
        let mut i = 0;
        while i < component.len() {
            let b = component[i];
            i += 1;
            for id in [b, b.negation()] {
                let linked = [self.tseitin_vars.get(&id), self.tseitin_owners.get(&id)];
                for other in linked.into_iter().flatten() {
                    if !component.contains(&other.base()) {
                        component.push(other.base());
                    }
                }
            }
        }
        component
    }

    fn delete(&mut self, base: NodeId, garbage: &mut Garbage<T>) {
        assert_ne!(base, NodeId::TRUE, "TRUE and FALSE are never deleted");
        let slot = self
            .slots
            .remove(&base)
            .unwrap_or_else(|| panic!("Deleting {} which is not in the pool", base));
        assert_eq!(slot.usages, 0, "Deleting {} which is still used", base);

        let removed = self.lookup.remove(&slot.pair.key());
        assert_eq!(removed, Some(base), "Lookup entry of {} is corrupted", base);
        debug!("delete {}", base);

        for id in [base, base.negation()] {
            if let Some(var) = self.tseitin_vars.remove(&id) {
                self.tseitin_owners.remove(&var);
            }
            if let Some(owner) = self.tseitin_owners.remove(&id) {
                self.tseitin_vars.remove(&owner);
            }
        }

        garbage.push(slot.pair);
    }

    /// The placeholder of `id`, with one usage registered.
    pub fn tseitin_var(&mut self, id: NodeId) -> Option<Arc<NodePair<T>>> {
        let var = *self.tseitin_vars.get(&id)?;
        self.register(var);
        Some(self.slot(var).pair.clone())
    }

    pub fn map_tseitin_var(&mut self, id: NodeId, var: NodeId) {
        assert!(var.is_base(), "Tseitin variable {} must be a base formula", var);
        let previous = self.tseitin_vars.insert(id, var);
        assert!(previous.is_none(), "{} already has a Tseitin variable", id);
        self.tseitin_owners.insert(var, id);
        debug!("map {} -> Tseitin variable {}", id, var);
    }

    /// `(formula, placeholder, owner recorded for the placeholder)`, ordered by formula id.
    pub fn tseitin_entries(&self) -> Vec<(NodeId, NodeId, Option<NodeId>)> {
        let mut entries: Vec<_> = self
            .tseitin_vars
            .iter()
            .map(|(&f, &v)| (f, v, self.tseitin_owners.get(&v).copied()))
            .collect();
        entries.sort();
        entries
    }
}
