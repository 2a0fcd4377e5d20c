//! Debug utilities for inspecting a formula pool.
//!
//! The dump format is meant for people, not for parsing.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};

use num_bigint::BigUint;

use crate::pool::FormulaPool;
use crate::reference::Formula;
use crate::shape::{FormulaType, Shape};
use crate::theory::Theory;
use crate::types::NodeId;

/// Information about one published base formula.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub formula_type: FormulaType,
    /// Handles to either polarity.
    pub usages: usize,
    pub negation: NodeId,
    pub text: String,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [usages={}]: {}, negation {}",
            self.id.get(),
            self.usages,
            self.text,
            self.negation.get()
        )
    }
}

impl<T: Theory> FormulaPool<T> {
    /// One entry per base formula in the pool, ordered by id.
    pub fn node_infos(&self) -> Vec<NodeInfo> {
        let pairs = self.shared.table.lock().borrow().pairs();
        pairs
            .into_iter()
            .map(|(pair, usages)| NodeInfo {
                id: pair.id,
                formula_type: pair.formula_type(false),
                usages,
                negation: pair.id.negation(),
                text: pair.display(false).to_string(),
            })
            .collect()
    }

    /// Every live node with its id, usage count and negation, followed by the
    /// Tseitin mapping.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Formula pool contains:").unwrap();
        for info in self.node_infos() {
            writeln!(out, "{}", info).unwrap();
        }
        writeln!(out, "Tseitin variables:").unwrap();
        let entries = self.shared.table.lock().borrow().tseitin_entries();
        for (formula, var, owner) in entries {
            match owner {
                Some(owner) => writeln!(
                    out,
                    "id {}  ->  {} [remapping: {} -> {}]",
                    formula.get(),
                    var.get(),
                    var.get(),
                    owner.get()
                )
                .unwrap(),
                None => writeln!(out, "id {}  ->  {} [not yet remapped!]", formula.get(), var.get()).unwrap(),
            }
        }
        out
    }

    /// Print [`FormulaPool::dump`] to stdout.
    pub fn print(&self) {
        println!("{}", self.dump());
    }

    /// Every live formula, both polarities, ordered by id.
    pub fn formulas(&self) -> Vec<Formula<T>> {
        let guard = self.shared.table.lock();
        let pairs = guard.borrow().pairs();
        let mut formulas = Vec::with_capacity(2 * pairs.len());
        for (pair, _) in pairs {
            for negated in [false, true] {
                guard.borrow_mut().register(pair.id);
                formulas.push(self.handle(pair.clone(), negated));
            }
        }
        formulas
    }

    /// Call `f` on every live formula, both polarities.
    pub fn for_each(&self, mut f: impl FnMut(&Formula<T>)) {
        for formula in self.formulas() {
            f(&formula);
        }
    }

    /// Map every live formula, both polarities.
    pub fn map_formulas<R>(&self, mut f: impl FnMut(&Formula<T>) -> R) -> BTreeMap<Formula<T>, R> {
        self.formulas()
            .into_iter()
            .map(|formula| {
                let value = f(&formula);
                (formula, value)
            })
            .collect()
    }
}

impl<T: Theory> Formula<T> {
    /// Number of nodes of the formula written out as a tree, without sharing.
    ///
    /// A NOT node counts as one node on top of its operand.
    pub fn tree_size(&self) -> BigUint {
        let mut sizes: HashMap<NodeId, BigUint> = HashMap::new();
        // (formula, children already visited)
        let mut stack = vec![(self.clone(), false)];
        while let Some((f, visited)) = stack.pop() {
            if sizes.contains_key(&f.id()) {
                continue;
            }
            let children: Vec<Formula<T>> = match f.shape() {
                Shape::Not => vec![-&f],
                shape => shape.children().into_iter().cloned().collect(),
            };
            if visited {
                let size = children
                    .iter()
                    .fold(BigUint::from(1u32), |acc, child| acc + &sizes[&child.id()]);
                sizes.insert(f.id(), size);
            } else {
                stack.push((f, true));
                stack.extend(children.into_iter().filter(|c| !sizes.contains_key(&c.id())).map(|c| (c, false)));
            }
        }
        sizes.remove(&self.id()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::testing::{pool, vars};

    #[test]
    fn test_dump_lists_nodes() {
        let pool = pool();
        let v = vars(&pool, 2);
        let f = pool.and(v.clone());
        let dump = pool.dump();
        println!("{}", dump);

        assert!(dump.starts_with("Formula pool contains:\n"));
        assert!(dump.contains("1 [usages=1]: true, negation 2"));
        assert!(dump.contains("3 [usages=2]: b1, negation 4"));
        assert!(dump.contains(&format!("{} [usages=1]: (and b1 b2), negation {}", f.id().get(), f.id().get() + 1)));
        assert!(dump.ends_with("Tseitin variables:\n"));
    }

    #[test]
    fn test_dump_lists_tseitin_vars() {
        let pool = pool();
        let f = pool.or(vars(&pool, 2));
        let t = pool.create_tseitin_var(&f);
        let dump = pool.dump();
        let line = format!(
            "id {}  ->  {} [remapping: {} -> {}]",
            f.id().get(),
            t.id().get(),
            t.id().get(),
            f.id().get()
        );
        assert!(dump.contains(&line), "{}", dump);
    }

    #[test]
    fn test_node_infos() {
        let pool = pool();
        let a = pool.fresh_variable();
        let infos = pool.node_infos();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].formula_type, FormulaType::True);
        assert_eq!(infos[1].id, a.id());
        assert_eq!(infos[1].negation, a.id().negation());
        assert_eq!(infos[1].text, a.to_string());
    }

    #[test]
    fn test_formulas_both_polarities() {
        let pool = pool();
        let v = vars(&pool, 2);
        let all = pool.formulas();
        assert_eq!(all.len(), 6);
        assert!(all.contains(&pool.false_formula()));
        assert!(all.contains(&-&v[1]));

        let mut count = 0;
        pool.for_each(|f| {
            assert!(all.contains(f));
            count += 1;
        });
        assert_eq!(count, 6);

        let types = pool.map_formulas(|f| f.formula_type());
        assert_eq!(types[&v[0]], FormulaType::Bool);
        assert_eq!(types[&-&v[0]], FormulaType::Not);
        drop(all);
        drop(types);
        assert_eq!(pool.usages(&v[0]), 1);
    }

    #[test]
    fn test_tree_size() {
        let pool = pool();
        let v = vars(&pool, 2);
        let ab = pool.and(v.clone());
        let f = pool.or([ab.clone(), -&ab]);
        assert!(f.is_true());
        assert_eq!(f.tree_size(), BigUint::from(1u32));

        let f = pool.xor([ab.clone(), -&v[0]]);
        // xor(and(b1, b2), not(b1)): 1 + 3 + 2
        assert_eq!(f.tree_size(), BigUint::from(6u32));
        assert_eq!((-&f).tree_size(), BigUint::from(7u32));
    }

    #[test]
    fn test_tree_size_of_deep_formula() {
        let pool = pool();
        let mut f = pool.fresh_variable();
        for _ in 0..100_000 {
            let v = pool.fresh_variable();
            f = pool.implies(v, f);
        }
        assert_eq!(f.tree_size(), BigUint::from(200_001u32));
    }

    #[test]
    fn test_tree_size_counts_shared_nodes_twice() {
        let pool = pool();
        let mut f = pool.fresh_variable();
        for _ in 0..100 {
            let g = pool.fresh_variable();
            f = pool.ite(g, f.clone(), -&f);
        }
        assert!(f.tree_size() > BigUint::from(u64::MAX));
    }
}
