//! # formula-pool: Canonical SMT formulas in Rust
//!
//! **`formula-pool`** is the canonicalization layer of an SMT formula library.
//! Every formula is built through a [`FormulaPool`][crate::pool::FormulaPool], which
//! hash-conses it: structurally equal formulas are the same node, so equality is
//! a pointer comparison.
//!
//! ## Key Features
//!
//! - **Pool-Centric Architecture**: All constructors go through the [`FormulaPool`][crate::pool::FormulaPool].
//!   Operands are flattened, sorted and simplified before a node is published, so the
//!   same Boolean structure always yields the same node.
//! - **O(1) Negation**: A node and its negation are published together and get adjacent
//!   ids (odd for the base, even for the negation). Negating never allocates.
//! - **Counted Handles**: A [`Formula`][crate::reference::Formula] registers a usage
//!   with its pool; the pool frees a node (with its negation) when the last handle goes away.
//! - **Tseitin Variables**: A formula can be mapped to a fresh Boolean placeholder,
//!   which keeps the formula alive for as long as the placeholder is used.
//! - **Theory-Agnostic**: Atoms are supplied by a [`Theory`][crate::theory::Theory].
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::fmt;
//!
//! use formula_pool::pool::FormulaPool;
//! use formula_pool::theory::{Atom, NegatableAtom, Theory};
//! use formula_pool::types::Variable;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! struct Bound(u32, bool);
//!
//! impl fmt::Display for Bound {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "(x{} {} 0)", self.0, if self.1 { "<=" } else { ">" })
//!     }
//! }
//!
//! impl Atom for Bound {}
//!
//! impl NegatableAtom for Bound {
//!     fn negation(&self) -> Self {
//!         Bound(self.0, !self.1)
//!     }
//! }
//!
//! struct Bounds;
//!
//! impl Theory for Bounds {
//!     type Constraint = Bound;
//!     type VarCompare = Bound;
//!     type VarAssign = Bound;
//!     type BvConstraint = Bound;
//!     type UEquality = Bound;
//!     type PbConstraint = Bound;
//! }
//!
//! // 1. Initialize the pool
//! let pool = FormulaPool::<Bounds>::default();
//!
//! // 2. Create variables (1-indexed)
//! let p = pool.variable(Variable::boolean(1));
//! let q = pool.variable(Variable::boolean(2));
//!
//! // 3. Build formulas: equal structure gives the same node
//! let pq = pool.and([p.clone(), q.clone()]);
//! let qp = pool.and([q.clone(), p.clone()]);
//! assert_eq!(pq, qp);
//!
//! // 4. Negation is an adjacent node
//! assert_eq!((-&pq).id().get(), pq.id().get() + 1);
//! assert_eq!(-(-pq.clone()), pq);
//!
//! // 5. A Tseitin placeholder is a fresh variable, never one of ours
//! let t = pool.create_tseitin_var(&pq);
//! assert_ne!(t, p);
//! assert_ne!(t, q);
//! assert_eq!(pool.create_tseitin_var(&pq), t);
//!
//! // 6. Simplification happens on construction
//! let taut = pool.or([p.clone(), -&p]);
//! assert!(taut.is_true());
//! let f = pool.implies(p.clone(), pool.and([q.clone(), taut]));
//! assert_eq!(f, pool.implies(p, q));
//! ```
//!
//! ## Core Components
//!
//! - **[`pool`]**: The [`FormulaPool`][crate::pool::FormulaPool] with interning and Tseitin variables.
//! - **[`connectives`]**: Constructors for every connective and atom kind.
//! - **[`debug`]**: Pool dumps and formula inspection.

pub mod connectives;
pub mod debug;
pub mod node;
pub mod pool;
pub mod reference;
pub mod shape;
pub mod sync;
pub mod table;
pub mod theory;
pub mod types;
pub mod variables;

#[cfg(test)]
pub(crate) mod testing;
