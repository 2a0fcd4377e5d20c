//! A small theory for unit tests.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::pool::FormulaPool;
use crate::reference::Formula;
use crate::theory::{Atom, NegatableAtom, Relation, Theory};
use crate::types::Variable;
use crate::variables::VariablePool;

/// `x ~ rhs`, or `0 ~ rhs` when there is no variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lin {
    pub var: Option<u32>,
    pub rel: Relation,
    pub rhs: i64,
}

impl Lin {
    pub fn new(var: u32, rel: Relation, rhs: i64) -> Self {
        Lin { var: Some(var), rel, rhs }
    }

    pub fn constant(rel: Relation, rhs: i64) -> Self {
        Lin { var: None, rel, rhs }
    }
}

impl fmt::Display for Lin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.var {
            Some(v) => write!(f, "(x{} {} {})", v, self.rel, self.rhs),
            None => write!(f, "(0 {} {})", self.rel, self.rhs),
        }
    }
}

impl Atom for Lin {
    fn as_constant(&self) -> Option<bool> {
        match self.var {
            // 0 ~ rhs  <=>  -rhs ~ 0
            None => Some(self.rel.holds_for(0.cmp(&self.rhs))),
            Some(_) => None,
        }
    }

    fn difficulty(&self) -> f64 {
        2.0
    }
}

impl NegatableAtom for Lin {
    fn negation(&self) -> Self {
        Lin {
            rel: self.rel.inverse(),
            ..self.clone()
        }
    }
}

/// Any other atom: a name, possibly known to be constant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opaque {
    pub name: u32,
    pub constant: Option<bool>,
}

impl Opaque {
    pub fn new(name: u32) -> Self {
        Opaque { name, constant: None }
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.name)
    }
}

impl Atom for Opaque {
    fn as_constant(&self) -> Option<bool> {
        self.constant
    }
}

pub struct Mock;

impl Theory for Mock {
    type Constraint = Lin;
    type VarCompare = Opaque;
    type VarAssign = Opaque;
    type BvConstraint = Opaque;
    type UEquality = Opaque;
    type PbConstraint = Opaque;

    fn compare_as_constraint(compare: &Opaque) -> Option<Lin> {
        // Even names stand for comparisons that are plain bounds.
        (compare.name % 2 == 0).then(|| Lin::new(compare.name, Relation::Leq, 0))
    }
}

pub type F = Formula<Mock>;

/// A pool with its own fresh-variable source, so ids do not depend on other tests.
pub fn pool() -> FormulaPool<Mock> {
    FormulaPool::with_variables(64, Arc::new(VariablePool::starting_at(1000)))
}

/// Boolean variable formulas `b1..=bn`.
pub fn vars(pool: &FormulaPool<Mock>, n: u32) -> Vec<F> {
    (1..=n).map(|i| pool.variable(Variable::boolean(i))).collect()
}

#[test]
fn test_lin_constant() {
    assert_eq!(Lin::constant(Relation::Eq, 0).as_constant(), Some(true));
    assert_eq!(Lin::constant(Relation::Less, 0).as_constant(), Some(false));
    // 0 < 3  <=>  -3 < 0
    assert_eq!(Lin::constant(Relation::Less, 3).as_constant(), Some(true));
    assert_eq!(Lin::new(1, Relation::Less, 3).as_constant(), None);
    assert_eq!(Lin::new(1, Relation::Less, 3).partial_cmp(&Lin::new(1, Relation::Geq, 3)), Some(Ordering::Less));
}
