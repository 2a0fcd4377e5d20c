//! A toy theory: bounds on integer variables plus named opaque atoms.

#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;

use formula_pool::pool::FormulaPool;
use formula_pool::reference::Formula;
use formula_pool::theory::{Atom, NegatableAtom, Relation, Theory};
use formula_pool::types::Variable;
use formula_pool::variables::VariablePool;

/// `x - offset ~ 0` for an integer variable `x`, or `-offset ~ 0` without one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bound {
    pub var: Option<u32>,
    pub offset: i64,
    pub rel: Relation,
}

impl Bound {
    pub fn new(var: u32, rel: Relation, offset: i64) -> Self {
        Bound {
            var: Some(var),
            offset,
            rel,
        }
    }

    pub fn ground(rel: Relation, offset: i64) -> Self {
        Bound { var: None, offset, rel }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.var {
            Some(v) => write!(f, "(i{} {} {})", v, self.rel, self.offset),
            None => write!(f, "(0 {} {})", self.rel, self.offset),
        }
    }
}

impl Atom for Bound {
    fn as_constant(&self) -> Option<bool> {
        match self.var {
            None => Some(self.rel.holds_for(0.cmp(&self.offset))),
            Some(_) => None,
        }
    }
}

impl NegatableAtom for Bound {
    fn negation(&self) -> Self {
        Bound {
            rel: self.rel.inverse(),
            ..self.clone()
        }
    }
}

/// Equality `lhs = rhs` of two uninterpreted constants; `u = u` is trivially true.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UEq(pub u32, pub u32);

impl fmt::Display for UEq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(= u{} u{})", self.0, self.1)
    }
}

impl Atom for UEq {
    fn as_constant(&self) -> Option<bool> {
        (self.0 == self.1).then_some(true)
    }
}

/// Stand-in for atoms whose content does not matter here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Named(pub &'static str);

impl fmt::Display for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Atom for Named {
    fn as_constant(&self) -> Option<bool> {
        match self.0 {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn difficulty(&self) -> f64 {
        3.0
    }
}

pub struct Toy;

impl Theory for Toy {
    type Constraint = Bound;
    type VarCompare = Named;
    type VarAssign = Named;
    type BvConstraint = Named;
    type UEquality = UEq;
    type PbConstraint = Named;
}

pub type F = Formula<Toy>;

pub fn pool() -> FormulaPool<Toy> {
    FormulaPool::with_variables(128, Arc::new(VariablePool::starting_at(1000)))
}

pub fn var(pool: &FormulaPool<Toy>, id: u32) -> F {
    pool.variable(Variable::boolean(id))
}
