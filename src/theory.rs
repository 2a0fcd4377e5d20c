//! Contracts for the theory atoms wrapped by formulas.
//!
//! The pool never looks inside an atom. It only needs to compare, hash and
//! print atoms, to ask whether an atom is trivially true or false, and for
//! arithmetic constraints to negate them. A [`Theory`] bundles the six atom
//! kinds a formula may carry.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

use crate::shape::FormulaType;

/// A theory atom: comparable, hashable and printable.
pub trait Atom: Clone + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// `Some(true)` if the atom holds under every assignment,
    /// `Some(false)` if it never holds, `None` otherwise.
    fn as_constant(&self) -> Option<bool> {
        None
    }

    /// Heuristic complexity of the atom.
    fn difficulty(&self) -> f64 {
        1.0
    }
}

/// An atom that can be negated without an explicit NOT node.
///
/// `a.negation().negation() == a` must hold, and `a != a.negation()`.
pub trait NegatableAtom: Atom {
    fn negation(&self) -> Self;
}

/// The atom types carried by formulas of one pool.
pub trait Theory: 'static {
    /// Arithmetic constraint `p ~ 0`.
    type Constraint: NegatableAtom;
    /// Comparison between a variable and a (possibly algebraic) value.
    type VarCompare: Atom;
    /// Assignment of a value to a variable.
    type VarAssign: Atom;
    /// Bit-vector constraint.
    type BvConstraint: Atom;
    /// Equality between uninterpreted terms.
    type UEquality: Atom;
    /// Pseudo-Boolean constraint.
    type PbConstraint: Atom;

    /// Rewrite a variable comparison as a plain arithmetic constraint, if possible.
    fn compare_as_constraint(_compare: &Self::VarCompare) -> Option<Self::Constraint> {
        None
    }
}

/// A value of one of the atom kinds of theory `T`.
pub enum AtomValue<T: Theory> {
    Constraint(T::Constraint),
    VarCompare(T::VarCompare),
    VarAssign(T::VarAssign),
    BitVector(T::BvConstraint),
    UEquality(T::UEquality),
    PbConstraint(T::PbConstraint),
}

macro_rules! dispatch {
    ($value:expr, $atom:ident => $body:expr) => {
        match $value {
            AtomValue::Constraint($atom) => $body,
            AtomValue::VarCompare($atom) => $body,
            AtomValue::VarAssign($atom) => $body,
            AtomValue::BitVector($atom) => $body,
            AtomValue::UEquality($atom) => $body,
            AtomValue::PbConstraint($atom) => $body,
        }
    };
}

impl<T: Theory> AtomValue<T> {
    pub fn formula_type(&self) -> FormulaType {
        match self {
            AtomValue::Constraint(_) => FormulaType::Constraint,
            AtomValue::VarCompare(_) => FormulaType::VarCompare,
            AtomValue::VarAssign(_) => FormulaType::VarAssign,
            AtomValue::BitVector(_) => FormulaType::BitVector,
            AtomValue::UEquality(_) => FormulaType::UEq,
            AtomValue::PbConstraint(_) => FormulaType::PbConstraint,
        }
    }

    pub fn as_constant(&self) -> Option<bool> {
        dispatch!(self, a => a.as_constant())
    }

    pub fn difficulty(&self) -> f64 {
        dispatch!(self, a => a.difficulty())
    }

    pub fn as_constraint(&self) -> Option<&T::Constraint> {
        match self {
            AtomValue::Constraint(c) => Some(c),
            _ => None,
        }
    }
}

impl<T: Theory> Clone for AtomValue<T> {
    fn clone(&self) -> Self {
        match self {
            AtomValue::Constraint(a) => AtomValue::Constraint(a.clone()),
            AtomValue::VarCompare(a) => AtomValue::VarCompare(a.clone()),
            AtomValue::VarAssign(a) => AtomValue::VarAssign(a.clone()),
            AtomValue::BitVector(a) => AtomValue::BitVector(a.clone()),
            AtomValue::UEquality(a) => AtomValue::UEquality(a.clone()),
            AtomValue::PbConstraint(a) => AtomValue::PbConstraint(a.clone()),
        }
    }
}

impl<T: Theory> PartialEq for AtomValue<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AtomValue::Constraint(a), AtomValue::Constraint(b)) => a == b,
            (AtomValue::VarCompare(a), AtomValue::VarCompare(b)) => a == b,
            (AtomValue::VarAssign(a), AtomValue::VarAssign(b)) => a == b,
            (AtomValue::BitVector(a), AtomValue::BitVector(b)) => a == b,
            (AtomValue::UEquality(a), AtomValue::UEquality(b)) => a == b,
            (AtomValue::PbConstraint(a), AtomValue::PbConstraint(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Theory> Eq for AtomValue<T> {}

impl<T: Theory> Hash for AtomValue<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.formula_type().hash(state);
        dispatch!(self, a => a.hash(state))
    }
}

impl<T: Theory> Debug for AtomValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, a => write!(f, "{:?}({:?})", self.formula_type(), a))
    }
}

impl<T: Theory> Display for AtomValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, a => Display::fmt(a, f))
    }
}

/// Relation of a constraint `p ~ 0`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Relation {
    Eq,
    Neq,
    Less,
    Leq,
    Greater,
    Geq,
}

impl Relation {
    /// The relation of the negated constraint.
    pub fn inverse(self) -> Self {
        match self {
            Relation::Eq => Relation::Neq,
            Relation::Neq => Relation::Eq,
            Relation::Less => Relation::Geq,
            Relation::Leq => Relation::Greater,
            Relation::Greater => Relation::Leq,
            Relation::Geq => Relation::Less,
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Less | Relation::Greater | Relation::Neq)
    }

    /// Whether `c ~ 0` holds for a constant `c` of the given sign.
    pub fn holds_for(self, sign: Ordering) -> bool {
        match sign {
            Ordering::Equal => matches!(self, Relation::Eq | Relation::Leq | Relation::Geq),
            Ordering::Greater => matches!(self, Relation::Neq | Relation::Greater | Relation::Geq),
            Ordering::Less => matches!(self, Relation::Neq | Relation::Less | Relation::Leq),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Eq => "=",
            Relation::Neq => "!=",
            Relation::Less => "<",
            Relation::Leq => "<=",
            Relation::Greater => ">",
            Relation::Geq => ">=",
        };
        write!(f, "{}", s)
    }
}
