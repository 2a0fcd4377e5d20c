use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::sync::Arc;

use crate::node::{Content, NodePair};
use crate::pool::PoolShared;
use crate::shape::{FormulaType, Shape};
use crate::theory::{AtomValue, Theory};
use crate::types::{NodeId, Variable};

/// A counted handle to a canonical formula.
///
/// Cloning registers one more usage with the pool, dropping releases it; once
/// the last handle to a formula (in either polarity) goes away, the pool frees
/// the formula and its negation together.
///
/// Handles compare, order and hash by id, so equality is O(1) and equal
/// handles always denote the same canonical node.
pub struct Formula<T: Theory> {
    pool: Arc<PoolShared<T>>,
    pair: Arc<NodePair<T>>,
    negated: bool,
}

impl<T: Theory> Formula<T> {
    /// Wrap a pair whose usage has already been registered for this handle.
    pub(crate) fn from_registered(pool: Arc<PoolShared<T>>, pair: Arc<NodePair<T>>, negated: bool) -> Self {
        Self { pool, pair, negated }
    }

    pub(crate) fn pair(&self) -> &Arc<NodePair<T>> {
        &self.pair
    }

    pub fn id(&self) -> NodeId {
        self.pair.id(self.negated)
    }

    /// Whether this handle points at the base member of its pair.
    pub fn is_base(&self) -> bool {
        !self.negated
    }

    pub fn formula_type(&self) -> FormulaType {
        self.pair.formula_type(self.negated)
    }

    /// The node content. For a NOT node use [`Formula::subformula`] to get the operand.
    pub fn shape(&self) -> &Content<T> {
        self.pair.content(self.negated)
    }

    /// The logical negation, an O(1) lookup.
    pub fn negation(&self) -> Self {
        -self.clone()
    }

    /// Whether `self` and `other` are each other's negation.
    pub fn is_negation_of(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pair, &other.pair) && self.negated != other.negated
    }

    pub fn difficulty(&self) -> f64 {
        self.pair.difficulty
    }

    pub fn is_true(&self) -> bool {
        self.formula_type() == FormulaType::True
    }

    pub fn is_false(&self) -> bool {
        self.formula_type() == FormulaType::False
    }

    pub fn is_constant(&self) -> bool {
        self.formula_type().is_constant()
    }

    /// Boolean variables and theory atoms.
    pub fn is_atom(&self) -> bool {
        let ty = self.formula_type();
        ty == FormulaType::Bool || ty.is_theory_atom()
    }

    /// An atom or the negation of a Boolean variable.
    pub fn is_literal(&self) -> bool {
        self.is_atom() || (self.formula_type() == FormulaType::Not && self.pair.formula_type(false) == FormulaType::Bool)
    }

    /// Operands of an AND/OR/XOR/IFF node, empty for anything else.
    pub fn subformulas(&self) -> &[Formula<T>] {
        self.shape().operands()
    }

    /// The operand of a NOT node.
    ///
    /// # Panics
    ///
    /// Panics if this is not a NOT node.
    pub fn subformula(&self) -> Formula<T> {
        assert_eq!(self.formula_type(), FormulaType::Not, "subformula() of a non-NOT formula {}", self);
        -self.clone()
    }

    /// `(premise, conclusion)` of an implication.
    pub fn implication(&self) -> Option<(&Formula<T>, &Formula<T>)> {
        match self.shape() {
            Shape::Implies(a, b) => Some((a, b)),
            _ => None,
        }
    }

    /// `(condition, then, else)` of an if-then-else.
    pub fn ite(&self) -> Option<(&Formula<T>, &Formula<T>, &Formula<T>)> {
        match self.shape() {
            Shape::Ite(c, a, b) => Some((c, a, b)),
            _ => None,
        }
    }

    /// Bound variables and body of a quantifier.
    pub fn quantified(&self) -> Option<(&[Variable], &Formula<T>)> {
        match self.shape() {
            Shape::Exists(vars, body) | Shape::Forall(vars, body) => Some((vars, body)),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<Variable> {
        match self.shape() {
            Shape::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn atom(&self) -> Option<&AtomValue<T>> {
        match self.shape() {
            Shape::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn constraint(&self) -> Option<&T::Constraint> {
        self.atom().and_then(AtomValue::as_constraint)
    }
}

impl<T: Theory> Clone for Formula<T> {
    fn clone(&self) -> Self {
        self.pool.register(self.pair.id);
        Self {
            pool: self.pool.clone(),
            pair: self.pair.clone(),
            negated: self.negated,
        }
    }
}

impl<T: Theory> Drop for Formula<T> {
    fn drop(&mut self) {
        self.pool.release(self.pair.id);
    }
}

impl<T: Theory> Neg for Formula<T> {
    type Output = Self;

    // Usages live on the base, so flipping the polarity keeps the count.
    fn neg(mut self) -> Self::Output {
        self.negated = !self.negated;
        self
    }
}

impl<T: Theory> Neg for &Formula<T> {
    type Output = Formula<T>;

    fn neg(self) -> Self::Output {
        self.negation()
    }
}

impl<T: Theory> PartialEq for Formula<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pair, &other.pair) && self.negated == other.negated
    }
}

impl<T: Theory> Eq for Formula<T> {}

impl<T: Theory> PartialOrd for Formula<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Theory> Ord for Formula<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id()
            .cmp(&other.id())
            .then_with(|| (Arc::as_ptr(&self.pair) as usize).cmp(&(Arc::as_ptr(&other.pair) as usize)))
    }
}

impl<T: Theory> Hash for Formula<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<T: Theory> Display for Formula<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.pair.display(self.negated), f)
    }
}

impl<T: Theory> Debug for Formula<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id(), self)
    }
}
