use std::fmt;

use crate::reference::Formula;
use crate::shape::{FormulaType, Shape};
use crate::theory::{AtomValue, NegatableAtom, Theory};
use crate::types::NodeId;

/// Node content with children held as counted handles.
pub type Content<T> = Shape<AtomValue<T>, Formula<T>>;

/// Lookup key: node content with children replaced by their ids.
pub type Key<T> = Shape<AtomValue<T>, NodeId>;

/// A published formula together with its negation.
///
/// Both polarities are allocated, published and freed as one unit, so the
/// negation link can never dangle. The base member has id `id`, the negated
/// member `id + 1`.
pub struct NodePair<T: Theory> {
    pub id: NodeId,
    pub base: Content<T>,
    pub negation: Content<T>,
    pub difficulty: f64,
}

impl<T: Theory> NodePair<T> {
    /// Build the pair for a base node.
    ///
    /// Constraints negate their payload; TRUE pairs with FALSE; everything
    /// else gets a NOT node.
    pub fn new(id: NodeId, base: Content<T>, difficulty: Option<f64>) -> Self {
        assert!(id.is_base(), "Pair id {} is not a base id", id);
        let negation = match &base {
            Shape::True => Shape::False,
            Shape::Not | Shape::False => panic!("{:?} cannot be a base node", base.formula_type_with(AtomValue::formula_type)),
            Shape::Atom(AtomValue::Constraint(c)) => Shape::Atom(AtomValue::Constraint(c.negation())),
            _ => Shape::Not,
        };
        let difficulty = difficulty.unwrap_or_else(|| Self::compute_difficulty(&base));
        Self {
            id,
            base,
            negation,
            difficulty,
        }
    }

    fn compute_difficulty(base: &Content<T>) -> f64 {
        match base {
            Shape::True | Shape::False => 0.0,
            Shape::Bool(_) => 1.0,
            Shape::Exists(vars, body) | Shape::Forall(vars, body) => body.difficulty() + vars.len() as f64,
            Shape::Atom(atom) => atom.difficulty(),
            _ => base.children().into_iter().map(|f| f.difficulty()).sum(),
        }
    }

    pub fn content(&self, negated: bool) -> &Content<T> {
        if negated {
            &self.negation
        } else {
            &self.base
        }
    }

    pub fn id(&self, negated: bool) -> NodeId {
        if negated {
            self.id.negation()
        } else {
            self.id
        }
    }

    pub fn formula_type(&self, negated: bool) -> FormulaType {
        self.content(negated).formula_type_with(AtomValue::formula_type)
    }

    pub fn key(&self) -> Key<T> {
        self.base.fmap_ref(|f| f.id())
    }

    /// Printable view of one polarity.
    pub fn display(&self, negated: bool) -> Polarity<'_, T> {
        Polarity { pair: self, negated }
    }
}

pub struct Polarity<'a, T: Theory> {
    pair: &'a NodePair<T>,
    negated: bool,
}

impl<T: Theory> fmt::Display for Polarity<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = self.pair.content(self.negated);
        let ty = self.pair.formula_type(self.negated);
        match content {
            Shape::True => write!(f, "true"),
            Shape::False => write!(f, "false"),
            Shape::Bool(v) => write!(f, "{}", v),
            Shape::Not => write!(f, "(not {})", self.pair.display(false)),
            Shape::Atom(atom) => write!(f, "{}", atom),
            Shape::Exists(vars, body) | Shape::Forall(vars, body) => {
                write!(f, "({} (", ty)?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ") {})", body)
            }
            _ => {
                write!(f, "({}", ty)?;
                for child in content.children() {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
