//! The structural description of a single formula node.
//!
//! [`Shape`] is generic over the atom payload `A` and the child representation
//! `I`. Published nodes hold their children as counted handles
//! (`Shape<AtomValue<T>, Formula<T>>`); the lookup table keys on the same shape
//! with children replaced by their ids (`Shape<AtomValue<T>, NodeId>`), which is
//! what makes structural equality an id comparison.

use std::fmt;

use crate::types::Variable;

/// The connective or atom kind of a formula.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FormulaType {
    True,
    False,
    Bool,
    Not,
    And,
    Or,
    Xor,
    Iff,
    Implies,
    Ite,
    Exists,
    Forall,
    Constraint,
    VarCompare,
    VarAssign,
    BitVector,
    UEq,
    PbConstraint,
}

impl FormulaType {
    pub fn is_nary(self) -> bool {
        matches!(
            self,
            FormulaType::And | FormulaType::Or | FormulaType::Xor | FormulaType::Iff
        )
    }

    pub fn is_quantifier(self) -> bool {
        matches!(self, FormulaType::Exists | FormulaType::Forall)
    }

    pub fn is_constant(self) -> bool {
        matches!(self, FormulaType::True | FormulaType::False)
    }

    /// Theory atoms, i.e. everything wrapping an external value.
    pub fn is_theory_atom(self) -> bool {
        matches!(
            self,
            FormulaType::Constraint
                | FormulaType::VarCompare
                | FormulaType::VarAssign
                | FormulaType::BitVector
                | FormulaType::UEq
                | FormulaType::PbConstraint
        )
    }

    /// Keyword used when printing.
    pub fn name(self) -> &'static str {
        match self {
            FormulaType::True => "true",
            FormulaType::False => "false",
            FormulaType::Bool => "bool",
            FormulaType::Not => "not",
            FormulaType::And => "and",
            FormulaType::Or => "or",
            FormulaType::Xor => "xor",
            FormulaType::Iff => "=",
            FormulaType::Implies => "=>",
            FormulaType::Ite => "ite",
            FormulaType::Exists => "exists",
            FormulaType::Forall => "forall",
            FormulaType::Constraint => "constraint",
            FormulaType::VarCompare => "varcompare",
            FormulaType::VarAssign => "varassign",
            FormulaType::BitVector => "bv",
            FormulaType::UEq => "ueq",
            FormulaType::PbConstraint => "pb",
        }
    }
}

impl fmt::Display for FormulaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One formula node.
///
/// `Not` carries no child: a NOT node is always the second half of a
/// published pair, and its operand is the first half.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Shape<A, I> {
    True,
    False,
    Bool(Variable),
    Not,
    And(Vec<I>),
    Or(Vec<I>),
    Xor(Vec<I>),
    Iff(Vec<I>),
    Implies(I, I),
    Ite(I, I, I),
    Exists(Vec<Variable>, I),
    Forall(Vec<Variable>, I),
    Atom(A),
}

impl<A, I> Shape<A, I> {
    #[inline(always)]
    pub fn fmap_ref<B, F>(&self, mut f: F) -> Shape<A, B>
    where
        A: Clone,
        F: FnMut(&I) -> B,
    {
        match self {
            Shape::True => Shape::True,
            Shape::False => Shape::False,
            Shape::Bool(v) => Shape::Bool(*v),
            Shape::Not => Shape::Not,
            Shape::And(xs) => Shape::And(xs.iter().map(f).collect()),
            Shape::Or(xs) => Shape::Or(xs.iter().map(f).collect()),
            Shape::Xor(xs) => Shape::Xor(xs.iter().map(f).collect()),
            Shape::Iff(xs) => Shape::Iff(xs.iter().map(f).collect()),
            Shape::Implies(a, b) => Shape::Implies(f(a), f(b)),
            Shape::Ite(a, b, c) => Shape::Ite(f(a), f(b), f(c)),
            Shape::Exists(vs, a) => Shape::Exists(vs.clone(), f(a)),
            Shape::Forall(vs, a) => Shape::Forall(vs.clone(), f(a)),
            Shape::Atom(atom) => Shape::Atom(atom.clone()),
        }
    }

    /// Direct children, in stored order.
    pub fn children(&self) -> Vec<&I> {
        match self {
            Shape::True | Shape::False | Shape::Bool(_) | Shape::Not | Shape::Atom(_) => Vec::new(),
            Shape::And(xs) | Shape::Or(xs) | Shape::Xor(xs) | Shape::Iff(xs) => xs.iter().collect(),
            Shape::Implies(a, b) => vec![a, b],
            Shape::Ite(a, b, c) => vec![a, b, c],
            Shape::Exists(_, a) | Shape::Forall(_, a) => vec![a],
        }
    }

    /// The formula type, with atoms classified by `atom_type`.
    pub fn formula_type_with(&self, atom_type: impl FnOnce(&A) -> FormulaType) -> FormulaType {
        match self {
            Shape::True => FormulaType::True,
            Shape::False => FormulaType::False,
            Shape::Bool(_) => FormulaType::Bool,
            Shape::Not => FormulaType::Not,
            Shape::And(_) => FormulaType::And,
            Shape::Or(_) => FormulaType::Or,
            Shape::Xor(_) => FormulaType::Xor,
            Shape::Iff(_) => FormulaType::Iff,
            Shape::Implies(_, _) => FormulaType::Implies,
            Shape::Ite(_, _, _) => FormulaType::Ite,
            Shape::Exists(_, _) => FormulaType::Exists,
            Shape::Forall(_, _) => FormulaType::Forall,
            Shape::Atom(a) => atom_type(a),
        }
    }

    /// Operands of an n-ary connective, or an empty slice.
    pub fn operands(&self) -> &[I] {
        match self {
            Shape::And(xs) | Shape::Or(xs) | Shape::Xor(xs) | Shape::Iff(xs) => xs,
            _ => &[],
        }
    }

    /// Build an n-ary node of the given connective.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is not an n-ary connective.
    pub fn nary(ty: FormulaType, operands: Vec<I>) -> Self {
        match ty {
            FormulaType::And => Shape::And(operands),
            FormulaType::Or => Shape::Or(operands),
            FormulaType::Xor => Shape::Xor(operands),
            FormulaType::Iff => Shape::Iff(operands),
            _ => panic!("{} is not an n-ary connective", ty),
        }
    }
}
