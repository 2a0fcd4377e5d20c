//! Type-safe wrappers for formula identifiers and variables.
//!
//! Node identifiers are handed out in pairs: a published formula and its
//! negation always occupy two adjacent ids, the base one being odd.
//! `0` is never a valid identifier.
use std::fmt;

/// A pool-assigned formula identifier (1-indexed).
///
/// # Invariants
///
/// - Identifiers are `>= 1` (0 is reserved)
/// - A base formula has an odd id `k`, its negation has id `k + 1`
/// - TRUE is `1` and FALSE is `2`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Identifier of the TRUE formula.
    pub const TRUE: NodeId = NodeId(1);
    /// Identifier of the FALSE formula.
    pub const FALSE: NodeId = NodeId(2);

    /// Creates a new identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Node IDs must be >= 1");
        NodeId(id)
    }

    /// Returns the raw identifier.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Checks whether this id belongs to the base member of its pair.
    pub fn is_base(self) -> bool {
        self.0 % 2 == 1
    }

    /// Returns the id of the base member of the pair.
    pub fn base(self) -> Self {
        if self.is_base() {
            self
        } else {
            NodeId(self.0 - 1)
        }
    }

    /// Returns the id of the other member of the pair.
    pub fn negation(self) -> Self {
        if self.is_base() {
            NodeId(self.0 + 1)
        } else {
            NodeId(self.0 - 1)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// The sort of a variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VariableType {
    Bool,
    Int,
    Real,
    Bitvector,
    Uninterpreted,
}

impl VariableType {
    fn prefix(self) -> &'static str {
        match self {
            VariableType::Bool => "b",
            VariableType::Int => "i",
            VariableType::Real => "r",
            VariableType::Bitvector => "bv",
            VariableType::Uninterpreted => "u",
        }
    }
}

/// A variable (1-indexed) together with its sort.
///
/// Variables are ordered by id first, so two variables with the same id but
/// different sorts are still distinct.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Variable {
    id: u32,
    ty: VariableType,
}

impl Variable {
    /// Creates a new variable.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32, ty: VariableType) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Variable { id, ty }
    }

    /// Shorthand for a Boolean variable.
    pub fn boolean(id: u32) -> Self {
        Variable::new(id, VariableType::Bool)
    }

    pub fn id(self) -> u32 {
        self.id
    }

    pub fn ty(self) -> VariableType {
        self.ty
    }

    pub fn is_boolean(self) -> bool {
        self.ty == VariableType::Bool
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.ty.prefix(), self.id)
    }
}
