//! Formula constructors.
//!
//! Every constructor takes canonical operands, canonicalizes and simplifies
//! the requested shape, and only then interns it. Operands are ordered by id;
//! since a formula and its negation get adjacent ids, a complementary pair of
//! operands always ends up side by side after sorting.
//!
//! An explicitly empty operand list is FALSE for every n-ary connective,
//! while an AND whose operands were all eliminated as TRUE is TRUE.

use log::debug;

use crate::pool::FormulaPool;
use crate::reference::Formula;
use crate::shape::{FormulaType, Shape};
use crate::theory::{Atom, AtomValue, NegatableAtom, Theory};
use crate::types::Variable;

impl<T: Theory> FormulaPool<T> {
    /// The formula of a Boolean variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` is not Boolean.
    pub fn variable(&self, var: Variable) -> Formula<T> {
        assert!(var.is_boolean(), "Variable {} is not Boolean", var);
        // Never hand this variable out as a fresh one.
        self.variables().reserve_until(var.id());
        self.intern(Shape::Bool(var))
    }

    /// A Boolean variable formula over a fresh variable.
    pub fn fresh_variable(&self) -> Formula<T> {
        let var = self.variables().fresh_boolean();
        self.variable(var)
    }

    pub fn not(&self, formula: &Formula<T>) -> Formula<T> {
        formula.negation()
    }

    pub fn and(&self, operands: impl IntoIterator<Item = Formula<T>>) -> Formula<T> {
        self.and_or(FormulaType::And, operands.into_iter().collect())
    }

    pub fn or(&self, operands: impl IntoIterator<Item = Formula<T>>) -> Formula<T> {
        self.and_or(FormulaType::Or, operands.into_iter().collect())
    }

    fn and_or(&self, ty: FormulaType, operands: Vec<Formula<T>>) -> Formula<T> {
        assert!(matches!(ty, FormulaType::And | FormulaType::Or));
        if operands.is_empty() {
            debug!("{}: no operands => false", ty);
            return self.false_formula();
        }
        // Neutral element and annihilator: AND(TRUE, x) = x, AND(FALSE, x) = FALSE.
        let neutral = ty == FormulaType::And;

        let mut ops = flatten(ty, operands);
        ops.sort();
        ops.dedup();

        if let Some(w) = ops.windows(2).find(|w| w[0].is_negation_of(&w[1])) {
            debug!("{}: {} and {} are complementary => {}", ty, w[0], w[1], !neutral);
            return self.constant(!neutral);
        }
        if ops.iter().any(|f| is_constant_value(f, !neutral)) {
            debug!("{}: contains {} => {}", ty, !neutral, !neutral);
            return self.constant(!neutral);
        }
        ops.retain(|f| !is_constant_value(f, neutral));

        match ops.len() {
            0 => {
                debug!("{}: all operands eliminated => {}", ty, neutral);
                self.constant(neutral)
            }
            1 => ops.swap_remove(0),
            _ => self.intern(Shape::nary(ty, ops)),
        }
    }

    /// Exclusive disjunction; operands occurring an even number of times cancel.
    pub fn xor(&self, operands: impl IntoIterator<Item = Formula<T>>) -> Formula<T> {
        let operands: Vec<_> = operands.into_iter().collect();
        if operands.is_empty() {
            debug!("xor: no operands => false");
            return self.false_formula();
        }
        let mut ops = flatten(FormulaType::Xor, operands);
        ops.sort();
        let ops = odd_occurrences(ops);

        // x ^ ~x is TRUE, and TRUE flips the parity of the rest.
        let mut negate = false;
        let mut rest = Vec::with_capacity(ops.len());
        let mut ops = ops.into_iter().peekable();
        while let Some(f) = ops.next() {
            if ops.peek().is_some_and(|g| f.is_negation_of(g)) {
                debug!("xor: {} and its negation => true", f);
                ops.next();
                negate = !negate;
            } else if f.is_true() {
                negate = !negate;
            } else if !f.is_false() {
                rest.push(f);
            }
        }

        let result = match rest.len() {
            0 => self.false_formula(),
            1 => rest.swap_remove(0),
            _ => self.intern(Shape::Xor(rest)),
        };
        if negate {
            -result
        } else {
            result
        }
    }

    /// Equivalence: all operands have the same truth value.
    pub fn iff(&self, operands: impl IntoIterator<Item = Formula<T>>) -> Formula<T> {
        let mut ops: Vec<_> = operands.into_iter().collect();
        if ops.is_empty() {
            debug!("iff: no operands => false");
            return self.false_formula();
        }
        ops.sort();
        ops.dedup();

        if let Some(w) = ops.windows(2).find(|w| w[0].is_negation_of(&w[1])) {
            debug!("iff: {} and {} are complementary => false", w[0], w[1]);
            return self.false_formula();
        }
        // At most one constant is left, and it sorts first.
        if ops[0].is_constant() {
            let value = ops.remove(0).is_true();
            if ops.is_empty() {
                return self.true_formula();
            }
            debug!("iff: contains {} => all operands {}", value, value);
            let ops = ops.into_iter().map(|f| if value { f } else { -f });
            return self.and(ops);
        }
        match ops.len() {
            1 => self.true_formula(),
            _ => self.intern(Shape::Iff(ops)),
        }
    }

    /// Exclusive disjunction over a multiset: equal elements cancel pairwise.
    pub fn xor_multiset(&self, operands: impl IntoIterator<Item = Formula<T>>) -> Formula<T> {
        let mut ops: Vec<_> = operands.into_iter().collect();
        match ops.len() {
            0 => return self.false_formula(),
            1 => return ops.swap_remove(0),
            _ => {}
        }
        ops.sort();
        self.xor(odd_occurrences(ops))
    }

    pub fn implies(&self, premise: Formula<T>, conclusion: Formula<T>) -> Formula<T> {
        if premise.is_false() || conclusion.is_true() {
            debug!("implies: {} => {} is trivially true", premise, conclusion);
            return self.true_formula();
        }
        if premise.is_true() {
            return conclusion;
        }
        if conclusion.is_false() {
            return -premise;
        }
        if premise == conclusion {
            return self.true_formula();
        }
        if premise.is_negation_of(&conclusion) {
            // (~a => a) = a, (a => ~a) = ~a
            return conclusion;
        }
        self.intern(Shape::Implies(premise, conclusion))
    }

    pub fn ite(&self, condition: Formula<T>, then: Formula<T>, otherwise: Formula<T>) -> Formula<T> {
        if condition.is_true() {
            debug!("ite(1,G,H) => G");
            return then;
        }
        if condition.is_false() {
            debug!("ite(0,G,H) => H");
            return otherwise;
        }
        if then == otherwise {
            debug!("ite(F,G,G) => G");
            return then;
        }
        if !condition.is_base() {
            debug!("ite(~F,G,H) => ite(F,H,G)");
            return self.ite(-condition, otherwise, then);
        }
        if then.is_true() && otherwise.is_false() {
            debug!("ite(F,1,0) => F");
            return condition;
        }
        if then.is_false() && otherwise.is_true() {
            debug!("ite(F,0,1) => ~F");
            return -condition;
        }
        self.intern(Shape::Ite(condition, then, otherwise))
    }

    pub fn exists(&self, vars: impl IntoIterator<Item = Variable>, body: Formula<T>) -> Formula<T> {
        self.quantify(FormulaType::Exists, vars, body)
    }

    pub fn forall(&self, vars: impl IntoIterator<Item = Variable>, body: Formula<T>) -> Formula<T> {
        self.quantify(FormulaType::Forall, vars, body)
    }

    fn quantify(&self, ty: FormulaType, vars: impl IntoIterator<Item = Variable>, body: Formula<T>) -> Formula<T> {
        let mut vars: Vec<_> = vars.into_iter().collect();
        if vars.is_empty() {
            debug!("{}: no bound variables => body", ty);
            return body;
        }
        vars.sort();
        vars.dedup();
        match ty {
            FormulaType::Exists => self.intern(Shape::Exists(vars, body)),
            FormulaType::Forall => self.intern(Shape::Forall(vars, body)),
            _ => panic!("{} is not a quantifier", ty),
        }
    }

    /// Wrap an arithmetic constraint, storing whichever polarity is smaller.
    pub fn constraint(&self, constraint: T::Constraint) -> Formula<T> {
        if let Some(value) = constraint.as_constant() {
            debug!("constraint {} is trivially {}", constraint, value);
            return self.constant(value);
        }
        let negation = constraint.negation();
        if constraint < negation {
            self.intern(Shape::Atom(AtomValue::Constraint(constraint)))
        } else {
            -self.intern(Shape::Atom(AtomValue::Constraint(negation)))
        }
    }

    pub fn var_compare(&self, compare: T::VarCompare) -> Formula<T> {
        if let Some(constraint) = T::compare_as_constraint(&compare) {
            return self.constraint(constraint);
        }
        self.wrap_atom(AtomValue::VarCompare(compare))
    }

    pub fn var_assign(&self, assign: T::VarAssign) -> Formula<T> {
        self.wrap_atom(AtomValue::VarAssign(assign))
    }

    pub fn bitvector(&self, constraint: T::BvConstraint) -> Formula<T> {
        self.wrap_atom(AtomValue::BitVector(constraint))
    }

    pub fn uequality(&self, equality: T::UEquality) -> Formula<T> {
        self.wrap_atom(AtomValue::UEquality(equality))
    }

    pub fn pb_constraint(&self, constraint: T::PbConstraint) -> Formula<T> {
        self.wrap_atom(AtomValue::PbConstraint(constraint))
    }

    /// Wrap any atom value.
    pub fn atom(&self, atom: AtomValue<T>) -> Formula<T> {
        match atom {
            AtomValue::Constraint(c) => self.constraint(c),
            AtomValue::VarCompare(c) => self.var_compare(c),
            other => self.wrap_atom(other),
        }
    }

    fn wrap_atom(&self, atom: AtomValue<T>) -> Formula<T> {
        if let Some(value) = atom.as_constant() {
            debug!("{} {} is trivially {}", atom.formula_type(), atom, value);
            return self.constant(value);
        }
        self.intern(Shape::Atom(atom))
    }

    /// Build a formula of the given connective from a list of operands.
    ///
    /// # Panics
    ///
    /// Panics for atom types, NOT, constants, quantifiers, and on the wrong
    /// number of operands for IMPLIES or ITE.
    pub fn create(&self, ty: FormulaType, operands: Vec<Formula<T>>) -> Formula<T> {
        match ty {
            FormulaType::And | FormulaType::Or => self.and_or(ty, operands),
            FormulaType::Xor => self.xor(operands),
            FormulaType::Iff => self.iff(operands),
            FormulaType::Implies => {
                let [premise, conclusion] = <[Formula<T>; 2]>::try_from(operands)
                    .unwrap_or_else(|ops| panic!("IMPLIES needs 2 operands, got {}", ops.len()));
                self.implies(premise, conclusion)
            }
            FormulaType::Ite => {
                let [c, a, b] = <[Formula<T>; 3]>::try_from(operands)
                    .unwrap_or_else(|ops| panic!("ITE needs 3 operands, got {}", ops.len()));
                self.ite(c, a, b)
            }
            _ => panic!("Cannot create a {} formula from operands", ty),
        }
    }

    /// Build a formula of the given connective over a single operand.
    pub fn create_unary(&self, ty: FormulaType, operand: Formula<T>) -> Formula<T> {
        match ty {
            FormulaType::Not => -operand,
            FormulaType::And | FormulaType::Or | FormulaType::Xor => operand,
            FormulaType::Iff => self.true_formula(),
            _ => panic!("Cannot create a unary {} formula", ty),
        }
    }
}

fn is_constant_value<T: Theory>(f: &Formula<T>, value: bool) -> bool {
    if value {
        f.is_true()
    } else {
        f.is_false()
    }
}

/// Replace operands of connective `ty` by their own operands.
///
/// One level is enough: published nodes are already flat.
fn flatten<T: Theory>(ty: FormulaType, operands: Vec<Formula<T>>) -> Vec<Formula<T>> {
    let mut flat = Vec::with_capacity(operands.len());
    for f in operands {
        if f.formula_type() == ty {
            flat.extend(f.subformulas().iter().cloned());
        } else {
            flat.push(f);
        }
    }
    flat
}

/// Keep one copy of each element occurring an odd number of times.
///
/// `sorted` must be sorted.
fn odd_occurrences<T: Theory>(sorted: Vec<Formula<T>>) -> Vec<Formula<T>> {
    let mut result: Vec<Formula<T>> = Vec::with_capacity(sorted.len());
    let mut count = 0usize;
    for f in sorted {
        if result.last() == Some(&f) {
            count += 1;
        } else {
            if count % 2 == 0 {
                result.pop();
            }
            result.push(f);
            count = 1;
        }
    }
    if count % 2 == 0 {
        result.pop();
    }
    result
}
