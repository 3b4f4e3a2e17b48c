//! Symbolic shape overlay. Optional: named dimensions with
//! equality constraints, resolved to a concrete `Shape` by fixed-point
//! propagation bounded to `N + 10` iterations, `N` the constraint count.
//!
//! This module depends only on `shape` -- it never reaches into `storage`
//! or `ops`.

use crate::error::{Result, ShapeError};
use crate::shape::Shape;
use std::collections::BTreeMap;

/// One dimension in a symbolic shape: either a literal size or a named,
/// possibly-unbound dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicDim {
    Fixed(usize),
    Named(String),
}

/// The relation a `Constraint` asserts between its two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ConstraintKind {
    fn symbol(self) -> &'static str {
        match self {
            ConstraintKind::Eq => "==",
            ConstraintKind::Ne => "!=",
            ConstraintKind::Lt => "<",
            ConstraintKind::Le => "<=",
            ConstraintKind::Gt => ">",
            ConstraintKind::Ge => ">=",
        }
    }

    fn holds(self, lhs: u64, rhs: u64) -> bool {
        match self {
            ConstraintKind::Eq => lhs == rhs,
            ConstraintKind::Ne => lhs != rhs,
            ConstraintKind::Lt => lhs < rhs,
            ConstraintKind::Le => lhs <= rhs,
            ConstraintKind::Gt => lhs > rhs,
            ConstraintKind::Ge => lhs >= rhs,
        }
    }
}

/// A relation between two dim expressions. Only `Eq` constraints
/// participate in fixed-point binding; every other kind is still checked
/// against the final bindings in `validate_constraints` but never binds
/// an unbound dim, since e.g. `a < b` does not determine a unique value
/// for either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub lhs: SymbolicDim,
    pub rhs: SymbolicDim,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn eq(lhs: SymbolicDim, rhs: SymbolicDim) -> Self {
        Constraint { lhs, rhs, kind: ConstraintKind::Eq }
    }
}

/// How strict the final `resolve` pass is about dimensions that remain
/// unbound after fixed-point propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Every named dimension in the shape must resolve to a concrete value.
    Strict,
    /// Unbound dimensions are tolerated; `resolve` substitutes `0` as a
    /// placeholder so a caller can still see the shape's rank.
    Lenient,
}

/// Holds the current bindings, the constraint set, and the shape whose dims
/// reference them: a map from name to `Option<u64>` binding, plus a list
/// of `Constraint`s.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Option<u64>>,
    constraints: Vec<Constraint>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Declares a named dimension, optionally with a known value.
    pub fn define(&mut self, name: impl Into<String>, value: Option<u64>) {
        self.bindings.insert(name.into(), value);
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn binding(&self, name: &str) -> Option<u64> {
        self.bindings.get(name).copied().flatten()
    }

    /// Runs the fixed-point equality-propagation pass: on each pass,
    /// if one side of an `eq` constraint is known and the
    /// other an unbound named dim, bind it. Bounded to `N + 10` iterations,
    /// `N` the constraint count, so a cyclic or unsatisfiable constraint set
    /// cannot loop forever.
    pub fn propagate(&mut self) {
        let max_iters = self.constraints.len() + 10;
        for _ in 0..max_iters {
            let mut changed = false;
            for constraint in self.constraints.clone() {
                if self.propagate_one(&constraint) {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn propagate_one(&mut self, constraint: &Constraint) -> bool {
        if constraint.kind != ConstraintKind::Eq {
            return false;
        }
        let lhs_value = self.value_of(&constraint.lhs);
        let rhs_value = self.value_of(&constraint.rhs);

        match (lhs_value, rhs_value) {
            (Some(value), None) => self.bind_if_named(&constraint.rhs, value),
            (None, Some(value)) => self.bind_if_named(&constraint.lhs, value),
            _ => false,
        }
    }

    fn bind_if_named(&mut self, dim: &SymbolicDim, value: u64) -> bool {
        if let SymbolicDim::Named(name) = dim {
            if self.bindings.get(name).copied().flatten().is_none() {
                self.bindings.insert(name.clone(), Some(value));
                return true;
            }
        }
        false
    }

    fn value_of(&self, dim: &SymbolicDim) -> Option<u64> {
        match dim {
            SymbolicDim::Fixed(size) => Some(*size as u64),
            SymbolicDim::Named(name) => self.bindings.get(name).copied().flatten(),
        }
    }

    /// Validates every constraint against the current bindings. Both sides
    /// must be known; an unknown side is not itself a violation (that is
    /// `resolve`'s job under `ResolveMode::Strict`), but a known mismatch is.
    pub fn validate_constraints(&self) -> Result<()> {
        for constraint in &self.constraints {
            let lhs_value = self.value_of(&constraint.lhs);
            let rhs_value = self.value_of(&constraint.rhs);
            if let (Some(lhs_value), Some(rhs_value)) = (lhs_value, rhs_value) {
                if !constraint.kind.holds(lhs_value, rhs_value) {
                    return Err(ShapeError::ConstraintViolation {
                        lhs: describe(&constraint.lhs),
                        rhs: describe(&constraint.rhs),
                        op: constraint.kind.symbol(),
                        lhs_value,
                        rhs_value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Substitutes bindings into `shape`, propagating and validating first,
    /// and produces a concrete `Shape`.
    pub fn resolve(&mut self, shape: &[SymbolicDim], mode: ResolveMode) -> Result<Shape> {
        self.propagate();
        self.validate_constraints()?;

        shape
        .iter()
        .map(|dim| match self.value_of(dim) {
                Some(value) => Ok(value as usize),
                None => match mode {
                    ResolveMode::Strict => Err(ShapeError::UnresolvedSymbolicDim {
                            name: describe(dim),
                    }),
                    ResolveMode::Lenient => Ok(0),
                },
        })
        .collect()
    }
}

fn describe(dim: &SymbolicDim) -> String {
    match dim {
        SymbolicDim::Fixed(size) => size.to_string(),
        SymbolicDim::Named(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s10_symbolic_resolution_seed_scenario() {
        let mut env = Environment::new();
        env.define("n", Some(32));
        env.define("m", None);
        env.add_constraint(Constraint::eq(
            SymbolicDim::Named("n".to_string()),
            SymbolicDim::Named("m".to_string()),
        ));

        let shape = vec![SymbolicDim::Named("n".to_string()), SymbolicDim::Named("m".to_string())];
        let resolved = env.resolve(&shape, ResolveMode::Strict).unwrap();
        assert_eq!(resolved, vec![32, 32]);
    }

    #[test]
    fn unresolved_dim_fails_in_strict_mode() {
        let mut env = Environment::new();
        env.define("k", None);
        let shape = vec![SymbolicDim::Named("k".to_string())];
        assert!(env.resolve(&shape, ResolveMode::Strict).is_err());
    }

    #[test]
    fn unresolved_dim_becomes_zero_in_lenient_mode() {
        let mut env = Environment::new();
        env.define("k", None);
        let shape = vec![SymbolicDim::Named("k".to_string())];
        assert_eq!(env.resolve(&shape, ResolveMode::Lenient).unwrap(), vec![0]);
    }

    #[test]
    fn conflicting_constraint_is_a_violation() {
        let mut env = Environment::new();
        env.define("a", Some(3));
        env.define("b", Some(4));
        env.add_constraint(Constraint::eq(
            SymbolicDim::Named("a".to_string()),
            SymbolicDim::Named("b".to_string()),
        ));
        assert!(env.validate_constraints().is_err());
    }

    #[test]
    fn fixed_literal_dims_need_no_binding() {
        let mut env = Environment::new();
        let shape = vec![SymbolicDim::Fixed(7), SymbolicDim::Fixed(8)];
        assert_eq!(env.resolve(&shape, ResolveMode::Strict).unwrap(), vec![7, 8]);
    }

    #[test]
    fn propagation_chains_through_multiple_constraints() {
        let mut env = Environment::new();
        env.define("a", Some(5));
        env.define("b", None);
        env.define("c", None);
        env.add_constraint(Constraint::eq(
            SymbolicDim::Named("a".to_string()),
            SymbolicDim::Named("b".to_string()),
        ));
        env.add_constraint(Constraint::eq(
            SymbolicDim::Named("b".to_string()),
            SymbolicDim::Named("c".to_string()),
        ));
        env.propagate();
        assert_eq!(env.binding("b"), Some(5));
        assert_eq!(env.binding("c"), Some(5));
    }

    #[test]
    fn inequality_constraints_validate_but_never_bind() {
        let mut env = Environment::new();
        env.define("a", Some(3));
        env.define("b", None);
        env.add_constraint(Constraint {
            lhs: SymbolicDim::Named("a".to_string()),
            rhs: SymbolicDim::Named("b".to_string()),
            kind: ConstraintKind::Lt,
        });
        env.propagate();
        assert_eq!(env.binding("b"), None, "Lt cannot pin a unique value for b");
        assert!(env.validate_constraints().is_ok(), "unbound side is not yet a violation");
    }

    #[test]
    fn violated_inequality_is_rejected() {
        let mut env = Environment::new();
        env.define("a", Some(5));
        env.define("b", Some(3));
        env.add_constraint(Constraint {
            lhs: SymbolicDim::Named("a".to_string()),
            rhs: SymbolicDim::Named("b".to_string()),
            kind: ConstraintKind::Le,
        });
        assert!(env.validate_constraints().is_err());
    }
}
