//! Quality metrics over a generated test set
//!
//! Every metric takes the model and/or the test set and returns a plain
//! number; nothing here mutates state or fails. Constraint satisfaction
//! counts paths containing the constraint, and the sentinel `-1.0` marks
//! metrics that are undefined for the input (no constraints of a kind,
//! fewer than two paths).

use crate::generate::primitives::contains_constraint;
use crate::generate::TestPath;
use crate::sut::{Constraint, ConstraintKind, Sut};
use serde::Serialize;
use std::collections::HashSet;

/// Overall constraint verdict: `1` when every constraint is satisfied,
/// otherwise the negated number of unsatisfied constraints
///
/// A constraint counts as satisfied from the number `n` of paths that
/// contain it: POSITIVE needs `n >= 1`, ONCE `n == 1`, NEGATIVE `n == 0`,
/// MAX_ONCE `n <= 1`.
pub fn valid(sut: &Sut, tests: &[TestPath]) -> i64 {
    let mut unsat = 0i64;
    for c in sut.constraints() {
        let n = paths_containing(tests, c);
        let ok = match c.kind {
            ConstraintKind::Positive => n >= 1,
            ConstraintKind::Once => n == 1,
            ConstraintKind::Negative => n == 0,
            ConstraintKind::MaxOnce => n <= 1,
        };
        if !ok {
            unsat += 1;
        }
    }
    if unsat == 0 {
        1
    } else {
        -unsat
    }
}

/// Number of paths in the test set
pub fn size(tests: &[TestPath]) -> usize {
    tests.len()
}

/// Total edge length over all paths
pub fn total_edges(tests: &[TestPath]) -> usize {
    tests.iter().map(|p| p.len().saturating_sub(1)).sum()
}

/// Number of distinct graph edges traversed by some path
pub fn unique_edges(sut: &Sut, tests: &[TestPath]) -> usize {
    let mut covered = HashSet::new();
    for path in tests {
        for pair in path.windows(2) {
            if let Some(e) = sut.edge_between(pair[0], pair[1]) {
                covered.insert(e);
            }
        }
    }
    covered.len()
}

/// Mean edge length, or 0 for an empty test set
pub fn average_length(tests: &[TestPath]) -> f64 {
    if tests.is_empty() {
        return 0.0;
    }
    total_edges(tests) as f64 / tests.len() as f64
}

/// Sample standard deviation of the edge lengths, or -1 for fewer than
/// two paths
pub fn length_std_dev(tests: &[TestPath]) -> f64 {
    let n = tests.len();
    if n < 2 {
        return -1.0;
    }
    let avg = average_length(tests);
    let sum2: f64 = tests
        .iter()
        .map(|p| {
            let len = p.len().saturating_sub(1) as f64;
            (len - avg) * (len - avg)
        })
        .sum();
    (sum2 / (n - 1) as f64).sqrt()
}

/// Unique edges per traversed edge, or 0 when nothing was traversed
pub fn edge_efficiency(sut: &Sut, tests: &[TestPath]) -> f64 {
    let total = total_edges(tests);
    if total == 0 {
        return 0.0;
    }
    unique_edges(sut, tests) as f64 / total as f64
}

/// Fraction of graph edges covered, or 0 for an edgeless graph
pub fn edge_coverage(sut: &Sut, tests: &[TestPath]) -> f64 {
    let all = sut.edge_count();
    if all == 0 {
        return 0.0;
    }
    unique_edges(sut, tests) as f64 / all as f64
}

/// Fraction of POSITIVE constraints contained in at least one path
pub fn cov_positive(sut: &Sut, tests: &[TestPath]) -> f64 {
    cov_constraint_kind(sut, ConstraintKind::Positive, |c| {
        paths_containing(tests, c) >= 1
    })
}

/// Fraction of ONCE constraints contained in exactly one path
pub fn cov_once(sut: &Sut, tests: &[TestPath]) -> f64 {
    cov_constraint_kind(sut, ConstraintKind::Once, |c| {
        paths_containing(tests, c) == 1
    })
}

/// Fraction of NEGATIVE constraints contained in at least one path
///
/// Reports the violation rate, not compliance: 0.0 means every NEGATIVE
/// constraint is respected.
pub fn cov_negative(sut: &Sut, tests: &[TestPath]) -> f64 {
    cov_constraint_kind(sut, ConstraintKind::Negative, |c| {
        paths_containing(tests, c) >= 1
    })
}

/// Fraction of MAX_ONCE constraints contained in at most one path
pub fn cov_max_once(sut: &Sut, tests: &[TestPath]) -> f64 {
    cov_constraint_kind(sut, ConstraintKind::MaxOnce, |c| {
        paths_containing(tests, c) <= 1
    })
}

/// Number of paths containing the constraint
fn paths_containing(tests: &[TestPath], c: &Constraint) -> usize {
    tests.iter().filter(|p| contains_constraint(p, c)).count()
}

/// Fraction of constraints of `kind` satisfying `sat`, or -1 when the
/// model has no constraint of that kind
fn cov_constraint_kind(
    sut: &Sut,
    kind: ConstraintKind,
    sat: impl Fn(&Constraint) -> bool,
) -> f64 {
    let of_kind: Vec<&Constraint> = sut
        .constraints()
        .iter()
        .filter(|c| c.kind == kind)
        .collect();
    if of_kind.is_empty() {
        return -1.0;
    }
    let sat_count = of_kind.iter().filter(|c| sat(c)).count();
    sat_count as f64 / of_kind.len() as f64
}

/// Full metrics row for one generator run
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub valid: i64,
    pub size: usize,
    pub total_edges: usize,
    pub unique_edges: usize,
    pub average_length: f64,
    pub length_std_dev: f64,
    pub edge_efficiency: f64,
    pub cov_positive: f64,
    pub cov_once: f64,
    pub cov_negative: f64,
    pub cov_max_once: f64,
    pub edge_coverage: f64,
    pub time_ms: f64,
}

impl MetricsReport {
    pub fn collect(sut: &Sut, tests: &[TestPath], time_ms: f64) -> Self {
        Self {
            valid: valid(sut, tests),
            size: size(tests),
            total_edges: total_edges(tests),
            unique_edges: unique_edges(sut, tests),
            average_length: average_length(tests),
            length_std_dev: length_std_dev(tests),
            edge_efficiency: edge_efficiency(sut, tests),
            cov_positive: cov_positive(sut, tests),
            cov_once: cov_once(sut, tests),
            cov_negative: cov_negative(sut, tests),
            cov_max_once: cov_max_once(sut, tests),
            edge_coverage: edge_coverage(sut, tests),
            time_ms,
        }
    }
}
