//! Filtering generator
//!
//! Runs the edge-coverage generator, then keeps only the paths that stay
//! admissible under the constraints as coverage accumulates. Output order
//! is inherited from the edge generator.

use crate::generate::primitives::{is_admissible, mark_constraints};
use crate::generate::{EdgeGenerator, Generator, TestPath};
use crate::sut::Sut;
use std::collections::HashSet;

pub struct FilterGenerator;

impl Generator for FilterGenerator {
    fn name(&self) -> &'static str {
        "Filter"
    }

    fn generate(&self, sut: &Sut) -> Vec<TestPath> {
        let constraints = sut.constraints();
        let mut covered_constraints = HashSet::new();
        let mut kept = Vec::new();
        for path in EdgeGenerator.generate(sut) {
            if is_admissible(&path, constraints, &covered_constraints) {
                mark_constraints(&path, constraints, &mut covered_constraints);
                kept.push(path);
            }
        }
        kept
    }
}
