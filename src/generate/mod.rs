// Test-path generators and their shared primitives

pub mod cpc;
pub mod edge;
pub mod filter;
pub mod primitives;

pub use cpc::CpcGenerator;
pub use edge::EdgeGenerator;
pub use filter::FilterGenerator;
pub use primitives::{
    build_path_covering_edge, constraint_occurrences, contains_constraint, edge_occurrences,
    find_path_from_edge, find_path_to_edge, is_admissible, mark_constraints, mark_edges,
    repeats_constraint,
};

use crate::sut::{Sut, VertexId};

/// A test path: a start-to-end walk through the model graph
pub type TestPath = Vec<VertexId>;

/// A test-path generation strategy
///
/// Generators are stateless values; every call starts from fresh coverage
/// bookkeeping and the model is never mutated.
pub trait Generator {
    /// Tag used in reports and CSV blocks
    fn name(&self) -> &'static str;

    /// Produce a test set for the model
    fn generate(&self, sut: &Sut) -> Vec<TestPath>;
}

/// All generators in report order
pub fn all_generators() -> [&'static dyn Generator; 3] {
    [&CpcGenerator, &FilterGenerator, &EdgeGenerator]
}
