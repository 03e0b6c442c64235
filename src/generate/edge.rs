//! Edge-coverage generator
//!
//! For each yet-uncovered edge, in insertion order, builds one
//! start-to-end path traversing it. Constraints are not consulted.

use crate::generate::primitives::{build_path_covering_edge, mark_edges};
use crate::generate::{Generator, TestPath};
use crate::sut::Sut;
use std::collections::HashSet;

pub struct EdgeGenerator;

impl Generator for EdgeGenerator {
    fn name(&self) -> &'static str {
        "Edge"
    }

    fn generate(&self, sut: &Sut) -> Vec<TestPath> {
        let mut covered_edges = HashSet::new();
        let mut paths = Vec::new();
        for e in sut.edge_indices() {
            if covered_edges.contains(&e) {
                continue;
            }
            // Unreachable edges produce no path and are skipped
            if let Some(path) = build_path_covering_edge(sut, e) {
                mark_edges(&path, sut, &mut covered_edges);
                paths.push(path);
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_edge_chain_single_path() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        sut.add_edge("A", "END1");
        sut.add_end("END1");

        let paths = EdgeGenerator.generate(&sut);
        assert_eq!(paths.len(), 1);
        assert_eq!(sut.path_labels(&paths[0]), vec!["START", "A", "END1"]);
    }

    #[test]
    fn test_diamond_covers_all_edges() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        sut.add_edge("A", "END1");
        sut.add_edge("START", "B");
        sut.add_edge("B", "END1");
        sut.add_end("END1");

        let paths = EdgeGenerator.generate(&sut);
        assert_eq!(paths.len(), 2);
        assert_eq!(sut.path_labels(&paths[0]), vec!["START", "A", "END1"]);
        assert_eq!(sut.path_labels(&paths[1]), vec!["START", "B", "END1"]);
    }

    #[test]
    fn test_no_edges_empty_output() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_end("START");
        assert!(EdgeGenerator.generate(&sut).is_empty());
    }

    #[test]
    fn test_unreachable_edge_skipped() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "END1");
        sut.add_end("END1");
        sut.add_edge("X", "Y");

        let paths = EdgeGenerator.generate(&sut);
        assert_eq!(paths.len(), 1);
        assert_eq!(sut.path_labels(&paths[0]), vec!["START", "END1"]);
    }

    #[test]
    fn test_deterministic() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        sut.add_edge("START", "B");
        sut.add_edge("A", "B");
        sut.add_edge("B", "END1");
        sut.add_end("END1");

        let first = EdgeGenerator.generate(&sut);
        let second = EdgeGenerator.generate(&sut);
        assert_eq!(first, second);
    }
}
