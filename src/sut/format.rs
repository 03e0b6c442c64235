//! Canonical text rendering of a SUT model
//!
//! Emits the same line-oriented grammar the loader consumes, so
//! `load ∘ format` is the identity on loader-built models.

use crate::sut::Sut;
use std::fmt::Write;

/// Render a model in the canonical SUT text format
///
/// One `vertex:[succ,...]` line per vertex with outgoing edges, in vertex
/// insertion order; `vertex:[]` lines for end vertices without successors;
/// constraint lines last, in registration order.
pub fn to_text(sut: &Sut) -> String {
    let mut out = String::new();
    for v in sut.graph().node_indices() {
        let succs = sut.outgoing(v);
        if !succs.is_empty() {
            let list: Vec<&str> = succs.iter().map(|&s| sut.label(s)).collect();
            writeln!(out, "{}:[{}]", sut.label(v), list.join(",")).ok();
        } else if sut.ends().contains(&v) {
            writeln!(out, "{}:[]", sut.label(v)).ok();
        }
    }
    for c in sut.constraints() {
        writeln!(
            out,
            "Constraint[{} - {} - {}]",
            sut.label(c.from),
            sut.label(c.to),
            c.kind.as_str()
        )
        .ok();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sut::ConstraintKind;

    #[test]
    fn test_format_simple_model() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        sut.add_edge("A", "END1");
        sut.add_end("END1");
        sut.add_constraint("START", "A", ConstraintKind::Once);

        let text = to_text(&sut);
        assert_eq!(
            text,
            "START:[A]\nA:[END1]\nEND1:[]\nConstraint[START - A - ONCE]\n"
        );
    }

    #[test]
    fn test_childless_non_end_vertex_omitted() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        // A has no successors and is not an end: only expressible as a successor
        let text = to_text(&sut);
        assert_eq!(text, "START:[A]\n");
    }

    #[test]
    fn test_end_with_successors_keeps_name_marker() {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "END1");
        sut.add_edge("END1", "START");
        sut.add_end("END1");
        // END1 round-trips through its name prefix, not through `[]`
        let text = to_text(&sut);
        assert_eq!(text, "START:[END1]\nEND1:[START]\n");
    }
}
