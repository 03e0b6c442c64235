//! SUT export to DOT and PNG
//!
//! The DOT rendering highlights the start vertex, the end set, and the
//! vertices touched by constraints (dashed outline for constraint sources,
//! solid for constraint targets, colored by constraint kind).

use crate::sut::{ConstraintKind, Sut, VertexId};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::process::Command;

/// Export a model to DOT format for Graphviz
pub fn export_dot(sut: &Sut) -> String {
    let mut dot = String::from("digraph SUT {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box, style=rounded];\n\n");

    for v in sut.graph().node_indices() {
        writeln!(
            dot,
            "  \"{}\" [label=\"{}\"{}];",
            dot_id(sut.label(v)),
            escape_dot_string(sut.label(v)),
            vertex_attributes(sut, v)
        )
        .ok();
    }

    dot.push('\n');
    for e in sut.edge_indices() {
        if let Some((u, v)) = sut.edge_endpoints(e) {
            writeln!(
                dot,
                "  \"{}\" -> \"{}\";",
                dot_id(sut.label(u)),
                dot_id(sut.label(v))
            )
            .ok();
        }
    }

    dot.push_str("}\n");
    dot
}

/// Write the DOT rendering to a file
pub fn write_dot(sut: &Sut, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(export_dot(sut).as_bytes())
}

/// Render a DOT file to PNG by spawning Graphviz `dot`
pub fn render_to_png(dot_path: impl AsRef<Path>, png_path: impl AsRef<Path>) -> std::io::Result<()> {
    let status = Command::new("dot")
        .arg("-Tpng")
        .arg(dot_path.as_ref())
        .arg("-o")
        .arg(png_path.as_ref())
        .status()?;
    if !status.success() {
        return Err(std::io::Error::other("graphviz rendering failed"));
    }
    Ok(())
}

/// Stable DOT node id: non-word characters collapse to '_'
fn dot_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut last_was_sep = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            id.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            id.push('_');
            last_was_sep = true;
        }
    }
    id
}

fn escape_dot_string(s: &str) -> String {
    s.replace('"', "\\\"")
}

fn vertex_attributes(sut: &Sut, v: VertexId) -> String {
    let mut attrs = String::new();
    if sut.start() == Some(v) {
        attrs.push_str(", style=filled, fillcolor=chartreuse4");
    } else if sut.ends().contains(&v) {
        attrs.push_str(", style=filled, fillcolor=lightcoral");
    }

    // Constraint endpoints: dashed outline for sources, solid for targets.
    // The last matching constraint wins.
    let mut color = None;
    let mut style = None;
    for c in sut.constraints() {
        if c.from == v {
            color = Some(kind_color(c.kind));
            style = Some("dashed");
        }
        if c.to == v {
            color = Some(kind_color(c.kind));
            style = Some("solid");
        }
    }
    if let Some(color) = color {
        write!(attrs, ", color={}", color).ok();
    }
    if let Some(style) = style {
        write!(attrs, ", style={}", style).ok();
    }
    attrs
}

fn kind_color(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::Positive => "green",
        ConstraintKind::Once => "blue",
        ConstraintKind::Negative => "red",
        ConstraintKind::MaxOnce => "orange",
    }
}
