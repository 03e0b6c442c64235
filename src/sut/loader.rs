//! Loader for the line-oriented SUT text format
//!
//! Grammar:
//! - `vertex:[succ1,succ2,...]` declares outgoing edges; `[]` marks the
//!   left-hand vertex as an end vertex.
//! - The vertex named `START` (or `Start`) is the start vertex; successors
//!   whose name begins with `END` or `end` join the end set.
//! - `Constraint[from - to - TYPE]` registers a constraint with
//!   `TYPE ∈ {POSITIVE, ONCE, NEGATIVE, MAX_ONCE}`.
//! - Blank lines and lines starting with `#` are comments.
//!
//! Every grammar violation is reported with file name and line number.
//! Constraints are resolved after the whole file is parsed, so they may
//! reference vertices declared on later lines.

use crate::sut::{ConstraintKind, Sut};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading a SUT model file
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O failure: unreadable file, missing file or directory
    #[error("cannot load {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Grammar or validation violation
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl LoadError {
    fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

/// Load a SUT model from a text file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Sut, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &text)
}

/// Deferred constraint reference, resolved once all vertices are known
struct PendingConstraint {
    line: usize,
    from: String,
    to: String,
    kind: ConstraintKind,
}

fn parse(path: &Path, text: &str) -> Result<Sut, LoadError> {
    let mut sut = Sut::new();
    let mut pending: Vec<PendingConstraint> = Vec::new();
    let mut last_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("Constraint") {
            pending.push(parse_constraint(path, line_no, line)?);
            continue;
        }

        parse_vertex_line(path, line_no, line, &mut sut)?;
    }

    // Post-parse validation
    if sut.start().is_none() {
        return Err(LoadError::parse(path, last_line, "no start vertex declared"));
    }
    if sut.ends().is_empty() {
        return Err(LoadError::parse(path, last_line, "no end vertex declared"));
    }
    for c in pending {
        for label in [&c.from, &c.to] {
            if sut.vertex(label).is_none() {
                return Err(LoadError::parse(
                    path,
                    c.line,
                    format!("constraint references unknown vertex '{label}'"),
                ));
            }
        }
        sut.add_constraint(&c.from, &c.to, c.kind);
    }

    Ok(sut)
}

fn parse_constraint(path: &Path, line_no: usize, line: &str) -> Result<PendingConstraint, LoadError> {
    let lb = line.find('[');
    let rb = line.find(']');
    let (lb, rb) = match (lb, rb) {
        (Some(lb), Some(rb)) if lb < rb => (lb, rb),
        _ => {
            return Err(LoadError::parse(
                path,
                line_no,
                "malformed constraint: expected 'Constraint[from - to - TYPE]'",
            ))
        }
    };
    let tokens: Vec<&str> = line[lb + 1..rb].split('-').map(str::trim).collect();
    if tokens.len() != 3 {
        return Err(LoadError::parse(
            path,
            line_no,
            format!("constraint needs 3 tokens, got {}", tokens.len()),
        ));
    }
    let kind: ConstraintKind = tokens[2].parse().map_err(|()| {
        LoadError::parse(
            path,
            line_no,
            format!("unknown constraint type '{}'", tokens[2]),
        )
    })?;
    Ok(PendingConstraint {
        line: line_no,
        from: tokens[0].to_string(),
        to: tokens[1].to_string(),
        kind,
    })
}

fn parse_vertex_line(
    path: &Path,
    line_no: usize,
    line: &str,
    sut: &mut Sut,
) -> Result<(), LoadError> {
    let (lhs, rhs) = line
        .split_once(':')
        .ok_or_else(|| LoadError::parse(path, line_no, "missing ':' in vertex declaration"))?;
    let from = lhs.trim();
    if from.is_empty() {
        return Err(LoadError::parse(path, line_no, "empty vertex name"));
    }

    if from == "START" || from == "Start" {
        sut.set_start(from);
    }

    let succ_list = rhs.trim();
    if !succ_list.starts_with('[') || !succ_list.ends_with(']') {
        return Err(LoadError::parse(
            path,
            line_no,
            "successor list must be bracketed, e.g. 'A:[B,C]'",
        ));
    }
    if succ_list == "[]" {
        sut.add_end(from);
    }
    sut.add_vertex(from);

    let inner = succ_list[1..succ_list.len() - 1].trim();
    if inner.is_empty() {
        return Ok(());
    }
    for token in inner.split(',') {
        let to = token.trim();
        if to.is_empty() {
            return Err(LoadError::parse(path, line_no, "empty successor token"));
        }
        if to == from {
            return Err(LoadError::parse(
                path,
                line_no,
                format!("self-loop on vertex '{from}' is not allowed"),
            ));
        }
        if to.starts_with("END") || to.starts_with("end") {
            sut.add_end(to);
        }
        sut.add_vertex(to);
        sut.add_edge(from, to);
    }
    Ok(())
}
