// Wayfarer: Constrained Path-based Testing engine
//
// Generates test paths through a directed control-flow model of a System
// Under Test, balancing edge coverage against ordered vertex-pair
// constraints, and scores the result with coverage metrics.

#![allow(dead_code)]

pub mod cli;
pub mod generate;
pub mod metrics;
pub mod output;
pub mod sut;

pub use generate::{all_generators, CpcGenerator, EdgeGenerator, FilterGenerator, Generator, TestPath};
pub use metrics::MetricsReport;
pub use sut::{Constraint, ConstraintKind, LoadError, Sut};
