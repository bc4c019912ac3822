//! # symbios-flora
//!
//! Procedural plants from stochastic L-Systems, interpreted by a 3D turtle into
//! engine-agnostic geometry.
//!
//! A [`Grammar`] holds the axiom and weighted production rules. An [`Expander`] rewrites it
//! for a number of passes into an [`ExpansionResult`], and a [`TurtleInterpreter`] walks that
//! string to produce [`GeometryEvent`]s (segments and leaves) that any renderer can ingest.
//! [`PlantGenerator`] wires the three together behind a validated parameter surface.

pub mod error;
pub mod expander;
pub mod generator;
pub mod geometry;
pub mod grammar;
pub mod interpreter;
pub mod turtle;

pub use error::*;
pub use expander::*;
pub use generator::*;
pub use geometry::*;
pub use grammar::*;
pub use interpreter::*;
pub use turtle::*;
