//! Interpreter that converts an expanded L-System string into [`GeometryEvent`]s.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::interpret`] with the symbols of an
//! [`ExpansionResult`](crate::expander::ExpansionResult).

use crate::error::UnbalancedStackError;
use crate::geometry::GeometryEvent;
use crate::grammar::Symbol;
use crate::turtle::{TurtleOp, TurtleState, TurtleStateStack};
use glam::{Quat, Vec3};
use std::collections::HashMap;
use std::f32::consts::PI;
use tracing::{debug, warn};

/// Configuration for turtle interpretation.
#[derive(Clone, Debug)]
pub struct TurtleConfig {
    /// Length of a forward step.
    pub default_step: f32,
    /// Starting segment width.
    pub default_width: f32,
    /// Rotation angle (in radians) for Yaw/Pitch/Roll.
    pub default_angle: f32,
    /// Factor applied to the width by [`TurtleOp::ShrinkWidth`].
    pub width_decay: f32,
    /// Starting position.
    pub origin: Vec3,
    /// Starting orientation. Identity grows along +Y.
    pub initial_rotation: Quat,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            default_step: 1.0,
            default_width: 0.1,
            default_angle: 25.0f32.to_radians(),
            width_decay: 0.7,
            origin: Vec3::ZERO,
            initial_rotation: Quat::IDENTITY,
            max_stack_depth: 1024,
        }
    }
}

impl TurtleConfig {
    pub fn with_step(mut self, step: f32) -> Self {
        self.default_step = step;
        self
    }

    pub fn with_angle_degrees(mut self, degrees: f32) -> Self {
        self.default_angle = degrees.to_radians();
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_origin(mut self, origin: Vec3, rotation: Quat) -> Self {
        self.origin = origin;
        self.initial_rotation = rotation;
        self
    }

    fn initial_state(&self) -> TurtleState {
        TurtleState {
            position: self.origin,
            rotation: self.initial_rotation,
            width: self.default_width,
            step: self.default_step,
            depth: 0,
        }
    }
}

/// The output of one interpretation run.
///
/// `events` is complete even when `diagnostics` is not empty: stack mismatches are
/// reported, the offending symbol is skipped, and interpretation continues.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpretation {
    pub events: Vec<GeometryEvent>,
    pub diagnostics: Vec<UnbalancedStackError>,
    /// Deepest branch nesting reached.
    pub max_depth: usize,
}

impl Interpretation {
    pub fn is_balanced(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &GeometryEvent> {
        self.events.iter().filter(|e| e.is_segment())
    }

    pub fn leaves(&self) -> impl Iterator<Item = &GeometryEvent> {
        self.events.iter().filter(|e| e.is_leaf())
    }

    /// Fails with the first diagnostic, for callers that treat imbalance as fatal.
    pub fn into_result(self) -> Result<Vec<GeometryEvent>, UnbalancedStackError> {
        match self.diagnostics.first() {
            Some(err) => Err(*err),
            None => Ok(self.events),
        }
    }
}

/// Interprets L-System output as turtle drawing commands.
#[derive(Clone, Debug)]
pub struct TurtleInterpreter {
    op_map: HashMap<Symbol, TurtleOp>,
    config: TurtleConfig,
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`interpret`](Self::interpret).
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            op_map: HashMap::new(),
            config,
        }
    }

    /// An interpreter with the standard symbol map already registered.
    pub fn standard(config: TurtleConfig) -> Self {
        let mut interpreter = Self::new(config);
        interpreter.populate_standard_symbols();
        interpreter
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    pub fn with_map(mut self, map: impl IntoIterator<Item = (Symbol, TurtleOp)>) -> Self {
        self.op_map = map.into_iter().collect();
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol.
    pub fn set_op(&mut self, sym: Symbol, op: TurtleOp) {
        self.op_map.insert(sym, op);
    }

    /// The operation bound to `sym`; unmapped symbols resolve to [`TurtleOp::Ignore`].
    pub fn op(&self, sym: Symbol) -> TurtleOp {
        self.op_map.get(&sym).copied().unwrap_or(TurtleOp::Ignore)
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TurtleConfig {
        &mut self.config
    }

    /// Registers the conventional symbol-to-operation mappings.
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            // Drawing
            ('F', TurtleOp::Forward),
            ('L', TurtleOp::Leaf),
            // Spatial
            ('f', TurtleOp::Move),
            ('+', TurtleOp::Yaw(1.0)),
            ('-', TurtleOp::Yaw(-1.0)),
            ('&', TurtleOp::Pitch(1.0)),
            ('^', TurtleOp::Pitch(-1.0)),
            ('\\', TurtleOp::Roll(1.0)),
            ('/', TurtleOp::Roll(-1.0)),
            ('|', TurtleOp::TurnAround),
            // Config
            ('!', TurtleOp::ShrinkWidth),
            // Flow
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            self.set_op(sym, op);
        }
    }

    /// Walks `symbols` in order and returns the emitted geometry plus any diagnostics.
    ///
    /// The turtle starts at [`TurtleConfig::origin`] with [`TurtleConfig::initial_rotation`]
    /// and grows along its local `+Y`. Interpretation is deterministic: the same symbols
    /// always yield the same events.
    ///
    /// # Push / Pop
    ///
    /// `[` saves the full turtle state (position, rotation, width, step) onto a stack and
    /// `]` restores it. A `]` with nothing to restore, a `[` beyond `max_stack_depth`, and
    /// branches still open at the end are recorded in [`Interpretation::diagnostics`].
    pub fn interpret(&self, symbols: &[Symbol]) -> Interpretation {
        let mut out = Interpretation::default();
        let mut turtle = self.config.initial_state();
        let mut stack = TurtleStateStack::new(self.config.max_stack_depth);
        let angle = self.config.default_angle;

        for (index, &sym) in symbols.iter().enumerate() {
            match self.op(sym) {
                // --- DRAWING ---
                TurtleOp::Forward => {
                    let end = turtle.ahead();
                    out.events.push(GeometryEvent::Segment {
                        start: turtle.position,
                        end,
                        rotation: turtle.rotation,
                        width: turtle.width,
                        depth: turtle.depth,
                    });
                    turtle.position = end;
                }
                TurtleOp::Leaf => out.events.push(GeometryEvent::Leaf {
                    position: turtle.position,
                    rotation: turtle.rotation,
                    width: turtle.width,
                    depth: turtle.depth,
                }),

                // --- SPATIAL ---
                TurtleOp::Move => turtle.position = turtle.ahead(),
                TurtleOp::Yaw(s) => turtle.rotate_local_z(angle * s),
                TurtleOp::Pitch(s) => turtle.rotate_local_x(angle * s),
                TurtleOp::Roll(s) => turtle.rotate_local_y(angle * s),
                TurtleOp::TurnAround => turtle.rotate_local_z(PI),

                // --- CONFIG ---
                TurtleOp::ShrinkWidth => turtle.width *= self.config.width_decay,

                // --- FLOW ---
                TurtleOp::Push => match stack.push(turtle, index) {
                    Ok(()) => {
                        turtle.depth = stack.depth();
                        out.max_depth = out.max_depth.max(turtle.depth);
                    }
                    Err(err) => Self::report(&mut out, err),
                },
                TurtleOp::Pop => match stack.pop(index) {
                    Ok(state) => turtle = state,
                    Err(err) => Self::report(&mut out, err),
                },
                TurtleOp::Ignore => {}
            }
        }

        if !stack.is_empty() {
            Self::report(
                &mut out,
                UnbalancedStackError::UnclosedBranches {
                    depth: stack.depth(),
                },
            );
        }

        debug!(
            symbols = symbols.len(),
            events = out.events.len(),
            max_depth = out.max_depth,
            "turtle interpretation finished"
        );
        out
    }

    /// Convenience wrapper over [`interpret`](Self::interpret) for string input.
    pub fn interpret_str(&self, symbols: &str) -> Interpretation {
        let symbols: Vec<Symbol> = symbols.chars().collect();
        self.interpret(&symbols)
    }

    fn report(out: &mut Interpretation, err: UnbalancedStackError) {
        warn!(%err, "unbalanced branch");
        out.diagnostics.push(err);
    }
}
