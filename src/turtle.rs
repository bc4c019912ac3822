//! Turtle state, the branch stack, and the operations the interpreter dispatches.

use crate::error::UnbalancedStackError;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The state of the plant-drawing turtle.
///
/// Tracks position, orientation, and the drawing parameters that branches inherit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the "cursor".
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,

    /// Width of the next segment (modified by `!`).
    pub width: f32,

    /// Length of a forward step.
    pub step: f32,

    /// Branch nesting depth (number of open pushes).
    pub depth: usize,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            width: 0.1,
            step: 1.0,
            depth: 0,
        }
    }
}

impl TurtleState {
    /// Returns the turtle's local up direction (Y-axis) in world space.
    /// This is the growth direction.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's local forward direction (Z-axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Returns the turtle's local right direction (X-axis) in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Position one step ahead along the growth direction.
    pub fn ahead(&self) -> Vec3 {
        self.position + self.up() * self.step
    }

    /// Rotates the turtle around its local X axis by `angle` radians (Pitch).
    pub fn rotate_local_x(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::X, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Rotates the turtle around its local Y axis by `angle` radians (Roll).
    pub fn rotate_local_y(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::Y, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Rotates the turtle around its local Z axis by `angle` radians (Yaw).
    pub fn rotate_local_z(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::Z, angle);
        self.rotation = (self.rotation * rot).normalize();
    }
}

/// Operations that can be performed by the plant turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    // --- Drawing ---
    /// Emit a segment and advance (`F`).
    Forward,
    /// Emit a leaf at the current pose (`L`).
    Leaf,

    // --- Spatial Navigation ---
    /// Move forward without emitting geometry (`f`).
    Move,
    /// Rotate around Z (`+`/`-`). The value is the sign applied to the configured angle.
    Yaw(f32),
    /// Rotate around X (`&`/`^`).
    Pitch(f32),
    /// Rotate around Y (`\` / `/`).
    Roll(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,

    // --- Configuration ---
    /// Multiply the current width by the configured decay (`!`).
    ShrinkWidth,

    // --- Flow Control ---
    /// Save the turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// No-op: symbol has no registered meaning.
    Ignore,
}

/// LIFO stack of saved turtle states, one per open branch.
#[derive(Clone, Debug)]
pub struct TurtleStateStack {
    states: Vec<TurtleState>,
    max_depth: usize,
}

impl TurtleStateStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            states: Vec::new(),
            max_depth,
        }
    }

    /// Saves a copy of `state`. `index` is the symbol position, used for reporting.
    pub fn push(&mut self, state: TurtleState, index: usize) -> Result<(), UnbalancedStackError> {
        if self.states.len() >= self.max_depth {
            return Err(UnbalancedStackError::DepthExceeded {
                index,
                max: self.max_depth,
            });
        }
        self.states.push(state);
        Ok(())
    }

    pub fn pop(&mut self, index: usize) -> Result<TurtleState, UnbalancedStackError> {
        self.states
            .pop()
            .ok_or(UnbalancedStackError::PopOnEmpty { index })
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
