//! Geometric placements emitted by the turtle for an external renderer.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// An engine-agnostic placement emitted by the turtle.
///
/// Renderers map segments to cylinders or line meshes and leaves to mesh instances.
/// Nothing here refers to a scene graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GeometryEvent {
    /// A branch segment from `start` to `end`.
    Segment {
        start: Vec3,
        end: Vec3,
        /// Turtle orientation while drawing; its local Y axis points from `start` to `end`.
        rotation: Quat,
        width: f32,
        /// Branch nesting depth at which the segment was drawn.
        depth: usize,
    },
    /// A leaf placed at the turtle's pose.
    Leaf {
        position: Vec3,
        rotation: Quat,
        width: f32,
        depth: usize,
    },
}

impl GeometryEvent {
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Segment { depth, .. } | Self::Leaf { depth, .. } => *depth,
        }
    }

    /// Segment length, or zero for leaves.
    pub fn length(&self) -> f32 {
        match self {
            Self::Segment { start, end, .. } => start.distance(*end),
            Self::Leaf { .. } => 0.0,
        }
    }
}
