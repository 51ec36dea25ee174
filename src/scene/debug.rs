use crate::math::{Point3, Rotation, Vector3};

/// Debug draw colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Green,
    Purple,
}

/// A debug primitive queued for the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugPrimitive {
    /// A square patch of a plane.
    Plane {
        center: Point3,
        normal: Vector3,
        size: f64,
        color: DebugColor,
    },
    /// An oriented box.
    Box {
        center: Point3,
        half_extents: Vector3,
        rotation: Rotation,
        color: DebugColor,
    },
    /// A screen-space point.
    Point {
        position: Point3,
        size: f64,
        color: DebugColor,
    },
}

/// A queued primitive and whether it survives until explicitly flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugDraw {
    pub primitive: DebugPrimitive,
    pub persistent: bool,
}
