pub mod obb;
pub mod plane;
pub mod ray;

pub use obb::OrientedBox;
pub use plane::SlicePlane;
pub use ray::{ray_triangle, Ray};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for orientations.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Rigid transform (rotation followed by translation).
pub type Transform = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance used to decide whether a vertex lies on a slicing plane.
pub const PLANE_EPSILON: f64 = 1e-6;
