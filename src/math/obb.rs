use super::{Point3, Transform, Vector3};

/// A box shape centred on its local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Half the box size along each local axis.
    pub half_extents: Vector3,
}

impl OrientedBox {
    /// Creates a box from its half extents.
    #[must_use]
    pub fn new(half_extents: Vector3) -> Self {
        Self { half_extents }
    }

    /// Returns `true` if a point in the box's local frame lies inside or on the box.
    #[must_use]
    pub fn contains_local_point(&self, point: &Point3) -> bool {
        point
            .coords
            .iter()
            .zip(self.half_extents.iter())
            .all(|(p, h)| p.abs() <= *h)
    }

    /// Returns `true` if a world-space point lies inside or on the box posed at `pose`.
    #[must_use]
    pub fn contains_point(&self, pose: &Transform, point: &Point3) -> bool {
        self.contains_local_point(&pose.inverse_transform_point(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rotation;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn boundary_counts_as_inside() {
        let b = OrientedBox::new(Vector3::new(1.0, 2.0, 3.0));
        assert!(b.contains_local_point(&Point3::new(1.0, -2.0, 3.0)));
        assert!(!b.contains_local_point(&Point3::new(0.0, 2.0001, 0.0)));
    }

    #[test]
    fn world_point_is_tested_in_box_frame() {
        let b = OrientedBox::new(Vector3::repeat(1.0));
        let pose = Transform::translation(10.0, 0.0, 0.0);
        assert!(b.contains_point(&pose, &Point3::new(10.5, 0.9, -0.9)));
        assert!(!b.contains_point(&pose, &Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn rotated_box_reaches_further_along_diagonal() {
        let b = OrientedBox::new(Vector3::repeat(1.0));
        let rotated = Transform::from_parts(
            Vector3::zeros().into(),
            Rotation::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4),
        );
        // The corner of the rotated box points along +X at distance sqrt(2).
        let p = Point3::new(1.3, 0.0, 0.0);
        assert!(b.contains_point(&rotated, &p));
        assert!(!b.contains_point(&Transform::identity(), &p));
    }
}
