use crate::error::{GeometryError, Result};

use super::{Point2, Point3, Transform, Vector3, TOLERANCE};

/// An infinite slicing plane, defined by a point and a unit normal.
///
/// The positive half-space is the one the normal points into. Two in-plane
/// directions (`u_dir`, `v_dir`) form a right-handed frame with the normal
/// and are used to flatten cross-sections for triangulation.
#[derive(Debug, Clone, Copy)]
pub struct SlicePlane {
    origin: Point3,
    normal: Vector3,
    u_dir: Vector3,
    v_dir: Vector3,
}

impl SlicePlane {
    /// Creates a plane through `origin` with the given normal.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn new(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            normal,
            u_dir,
            v_dir,
        })
    }

    /// Returns the point the plane was built through.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Signed distance from `point` to the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Orthogonal projection of `point` onto the plane.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// In-plane coordinates of `point` relative to the origin.
    #[must_use]
    pub fn to_uv(&self, point: &Point3) -> Point2 {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u_dir), d.dot(&self.v_dir))
    }

    /// Inverse of [`SlicePlane::to_uv`].
    #[must_use]
    pub fn from_uv(&self, uv: &Point2) -> Point3 {
        self.origin + self.u_dir * uv.x + self.v_dir * uv.y
    }

    /// Expresses this plane in the local frame of `frame`.
    ///
    /// `frame` maps local coordinates to world coordinates; the returned plane
    /// satisfies `local.signed_distance(p) == self.signed_distance(frame * p)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformed normal degenerates.
    pub fn to_local(&self, frame: &Transform) -> Result<Self> {
        let origin = frame.inverse_transform_point(&self.origin);
        let normal = frame.inverse_transform_vector(&self.normal);
        Self::new(origin, normal)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Rotation;
    use approx::assert_relative_eq;

    #[test]
    fn zero_normal_is_rejected() {
        assert!(SlicePlane::new(Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn frame_is_orthonormal() {
        let plane = SlicePlane::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(plane.normal().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.u_dir().dot(plane.normal()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plane.v_dir().dot(plane.u_dir()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plane.u_dir().cross(plane.v_dir()), *plane.normal(), epsilon = 1e-12);
    }

    #[test]
    fn uv_round_trip_stays_on_plane() {
        let plane = SlicePlane::new(Point3::new(0.0, 0.0, 2.0), Vector3::z()).unwrap();
        let p = plane.project(&Point3::new(3.0, -1.0, 7.0));
        assert_relative_eq!(p, Point3::new(3.0, -1.0, 2.0), epsilon = 1e-12);
        let back = plane.from_uv(&plane.to_uv(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn local_plane_preserves_signed_distance() {
        let plane = SlicePlane::new(Point3::new(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        let frame = Transform::from_parts(
            Vector3::new(5.0, 0.0, 0.0).into(),
            Rotation::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2),
        );
        let local = plane.to_local(&frame).unwrap();
        let p = Point3::new(0.3, -2.0, 0.4);
        assert_relative_eq!(
            local.signed_distance(&p),
            plane.signed_distance(&(frame * p)),
            epsilon = 1e-12
        );
    }
}
