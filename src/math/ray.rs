use super::{Point3, Vector3, TOLERANCE};

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Point3,
    /// Direction of travel; need not be normalized.
    pub dir: Vector3,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    #[must_use]
    pub fn new(origin: Point3, dir: Vector3) -> Self {
        Self { origin, dir }
    }

    /// Builds the ray segment going from `start` towards `end`, with `t = 1` at `end`.
    #[must_use]
    pub fn between(start: Point3, end: Point3) -> Self {
        Self::new(start, end - start)
    }

    /// Point along the ray at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.dir * t
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t >= 0` of the hit, or `None`. Both faces of
/// the triangle are hit.
#[must_use]
pub fn ray_triangle(ray: &Ray, a: &Point3, b: &Point3, c: &Point3) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.dir.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < TOLERANCE {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.dir.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn hits_triangle_in_front() {
        let ray = Ray::between(p(0.2, 0.2, 5.0), p(0.2, 0.2, -5.0));
        let t = ray_triangle(&ray, &p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0));
        assert_eq!(t, Some(0.5));
    }

    #[test]
    fn misses_outside_and_behind() {
        let tri = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let outside = Ray::new(p(2.0, 2.0, 1.0), -Vector3::z());
        assert_eq!(ray_triangle(&outside, &tri[0], &tri[1], &tri[2]), None);
        let behind = Ray::new(p(0.2, 0.2, 1.0), Vector3::z());
        assert_eq!(ray_triangle(&behind, &tri[0], &tri[1], &tri[2]), None);
    }
}
