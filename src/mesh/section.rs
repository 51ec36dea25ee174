use crate::math::{Point2, Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Some(aabb)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// One material section of a triangle mesh.
///
/// Vertex attributes are stored as parallel arrays; every triple in
/// `indices` is a counter-clockwise triangle seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSection {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
    /// Index into the owning mesh's material slots.
    pub material_slot: usize,
}

impl MeshSection {
    /// Creates an empty section drawn with `material_slot`.
    #[must_use]
    pub fn new(material_slot: usize) -> Self {
        Self {
            material_slot,
            ..Self::default()
        }
    }

    /// Returns `true` if the section has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a vertex and returns its index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, position: Point3, normal: Vector3, uv: Point2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    /// Appends `other`'s geometry, re-basing its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &MeshSection) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices
            .extend(other.indices.iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));
    }

    /// Iterates over triangle corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.iter().map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }

    /// Bounding box of the referenced vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn triangle(offset: f64) -> MeshSection {
        let mut s = MeshSection::new(0);
        let n = Vector3::z();
        let a = s.push_vertex(p(offset, 0.0, 0.0), n, Point2::origin());
        let b = s.push_vertex(p(offset + 1.0, 0.0, 0.0), n, Point2::origin());
        let c = s.push_vertex(p(offset, 1.0, 0.0), n, Point2::origin());
        s.indices.push([a, b, c]);
        s
    }

    #[test]
    fn merge_rebases_indices() {
        let mut a = triangle(0.0);
        a.merge(&triangle(5.0));
        assert_eq!(a.positions.len(), 6);
        assert_eq!(a.indices[1], [3, 4, 5]);
        let second: Vec<_> = a.triangles().nth(1).unwrap().to_vec();
        assert_eq!(second[0], p(5.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mut s = triangle(0.0);
        s.merge(&triangle(-2.0));
        let aabb = s.bounds().unwrap();
        assert_eq!(aabb.min, p(-2.0, 0.0, 0.0));
        assert_eq!(aabb.max, p(1.0, 1.0, 0.0));
        assert!(MeshSection::new(0).bounds().is_none());
    }
}
