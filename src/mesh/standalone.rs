use std::sync::Arc;

use crate::math::Point3;

use super::{Aabb, BodySettings, MaterialSlot, MeshSection};

/// Collision baked from a mesh's vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionHull {
    /// Local bounds of the collision geometry.
    pub bounds: Aabb,
    /// Distinct vertex positions the host builds its convex collider from.
    pub points: Vec<Point3>,
}

impl CollisionHull {
    /// Bakes collision from a set of sections, or `None` if they hold no vertex.
    #[must_use]
    pub fn bake(sections: &[MeshSection]) -> Option<Self> {
        let mut points: Vec<Point3> = Vec::new();
        for p in sections.iter().flat_map(|s| s.positions.iter()) {
            if !points.contains(p) {
                points.push(*p);
            }
        }
        let bounds = Aabb::from_points(&points)?;
        Some(Self { bounds, points })
    }
}

/// A static mesh resource as authored or baked after a cut.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMeshAsset {
    /// Asset name, used for logging.
    pub name: String,
    /// Render sections.
    pub sections: Vec<MeshSection>,
    /// Material slots in authored order.
    pub material_slots: Vec<MaterialSlot>,
    /// Simple collision, if any was baked.
    pub collision: Option<CollisionHull>,
}

impl StaticMeshAsset {
    /// Creates an asset and bakes its collision from the sections.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sections: Vec<MeshSection>,
        material_slots: Vec<MaterialSlot>,
    ) -> Self {
        let collision = CollisionHull::bake(&sections);
        Self {
            name: name.into(),
            sections,
            material_slots,
            collision,
        }
    }
}

/// A static, non-sliceable mesh as placed in the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandaloneMesh {
    /// The mesh resource; `None` when nothing is assigned.
    pub mesh: Option<Arc<StaticMeshAsset>>,
    /// Physics switches.
    pub body: BodySettings,
}

impl StandaloneMesh {
    /// Wraps an asset with default physics settings.
    #[must_use]
    pub fn new(mesh: Arc<StaticMeshAsset>) -> Self {
        Self {
            mesh: Some(mesh),
            body: BodySettings::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point2, Vector3};

    #[test]
    fn bake_dedups_points() {
        let mut s = MeshSection::new(0);
        let n = Vector3::z();
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ] {
            s.push_vertex(p, n, Point2::origin());
        }
        let hull = CollisionHull::bake(&[s]).unwrap();
        assert_eq!(hull.points.len(), 2);
        assert_eq!(hull.bounds.max, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn bake_of_nothing_is_none() {
        assert!(CollisionHull::bake(&[MeshSection::new(0)]).is_none());
    }
}
