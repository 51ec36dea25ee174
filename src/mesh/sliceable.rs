use crate::math::{ray_triangle, Point3, Ray};

use super::{find_slot, Aabb, BodySettings, MaterialId, MaterialSlot, MeshSection, INSIDE_CUT_MATERIAL};

/// A mesh that can be split at runtime.
///
/// Geometry is expressed in the owning component's local frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceableMesh {
    /// Material sections, in slot order of the source asset.
    pub sections: Vec<MeshSection>,
    /// Material slots referenced by the sections.
    pub material_slots: Vec<MaterialSlot>,
    /// Physics switches.
    pub body: BodySettings,
}

impl SliceableMesh {
    /// Returns `true` if no section holds a triangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(MeshSection::is_empty)
    }

    /// Total triangle count across sections.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.sections.iter().map(|s| s.indices.len()).sum()
    }

    /// Material of the slot named [`INSIDE_CUT_MATERIAL`], if the slot exists.
    #[must_use]
    pub fn inside_cut_material(&self) -> Option<MaterialId> {
        find_slot(&self.material_slots, INSIDE_CUT_MATERIAL)
            .and_then(|i| self.material_slots[i].material)
    }

    /// Bounding box over all sections.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        self.sections
            .iter()
            .filter_map(MeshSection::bounds)
            .reduce(|a, b| a.merged(&b))
    }

    /// Iterates over every vertex position.
    pub fn positions(&self) -> impl Iterator<Item = &Point3> {
        self.sections.iter().flat_map(|s| s.positions.iter())
    }

    /// Nearest hit of a local-space ray against the mesh triangles.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<f64> {
        self.sections
            .iter()
            .flat_map(|s| s.triangles())
            .filter_map(|[a, b, c]| ray_triangle(ray, &a, &b, &c))
            .reduce(f64::min)
    }
}
