use crate::error::{Result, SceneError};
use crate::math::{Point3, SlicePlane, Vector3};
use crate::mesh::{BodySettings, MaterialId, SliceableMesh};
use crate::scene::{Body, ComponentData, ComponentId, Scene};

use super::{slice_mesh, CapOption};

/// Slices a sliceable component with a world-space plane.
///
/// The half on the normal side stays in the component; the other half
/// becomes a new sliceable component on the same actor. Both halves end
/// up simulated, affected by gravity, generating overlap events, and
/// carrying a copy of the original tags.
pub struct PlaneSlice {
    component: ComponentId,
    plane_point: Point3,
    plane_normal: Vector3,
    cap: CapOption,
    cap_material: Option<MaterialId>,
}

impl PlaneSlice {
    /// Creates a new `PlaneSlice` operation.
    ///
    /// The plane is defined by a point and a normal direction, both in world space.
    #[must_use]
    pub fn new(component: ComponentId, plane_point: Point3, plane_normal: Vector3) -> Self {
        Self {
            component,
            plane_point,
            plane_normal,
            cap: CapOption::NoCap,
            cap_material: None,
        }
    }

    /// Caps the cross-section with `material` instead of leaving it open.
    #[must_use]
    pub fn with_cap(mut self, cap: CapOption, material: Option<MaterialId>) -> Self {
        self.cap = cap;
        self.cap_material = material;
        self
    }

    /// Executes the slice, returning the newly created other half.
    ///
    /// Returns `Ok(None)` when the plane misses the mesh; nothing is changed then.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is missing or not sliceable, the
    /// plane normal is zero-length, or the cap cannot be triangulated.
    pub fn execute(&self, scene: &mut Scene) -> Result<Option<ComponentId>> {
        let world_plane = SlicePlane::new(self.plane_point, self.plane_normal)?;
        let component = scene.component(self.component)?;
        let owner = component.owner;
        let local_plane = world_plane.to_local(&component.transform)?;

        let mesh = scene
            .as_sliceable_mut(self.component)
            .ok_or(SceneError::WrongBody {
                expected: "sliceable",
            })?;
        let Some(mut other) = slice_mesh(mesh, &local_plane, self.cap, self.cap_material)? else {
            tracing::debug!("slice plane misses the mesh, nothing to split");
            return Ok(None);
        };
        mesh.body = BodySettings::severed();
        other.body = BodySettings::severed();

        let source = scene.component(self.component)?;
        let mut data = ComponentData::new(
            format!("{}_other", source.name),
            source.transform,
            Body::Sliceable(other),
        );
        data.tags.clone_from(&source.tags);
        data.responses.clone_from(&source.responses);

        let id = scene.add_component(owner, data)?;
        tracing::debug!(
            triangles = scene.as_sliceable(id).map_or(0, SliceableMesh::triangle_count),
            "created other half"
        );
        Ok(Some(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Rotation, Transform};
    use crate::operations::slice::tests::box_mesh;

    fn setup(transform: Transform) -> (Scene, ComponentId) {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("crate");
        let data = ComponentData::new(
            "crate",
            transform,
            Body::Sliceable(box_mesh(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))),
        )
        .with_tag("cuttable");
        let id = scene.add_component(actor, data).unwrap();
        (scene, id)
    }

    #[test]
    fn second_half_joins_same_actor_with_copied_tags() {
        let (mut scene, id) = setup(Transform::identity());
        let other = PlaneSlice::new(id, Point3::origin(), Vector3::z())
            .execute(&mut scene)
            .unwrap()
            .unwrap();

        let owner = scene.component(id).unwrap().owner;
        assert_eq!(scene.component(other).unwrap().owner, owner);
        assert!(scene.has_tag(other, "cuttable"));
        for half in [id, other] {
            let mesh = scene.as_sliceable(half).unwrap();
            assert_eq!(mesh.body, BodySettings::severed());
        }
    }

    #[test]
    fn world_plane_is_applied_in_local_frame() {
        // Component sits 10 units up; a world cut at z = 10.5 is local z = 0.5.
        let (mut scene, id) = setup(Transform::translation(0.0, 0.0, 10.0));
        let other = PlaneSlice::new(id, Point3::new(0.0, 0.0, 10.5), Vector3::z())
            .execute(&mut scene)
            .unwrap()
            .unwrap();
        let top = scene.as_sliceable(id).unwrap().bounds().unwrap();
        let bottom = scene.as_sliceable(other).unwrap().bounds().unwrap();
        assert!((top.min.z - 0.5).abs() < 1e-9);
        assert!((bottom.max.z - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rotated_component_is_cut_along_world_normal() {
        // Rotated half a turn about X: world +Z is local -Z.
        let rotation = Rotation::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI);
        let (mut scene, id) = setup(Transform::from_parts(Vector3::zeros().into(), rotation));
        PlaneSlice::new(id, Point3::new(0.0, 0.0, 0.5), Vector3::z())
            .execute(&mut scene)
            .unwrap()
            .unwrap();
        let kept = scene.as_sliceable(id).unwrap().bounds().unwrap();
        assert!((kept.max.z + 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_plane_creates_nothing() {
        let (mut scene, id) = setup(Transform::identity());
        let result = PlaneSlice::new(id, Point3::new(0.0, 0.0, 3.0), Vector3::z())
            .execute(&mut scene)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(scene.actor(scene.component(id).unwrap().owner).unwrap().components.len(), 1);
    }

    #[test]
    fn standalone_component_is_rejected() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("rock");
        let id = scene
            .add_component(
                actor,
                ComponentData::new(
                    "rock",
                    Transform::identity(),
                    Body::Standalone(crate::mesh::StandaloneMesh::default()),
                ),
            )
            .unwrap();
        assert!(PlaneSlice::new(id, Point3::origin(), Vector3::z())
            .execute(&mut scene)
            .is_err());
    }
}
