use crate::error::{ConversionError, Result, SceneError};
use crate::mesh::SliceableMesh;
use crate::scene::{Body, ComponentId, Scene};

/// Converts a standalone component into a sliceable one, in place.
///
/// The component keeps its id, transform, tags and collision responses.
/// Material slots are carried over in their authored order so the
/// inside-cut slot can be found by name later on.
pub struct ConvertToSliceable {
    component: ComponentId,
}

impl ConvertToSliceable {
    /// Creates a new `ConvertToSliceable` operation.
    #[must_use]
    pub fn new(component: ComponentId) -> Self {
        Self { component }
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is missing, is not a standalone
    /// solid, or has no static mesh resource assigned.
    pub fn execute(&self, scene: &mut Scene) -> Result<()> {
        let component = scene.component_mut(self.component)?;
        let Body::Standalone(standalone) = &component.body else {
            return Err(SceneError::WrongBody {
                expected: "standalone",
            }
            .into());
        };
        let asset = standalone
            .mesh
            .as_ref()
            .ok_or(ConversionError::MissingMeshResource)?;

        let sliceable = SliceableMesh {
            sections: asset.sections.clone(),
            material_slots: asset.material_slots.clone(),
            body: standalone.body,
        };
        tracing::debug!(
            asset = %asset.name,
            slots = sliceable.material_slots.len(),
            "converted standalone solid to sliceable"
        );
        component.body = Body::Sliceable(sliceable);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::SlicingError;
    use crate::math::{Point3, Transform};
    use crate::mesh::{MaterialId, MaterialSlot, StandaloneMesh, StaticMeshAsset, INSIDE_CUT_MATERIAL};
    use crate::operations::slice::tests::box_section;
    use crate::scene::ComponentData;

    pub(crate) fn crate_asset() -> Arc<StaticMeshAsset> {
        Arc::new(StaticMeshAsset::new(
            "SM_Crate",
            vec![
                box_section(Point3::new(-5.0, -5.0, 0.0), Point3::new(5.0, 5.0, 10.0), 0),
                box_section(Point3::new(-1.0, -1.0, 10.0), Point3::new(1.0, 1.0, 11.0), 2),
            ],
            vec![
                MaterialSlot::new("Wood", Some(MaterialId(1))),
                MaterialSlot::new(INSIDE_CUT_MATERIAL, Some(MaterialId(2))),
                MaterialSlot::new("Handle", Some(MaterialId(3))),
            ],
        ))
    }

    fn spawn(scene: &mut Scene, body: Body) -> ComponentId {
        let actor = scene.spawn_actor("crate");
        scene
            .add_component(
                actor,
                ComponentData::new("crate", Transform::identity(), body).with_tag("cuttable"),
            )
            .unwrap()
    }

    #[test]
    fn preserves_slot_order_and_sections() {
        let mut scene = Scene::new();
        let asset = crate_asset();
        let id = spawn(&mut scene, Body::Standalone(StandaloneMesh::new(asset.clone())));

        ConvertToSliceable::new(id).execute(&mut scene).unwrap();

        let mesh = scene.as_sliceable(id).unwrap();
        assert_eq!(mesh.material_slots, asset.material_slots);
        assert_eq!(mesh.sections, asset.sections);
        assert_eq!(mesh.inside_cut_material(), Some(MaterialId(2)));
        assert!(scene.has_tag(id, "cuttable"));
    }

    #[test]
    fn missing_mesh_resource_is_reported() {
        let mut scene = Scene::new();
        let id = spawn(&mut scene, Body::Standalone(StandaloneMesh::default()));
        let err = ConvertToSliceable::new(id).execute(&mut scene).unwrap_err();
        assert!(matches!(
            err,
            SlicingError::Conversion(ConversionError::MissingMeshResource)
        ));
        assert!(scene.as_sliceable(id).is_none());
    }

    #[test]
    fn sliceable_input_is_rejected() {
        let mut scene = Scene::new();
        let id = spawn(&mut scene, Body::Sliceable(SliceableMesh::default()));
        assert!(ConvertToSliceable::new(id).execute(&mut scene).is_err());
    }
}
