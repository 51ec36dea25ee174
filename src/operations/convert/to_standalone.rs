use std::sync::Arc;

use crate::error::{Result, SceneError};
use crate::mesh::{MeshSection, StandaloneMesh, StaticMeshAsset};
use crate::scene::{Body, ComponentData, ComponentId, Scene};

/// Bakes a sliceable component into a new, independent standalone solid.
///
/// A fresh actor is spawned holding one component with the sliceable's
/// current shape as a static mesh asset and collision baked from it.
/// Transform, tags, collision responses and physics settings are copied.
/// The source component is left untouched.
pub struct ConvertToStandalone {
    component: ComponentId,
}

impl ConvertToStandalone {
    /// Creates a new `ConvertToStandalone` operation.
    #[must_use]
    pub fn new(component: ComponentId) -> Self {
        Self { component }
    }

    /// Executes the conversion, returning the new standalone component.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is missing or not sliceable.
    pub fn execute(&self, scene: &mut Scene) -> Result<ComponentId> {
        let source = scene.component(self.component)?;
        let Body::Sliceable(mesh) = &source.body else {
            return Err(SceneError::WrongBody {
                expected: "sliceable",
            }
            .into());
        };

        let sections: Vec<MeshSection> = mesh
            .sections
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        let asset = StaticMeshAsset::new(
            format!("{}_baked", source.name),
            sections,
            mesh.material_slots.clone(),
        );
        let standalone = StandaloneMesh {
            mesh: Some(Arc::new(asset)),
            body: mesh.body,
        };

        let mut data = ComponentData::new(
            source.name.clone(),
            source.transform,
            Body::Standalone(standalone),
        );
        data.tags.clone_from(&source.tags);
        data.responses.clone_from(&source.responses);

        let actor = scene.spawn_actor(data.name.clone());
        let id = scene.add_component(actor, data)?;
        tracing::debug!("baked sliceable component into a standalone solid");
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::math::Transform;
    use crate::mesh::{BodySettings, SliceableMesh, StandaloneMesh};
    use crate::operations::convert::to_sliceable::tests::crate_asset;
    use crate::operations::ConvertToSliceable;

    fn standalone_asset(scene: &Scene, id: ComponentId) -> Arc<StaticMeshAsset> {
        match &scene.component(id).unwrap().body {
            Body::Standalone(s) => s.mesh.clone().unwrap(),
            other => panic!("expected standalone body, got {}", other.kind()),
        }
    }

    #[test]
    fn round_trip_preserves_slot_names() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("crate");
        let original = crate_asset();
        let id = scene
            .add_component(
                actor,
                ComponentData::new(
                    "crate",
                    Transform::translation(1.0, 0.0, 0.0),
                    Body::Standalone(StandaloneMesh::new(original.clone())),
                )
                .with_tag("cuttable"),
            )
            .unwrap();

        ConvertToSliceable::new(id).execute(&mut scene).unwrap();
        let baked = ConvertToStandalone::new(id).execute(&mut scene).unwrap();

        let names = |slots: &[crate::mesh::MaterialSlot]| -> BTreeSet<String> {
            slots.iter().map(|s| s.name.clone()).collect()
        };
        let asset = standalone_asset(&scene, baked);
        assert_eq!(names(&asset.material_slots), names(&original.material_slots));
        assert!(scene.has_tag(baked, "cuttable"));
        assert_eq!(scene.transform(baked).unwrap(), Transform::translation(1.0, 0.0, 0.0));
        assert_ne!(scene.component(baked).unwrap().owner, actor);
    }

    #[test]
    fn collision_matches_current_shape() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("half");
        let mesh = SliceableMesh {
            sections: crate_asset().sections.clone(),
            material_slots: crate_asset().material_slots.clone(),
            body: BodySettings::severed(),
        };
        let id = scene
            .add_component(actor, ComponentData::new("half", Transform::identity(), Body::Sliceable(mesh)))
            .unwrap();
        let baked = ConvertToStandalone::new(id).execute(&mut scene).unwrap();

        let asset = standalone_asset(&scene, baked);
        let hull = asset.collision.as_ref().unwrap();
        assert_eq!(hull.bounds.max.z, 11.0);
        assert_eq!(hull.bounds.min.x, -5.0);
        match &scene.component(baked).unwrap().body {
            Body::Standalone(s) => assert_eq!(s.body, BodySettings::severed()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_sections_are_dropped() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("half");
        let mut sections = crate_asset().sections.clone();
        sections.push(MeshSection::new(1));
        let mesh = SliceableMesh {
            sections,
            material_slots: crate_asset().material_slots.clone(),
            body: BodySettings::default(),
        };
        let id = scene
            .add_component(actor, ComponentData::new("half", Transform::identity(), Body::Sliceable(mesh)))
            .unwrap();
        let baked = ConvertToStandalone::new(id).execute(&mut scene).unwrap();
        assert_eq!(standalone_asset(&scene, baked).sections.len(), 2);
    }
}
