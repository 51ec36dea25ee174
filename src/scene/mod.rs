pub mod actor;
pub mod component;
pub mod debug;

pub use actor::{ActorData, ActorId};
pub use component::{
    Body, CollisionChannel, CollisionResponse, ComponentData, ComponentId, Socket,
};
pub use debug::{DebugColor, DebugDraw, DebugPrimitive};

use crate::error::SceneError;
use crate::math::{Point3, Transform};
use crate::mesh::SliceableMesh;
use slotmap::SlotMap;

/// Central arena that owns every actor and component the slicing system
/// interacts with.
///
/// The host keeps this store in sync with its own scene graph and forwards
/// overlap events that refer to its ids. Entities reference each other via
/// typed ids (generational indices), so a stale id for a destroyed
/// component is detected instead of dereferenced.
#[derive(Debug, Default)]
pub struct Scene {
    actors: SlotMap<ActorId, ActorData>,
    components: SlotMap<ComponentId, ComponentData>,
    debug: Vec<DebugDraw>,
}

impl Scene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Actor operations ---

    /// Inserts an actor with no components and returns its ID.
    pub fn spawn_actor(&mut self, name: impl Into<String>) -> ActorId {
        self.actors.insert(ActorData::new(name))
    }

    /// Returns a reference to the actor data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn actor(&self, id: ActorId) -> Result<&ActorData, SceneError> {
        self.actors
            .get(id)
            .ok_or(SceneError::EntityNotFound("actor"))
    }

    /// Destroys an actor together with all components it owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn destroy_actor(&mut self, id: ActorId) -> Result<(), SceneError> {
        let actor = self
            .actors
            .remove(id)
            .ok_or(SceneError::EntityNotFound("actor"))?;
        for component in actor.components {
            self.components.remove(component);
        }
        Ok(())
    }

    /// Number of live actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    // --- Component operations ---

    /// Attaches a component to `owner` and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning actor is not found in the scene.
    pub fn add_component(
        &mut self,
        owner: ActorId,
        mut data: ComponentData,
    ) -> Result<ComponentId, SceneError> {
        if !self.actors.contains_key(owner) {
            return Err(SceneError::EntityNotFound("actor"));
        }
        data.owner = owner;
        let id = self.components.insert(data);
        if let Some(actor) = self.actors.get_mut(owner) {
            actor.components.push(id);
        }
        Ok(id)
    }

    /// Returns a reference to the component data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn component(&self, id: ComponentId) -> Result<&ComponentData, SceneError> {
        self.components
            .get(id)
            .ok_or(SceneError::EntityNotFound("component"))
    }

    /// Returns a mutable reference to the component data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn component_mut(&mut self, id: ComponentId) -> Result<&mut ComponentData, SceneError> {
        self.components
            .get_mut(id)
            .ok_or(SceneError::EntityNotFound("component"))
    }

    /// Detaches a component from its owner and drops it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<ComponentData, SceneError> {
        let data = self
            .components
            .remove(id)
            .ok_or(SceneError::EntityNotFound("component"))?;
        if let Some(actor) = self.actors.get_mut(data.owner) {
            actor.components.retain(|&c| c != id);
        }
        Ok(data)
    }

    /// Returns `true` while `id` refers to a live component.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Tag query; a missing component has no tags.
    #[must_use]
    pub fn has_tag(&self, id: ComponentId, tag: &str) -> bool {
        self.components.get(id).is_some_and(|c| c.has_tag(tag))
    }

    /// World transform of a component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn transform(&self, id: ComponentId) -> Result<Transform, SceneError> {
        Ok(self.component(id)?.transform)
    }

    /// World pose of a named socket on a component.
    #[must_use]
    pub fn socket_world_transform(&self, id: ComponentId, socket: &str) -> Option<Transform> {
        let component = self.components.get(id)?;
        let socket = component.socket(socket)?;
        Some(component.transform * socket.local)
    }

    /// World position of a named socket on a component.
    #[must_use]
    pub fn socket_world_location(&self, id: ComponentId, socket: &str) -> Option<Point3> {
        self.socket_world_transform(id, socket)
            .map(|t| Point3::from(t.translation.vector))
    }

    /// Overrides the response of a component to one channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the scene.
    pub fn set_collision_response(
        &mut self,
        id: ComponentId,
        channel: CollisionChannel,
        response: CollisionResponse,
    ) -> Result<(), SceneError> {
        self.component_mut(id)?.responses.insert(channel, response);
        Ok(())
    }

    /// Capability query: the sliceable mesh of a component, if it has one.
    #[must_use]
    pub fn as_sliceable(&self, id: ComponentId) -> Option<&SliceableMesh> {
        match &self.components.get(id)?.body {
            Body::Sliceable(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Scene::as_sliceable`].
    pub fn as_sliceable_mut(&mut self, id: ComponentId) -> Option<&mut SliceableMesh> {
        match &mut self.components.get_mut(id)?.body {
            Body::Sliceable(mesh) => Some(mesh),
            _ => None,
        }
    }

    // --- Debug drawing ---

    /// Queues a debug primitive.
    pub fn draw(&mut self, primitive: DebugPrimitive, persistent: bool) {
        self.debug.push(DebugDraw {
            primitive,
            persistent,
        });
    }

    /// Currently queued debug primitives.
    #[must_use]
    pub fn debug_draws(&self) -> &[DebugDraw] {
        &self.debug
    }

    /// Hands the queued primitives to the renderer. Persistent ones stay queued.
    pub fn take_debug_draws(&mut self) -> Vec<DebugDraw> {
        let drained = self.debug.clone();
        self.debug.retain(|d| d.persistent);
        drained
    }

    /// Drops persistent debug primitives.
    pub fn flush_persistent_debug(&mut self) {
        self.debug.retain(|d| !d.persistent);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{OrientedBox, Vector3};

    fn marker(name: &str) -> ComponentData {
        ComponentData::new(
            name,
            Transform::translation(1.0, 2.0, 3.0),
            Body::Marker(OrientedBox::new(Vector3::repeat(1.0))),
        )
    }

    #[test]
    fn destroying_actor_invalidates_components() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("crate");
        let c = scene.add_component(actor, marker("box")).unwrap();
        assert!(scene.contains(c));
        assert_eq!(scene.component(c).unwrap().owner, actor);

        scene.destroy_actor(actor).unwrap();
        assert!(!scene.contains(c));
        assert!(scene.component(c).is_err());
        assert!(scene.destroy_actor(actor).is_err());
    }

    #[test]
    fn removed_component_leaves_its_owner() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("crate");
        let kept = scene.add_component(actor, marker("kept")).unwrap();
        let gone = scene.add_component(actor, marker("gone")).unwrap();

        assert_eq!(scene.remove_component(gone).unwrap().name, "gone");
        assert!(!scene.contains(gone));
        assert_eq!(scene.actor(actor).unwrap().components, vec![kept]);
        assert!(scene.remove_component(gone).is_err());
    }

    #[test]
    fn socket_location_follows_component_transform() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("knife");
        let data = marker("knife").with_socket(Socket::at("Blade", Point3::new(0.0, 0.0, 1.0)));
        let c = scene.add_component(actor, data).unwrap();
        assert_eq!(
            scene.socket_world_location(c, "Blade"),
            Some(Point3::new(1.0, 2.0, 4.0))
        );
        assert_eq!(scene.socket_world_location(c, "Handle"), None);
    }

    #[test]
    fn collision_response_defaults_to_block() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("knife");
        let c = scene.add_component(actor, marker("knife")).unwrap();
        let ch = CollisionChannel::PhysicsBody;
        assert_eq!(scene.component(c).unwrap().response(ch), CollisionResponse::Block);
        scene
            .set_collision_response(c, ch, CollisionResponse::Overlap)
            .unwrap();
        assert_eq!(scene.component(c).unwrap().response(ch), CollisionResponse::Overlap);
    }

    #[test]
    fn persistent_draws_survive_until_flushed() {
        let mut scene = Scene::new();
        let point = DebugPrimitive::Point {
            position: Point3::origin(),
            size: 2.0,
            color: DebugColor::Purple,
        };
        scene.draw(point.clone(), true);
        scene.draw(point, false);
        assert_eq!(scene.take_debug_draws().len(), 2);
        assert_eq!(scene.debug_draws().len(), 1);
        scene.flush_persistent_debug();
        assert!(scene.debug_draws().is_empty());
    }
}
