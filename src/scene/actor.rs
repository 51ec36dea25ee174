use super::component::ComponentId;

slotmap::new_key_type! {
    /// Unique identifier for an actor (owning object) in the scene.
    pub struct ActorId;
}

/// Data associated with an actor.
///
/// An actor owns components; destroying it destroys all of them.
#[derive(Debug, Clone, Default)]
pub struct ActorData {
    /// Display name.
    pub name: String,
    /// Components owned by this actor, in creation order.
    pub components: Vec<ComponentId>,
}

impl ActorData {
    /// Creates an actor with no components.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }
}
