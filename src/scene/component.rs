use std::collections::HashMap;

use crate::math::{OrientedBox, Point3, Transform, Vector3};
use crate::mesh::{SliceableMesh, StandaloneMesh};

use super::actor::ActorId;

slotmap::new_key_type! {
    /// Unique identifier for a component in the scene.
    pub struct ComponentId;
}

/// Collision channels a component can respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionChannel {
    /// Static world geometry.
    WorldStatic,
    /// Moving world geometry.
    WorldDynamic,
    /// Simulated rigid bodies.
    PhysicsBody,
}

/// How a component reacts to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    /// No interaction.
    Ignore,
    /// Generates overlap events without blocking.
    Overlap,
    /// Blocks movement.
    Block,
}

/// What a component physically is.
#[derive(Debug, Clone)]
pub enum Body {
    /// A static mesh that cannot be sliced directly.
    Standalone(StandaloneMesh),
    /// A mesh that supports plane slicing.
    Sliceable(SliceableMesh),
    /// A box-shaped marker volume (blade, handle, exit point, tip).
    Marker(OrientedBox),
}

impl Body {
    /// Short name for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Standalone(_) => "standalone",
            Body::Sliceable(_) => "sliceable",
            Body::Marker(_) => "marker",
        }
    }
}

/// A named attachment point relative to a component.
#[derive(Debug, Clone)]
pub struct Socket {
    /// Socket name.
    pub name: String,
    /// Pose relative to the component.
    pub local: Transform,
    /// Authored scale of the socket.
    pub scale: Vector3,
}

impl Socket {
    /// Creates a socket at a local position with unit scale.
    #[must_use]
    pub fn at(name: impl Into<String>, position: Point3) -> Self {
        Self {
            name: name.into(),
            local: Transform::translation(position.x, position.y, position.z),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Replaces the socket scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }
}

/// Data associated with a scene component.
#[derive(Debug, Clone)]
pub struct ComponentData {
    /// The actor owning this component. Set by the scene on insertion.
    pub owner: ActorId,
    /// Display name.
    pub name: String,
    /// World transform.
    pub transform: Transform,
    /// Gameplay tags.
    pub tags: Vec<String>,
    /// Named attachment points.
    pub sockets: Vec<Socket>,
    /// Per-channel overrides; channels not listed block.
    pub responses: HashMap<CollisionChannel, CollisionResponse>,
    /// Physical representation.
    pub body: Body,
}

impl ComponentData {
    /// Creates an untagged component with the given body.
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Transform, body: Body) -> Self {
        Self {
            owner: ActorId::default(),
            name: name.into(),
            transform,
            tags: Vec::new(),
            sockets: Vec::new(),
            responses: HashMap::new(),
            body,
        }
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds a socket.
    #[must_use]
    pub fn with_socket(mut self, socket: Socket) -> Self {
        self.sockets.push(socket);
        self
    }

    /// Returns `true` if the component carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Looks up a socket by name.
    #[must_use]
    pub fn socket(&self, name: &str) -> Option<&Socket> {
        self.sockets.iter().find(|s| s.name == name)
    }

    /// Response to `channel`, defaulting to [`CollisionResponse::Block`].
    #[must_use]
    pub fn response(&self, channel: CollisionChannel) -> CollisionResponse {
        self.responses
            .get(&channel)
            .copied()
            .unwrap_or(CollisionResponse::Block)
    }
}
