use crate::error::{Result, ToolError};
use crate::math::{OrientedBox, Vector3};
use crate::scene::{
    Body, CollisionChannel, CollisionResponse, ComponentData, ComponentId, Scene, Socket,
};

use super::KNIFE_TAG;

/// The named sockets a slicing tool asset is authored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketName {
    /// Origin of the cutting edge; the slicing plane passes through it.
    Blade,
    /// Where the tool is held.
    Handle,
    /// Where the blade leaves the object at the end of a cut.
    CuttingExitpoint,
}

impl SocketName {
    /// Every socket, in authoring order.
    pub const ALL: [SocketName; 3] = [
        SocketName::Handle,
        SocketName::Blade,
        SocketName::CuttingExitpoint,
    ];

    /// Socket name as stored on the asset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SocketName::Blade => "Blade",
            SocketName::Handle => "Handle",
            SocketName::CuttingExitpoint => "CuttingExitpoint",
        }
    }
}

/// Half extents of the marker box for a socket.
#[must_use]
pub fn marker_half_extents(socket: &Socket, marker_scale: f64) -> Vector3 {
    socket.scale * marker_scale
}

/// Marker volumes created for a tool's sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketMarkers {
    pub blade: ComponentId,
    pub handle: Option<ComponentId>,
    pub exit_point: Option<ComponentId>,
}

impl SocketMarkers {
    /// Creates one marker box per authored socket on `tool_object`.
    ///
    /// The handle blocks everything; blade and exit point only overlap,
    /// and only the blade generates overlap events for the host to forward.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is missing, is not tagged
    /// `"Knife"`, or has no blade socket.
    pub fn attach(scene: &mut Scene, tool_object: ComponentId, marker_scale: f64) -> Result<Self> {
        let tool = scene.component(tool_object)?;
        if !tool.has_tag(KNIFE_TAG) {
            return Err(ToolError::MissingTag(KNIFE_TAG).into());
        }
        if tool.socket(SocketName::Blade.as_str()).is_none() {
            return Err(ToolError::MissingSocket(SocketName::Blade.as_str()).into());
        }
        let owner = tool.owner;
        let tool_transform = tool.transform;
        let sockets: Vec<(SocketName, Socket)> = SocketName::ALL
            .iter()
            .filter_map(|&name| tool.socket(name.as_str()).map(|s| (name, s.clone())))
            .collect();

        let mut markers = SocketMarkers {
            blade: ComponentId::default(),
            handle: None,
            exit_point: None,
        };
        for (name, socket) in sockets {
            let extents = marker_half_extents(&socket, marker_scale);
            let mut data = ComponentData::new(
                name.as_str(),
                tool_transform * socket.local,
                Body::Marker(OrientedBox::new(extents)),
            );
            let response = match name {
                SocketName::Handle => CollisionResponse::Block,
                SocketName::Blade | SocketName::CuttingExitpoint => CollisionResponse::Overlap,
            };
            for channel in [
                CollisionChannel::WorldStatic,
                CollisionChannel::WorldDynamic,
                CollisionChannel::PhysicsBody,
            ] {
                data.responses.insert(channel, response);
            }
            let id = scene.add_component(owner, data)?;
            match name {
                SocketName::Blade => markers.blade = id,
                SocketName::Handle => markers.handle = Some(id),
                SocketName::CuttingExitpoint => markers.exit_point = Some(id),
            }
        }
        tracing::debug!("attached socket markers");
        Ok(markers)
    }
}
