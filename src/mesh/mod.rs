mod section;
mod sliceable;
mod standalone;

pub use section::{Aabb, MeshSection};
pub use sliceable::SliceableMesh;
pub use standalone::{CollisionHull, StandaloneMesh, StaticMeshAsset};

/// Name of the material slot whose material is reused for cross-section faces.
pub const INSIDE_CUT_MATERIAL: &str = "InsideCutMaterial";

/// Opaque handle to a material owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// A named material slot. Sections reference slots by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialSlot {
    /// Slot name as authored on the asset.
    pub name: String,
    /// Material bound to the slot, if any.
    pub material: Option<MaterialId>,
}

impl MaterialSlot {
    /// Creates a slot bound to `material`.
    #[must_use]
    pub fn new(name: impl Into<String>, material: Option<MaterialId>) -> Self {
        Self {
            name: name.into(),
            material,
        }
    }
}

/// Returns the index of the first slot called `name`.
#[must_use]
pub fn find_slot(slots: &[MaterialSlot], name: &str) -> Option<usize> {
    slots.iter().position(|slot| slot.name == name)
}

/// Physics switches carried by both solid representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct BodySettings {
    /// Whether the rigid body is simulated (dynamic).
    pub simulate_physics: bool,
    /// Whether gravity applies while simulated.
    pub enable_gravity: bool,
    /// Whether overlap begin/end events are generated.
    pub generate_overlap_events: bool,
    /// Whether rigid-body hit notifications are generated.
    pub notify_rigid_body_collision: bool,
}

impl BodySettings {
    /// Settings applied to both halves right after a cut.
    #[must_use]
    pub fn severed() -> Self {
        Self {
            simulate_physics: true,
            enable_gravity: true,
            generate_overlap_events: true,
            notify_rigid_body_collision: false,
        }
    }
}
