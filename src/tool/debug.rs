use crate::error::{Result, SceneError};
use crate::math::{OrientedBox, Point3, Ray, SlicePlane, Transform, Vector3};
use crate::mesh::SliceableMesh;
use crate::scene::{DebugColor, DebugPrimitive, Scene};

use super::config::SlicingConfig;
use super::session::CutSession;

/// Blade state sampled once per tick for drawing.
pub(crate) struct BladeFrame {
    pub pose: Transform,
    pub marker: OrientedBox,
    pub plane_normal: Vector3,
}

impl BladeFrame {
    fn location(&self) -> Point3 {
        Point3::from(self.pose.translation.vector)
    }
}

/// Slicing plane through the blade, centered on the target's bounds.
pub(crate) fn draw_slicing_plane(
    scene: &mut Scene,
    session: &CutSession,
    blade: &BladeFrame,
) -> Result<()> {
    let target = scene.transform(session.target)?;
    let local_center = scene
        .as_sliceable(session.target)
        .and_then(SliceableMesh::bounds)
        .map_or_else(Point3::origin, |b| b.center());
    let plane = SlicePlane::new(blade.location(), blade.plane_normal)?;
    let center = plane.project(&(target * local_center));
    scene.draw(
        DebugPrimitive::Plane {
            center,
            normal: *plane.normal(),
            size: blade.marker.half_extents.norm(),
            color: DebugColor::Red,
        },
        false,
    );
    Ok(())
}

/// Box at the recorded contact point.
pub(crate) fn draw_entrance_point(
    scene: &mut Scene,
    session: &CutSession,
    config: &SlicingConfig,
) -> Result<()> {
    let target = scene.transform(session.target)?;
    scene.draw(
        DebugPrimitive::Box {
            center: session.contact_point(&target),
            half_extents: Vector3::repeat(config.debug_box_extent),
            rotation: target.rotation,
            color: DebugColor::Green,
        },
        false,
    );
    Ok(())
}

/// Traces from far along the blade's local +Y back to the blade and marks
/// where the trace enters the target. Nothing is drawn on a miss.
pub(crate) fn draw_exit_point(
    scene: &mut Scene,
    session: &CutSession,
    blade: &BladeFrame,
    config: &SlicingConfig,
) -> Result<()> {
    let target = scene.transform(session.target)?;
    let far = blade.pose * Point3::new(0.0, config.exit_trace_distance, 0.0);
    let ray = Ray::between(
        target.inverse_transform_point(&far),
        target.inverse_transform_point(&blade.location()),
    );
    let mesh = scene
        .as_sliceable(session.target)
        .ok_or(SceneError::WrongBody {
            expected: "sliceable",
        })?;
    let Some(t) = mesh.raycast(&ray).filter(|&t| t <= 1.0) else {
        return Ok(());
    };
    scene.draw(
        DebugPrimitive::Box {
            center: target * ray.point_at(t),
            half_extents: Vector3::repeat(config.debug_box_extent),
            rotation: target.rotation,
            color: DebugColor::Red,
        },
        true,
    );
    Ok(())
}

/// Leaves a point at the blade's current location.
pub(crate) fn draw_trajectory(scene: &mut Scene, blade: &BladeFrame) {
    scene.draw(
        DebugPrimitive::Point {
            position: blade.location(),
            size: 2.0,
            color: DebugColor::Purple,
        },
        true,
    );
}
