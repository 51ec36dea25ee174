use crate::math::{Point3, Rotation, Transform};
use crate::scene::ComponentId;

/// Bookkeeping for one cut in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSession {
    /// The component being cut.
    pub target: ComponentId,
    /// Contact point captured at cut start, in the target's local space.
    pub relative_location: Point3,
    /// Blade orientation relative to the target at cut start.
    pub relative_rotation: Rotation,
}

impl CutSession {
    /// Captures the blade pose relative to the target.
    #[must_use]
    pub fn capture(
        target: ComponentId,
        target_transform: &Transform,
        contact: &Point3,
        blade_rotation: &Rotation,
    ) -> Self {
        Self {
            target,
            relative_location: target_transform.inverse_transform_point(contact),
            relative_rotation: target_transform.rotation.inverse() * blade_rotation,
        }
    }

    /// Recorded contact point under the target's current transform.
    #[must_use]
    pub fn contact_point(&self, target_transform: &Transform) -> Point3 {
        target_transform * self.relative_location
    }

    /// Pose the blade had at cut start, carried along with the target.
    #[must_use]
    pub fn entry_pose(&self, target_transform: &Transform) -> Transform {
        Transform::from_parts(
            self.contact_point(target_transform).coords.into(),
            target_transform.rotation * self.relative_rotation,
        )
    }
}

/// Where the tool is in the cut lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CutState {
    /// No cut in progress.
    #[default]
    Idle,
    /// The target is being converted to a sliceable solid.
    AwaitingConversion(ComponentId),
    /// A cut is in progress.
    Cutting(CutSession),
}

impl CutState {
    /// The session, while cutting.
    #[must_use]
    pub fn session(&self) -> Option<&CutSession> {
        match self {
            CutState::Cutting(session) => Some(session),
            CutState::Idle | CutState::AwaitingConversion(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;
    use slotmap::KeyData;

    #[test]
    fn captured_offset_follows_target() {
        let target = ComponentId::from(KeyData::from_ffi(1));
        let start = Transform::translation(10.0, 0.0, 0.0);
        let session = CutSession::capture(
            target,
            &start,
            &Point3::new(10.0, 0.0, 5.0),
            &Rotation::identity(),
        );
        assert_relative_eq!(session.relative_location, Point3::new(0.0, 0.0, 5.0));

        let moved = Transform::from_parts(
            Vector3::new(0.0, 3.0, 0.0).into(),
            Rotation::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2),
        );
        assert_relative_eq!(
            session.contact_point(&moved),
            Point3::new(0.0, -2.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn relative_rotation_composes_back_to_blade() {
        let target = ComponentId::from(KeyData::from_ffi(1));
        let target_rot = Rotation::from_axis_angle(&Vector3::z_axis(), 0.3);
        let blade_rot = Rotation::from_axis_angle(&Vector3::y_axis(), -0.7);
        let tf = Transform::from_parts(Vector3::zeros().into(), target_rot);
        let session = CutSession::capture(target, &tf, &Point3::origin(), &blade_rot);
        assert_relative_eq!(
            session.entry_pose(&tf).rotation,
            blade_rot,
            epsilon = 1e-12
        );
    }

    #[test]
    fn only_cutting_state_has_a_session() {
        let id = ComponentId::from(KeyData::from_ffi(1));
        assert!(CutState::Idle.session().is_none());
        assert!(CutState::AwaitingConversion(id).session().is_none());
    }
}
