//! The mechanical link between a slicing tool and the object it is cutting.
//!
//! While a cut is in progress the [`CutJoint`] keeps the partially severed
//! piece on the blade: translation across the blade (along the slicing
//! plane normal) is locked, swing and twist are bounded, the rest is free.
//! The joint is owned by the tool and reset between cuts rather than
//! recreated. The host physics solver reads its state after every change.

use crate::math::Transform;
use crate::scene::ComponentId;

/// Motion allowed along one linear axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearMotion {
    /// Unconstrained.
    Free,
    /// No motion allowed.
    Locked,
}

/// Motion allowed around one angular axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngularMotion {
    /// Unconstrained.
    Free,
    /// Bounded to `±limit_deg` degrees.
    Limited { limit_deg: f64 },
}

/// One side of a joint: a component and the joint frame relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFrame {
    /// The constrained component.
    pub component: ComponentId,
    /// Joint frame expressed in the component's local space.
    pub local: Transform,
}

/// A six-axis constraint in the joint frame.
///
/// The joint frame's Z axis is the depth axis (the slicing plane normal);
/// X and Y span the slicing plane. Twist is rotation about Z; swing 1 is
/// about Y and swing 2 about X.
#[derive(Debug, Clone, PartialEq)]
pub struct CutJoint {
    pub linear_x: LinearMotion,
    pub linear_y: LinearMotion,
    pub linear_depth: LinearMotion,
    pub swing1: AngularMotion,
    pub swing2: AngularMotion,
    pub twist: AngularMotion,
    /// Bound frames; `None` while the joint is free.
    pub frames: Option<(JointFrame, JointFrame)>,
}

impl Default for CutJoint {
    fn default() -> Self {
        Self {
            linear_x: LinearMotion::Free,
            linear_y: LinearMotion::Free,
            linear_depth: LinearMotion::Free,
            swing1: AngularMotion::Free,
            swing2: AngularMotion::Free,
            twist: AngularMotion::Free,
            frames: None,
        }
    }
}

impl CutJoint {
    /// Returns `true` if every axis is free and nothing is bound.
    #[must_use]
    pub fn is_free(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` while the joint links two components.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.frames.is_some()
    }
}

/// Arms and releases a tool's [`CutJoint`].
#[derive(Debug, Clone, Copy)]
pub struct ConstraintManager {
    angular_limit_deg: f64,
}

impl ConstraintManager {
    /// Creates a manager bounding swing and twist to `angular_limit_deg`.
    #[must_use]
    pub fn new(angular_limit_deg: f64) -> Self {
        Self { angular_limit_deg }
    }

    /// Configured swing/twist bound in degrees.
    #[must_use]
    pub fn angular_limit_deg(&self) -> f64 {
        self.angular_limit_deg
    }

    /// Binds `joint` between the blade frame and the target frame.
    ///
    /// Locks depth translation, bounds swing 1 and twist, and leaves both
    /// in-plane translations and swing 2 free.
    pub fn arm(&self, joint: &mut CutJoint, blade: JointFrame, target: JointFrame) {
        let limited = AngularMotion::Limited {
            limit_deg: self.angular_limit_deg,
        };
        *joint = CutJoint {
            linear_x: LinearMotion::Free,
            linear_y: LinearMotion::Free,
            linear_depth: LinearMotion::Locked,
            swing1: limited,
            swing2: AngularMotion::Free,
            twist: limited,
            frames: Some((blade, target)),
        };
        tracing::trace!(limit_deg = self.angular_limit_deg, "armed cut joint");
    }

    /// Restores every axis to free and unbinds the frames. No-op on a free joint.
    pub fn release(&self, joint: &mut CutJoint) {
        if joint.is_free() {
            return;
        }
        *joint = CutJoint::default();
        tracing::trace!("released cut joint");
    }
}

impl Default for ConstraintManager {
    fn default() -> Self {
        Self::new(45.0)
    }
}
