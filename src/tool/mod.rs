//! The slicing tool: a blade that severs cuttable objects it is drawn through.
//!
//! A [`SlicingTool`] consumes the overlap and tick signals the host forwards
//! for the tool's blade marker and walks through the cut lifecycle:
//!
//! 1. An overlap begin with a `"cuttable"` object opens a [`CutSession`].
//!    Standalone solids are converted in place first and the signal is
//!    delivered once more.
//! 2. While cutting, the [`CutJoint`] keeps the target on the blade and the
//!    tool only overlaps with physics bodies.
//! 3. An overlap end with the target either aborts (tip went through, or
//!    the blade returned to where it entered) or commits the cut: the
//!    target is split along the blade plane, both halves are baked into
//!    standalone solids, and the original object is destroyed.
//!
//! Failures never reach the host. They are logged and end in "no cut".

mod config;
mod debug;
mod session;
mod sockets;
mod tip;

pub use config::SlicingConfig;
pub use session::{CutSession, CutState};
pub use sockets::{marker_half_extents, SocketMarkers, SocketName};
pub use tip::TipSensor;

use crate::constraint::{ConstraintManager, CutJoint, JointFrame};
use crate::error::{Result, SceneError, ToolError};
use crate::math::{OrientedBox, Point3, Transform, Vector3};
use crate::operations::{CapOption, ConvertToSliceable, ConvertToStandalone, PlaneSlice};
use crate::scene::{ActorId, Body, CollisionChannel, CollisionResponse, ComponentId, Scene};

use self::debug::BladeFrame;

/// Tag marking objects that can be cut.
pub const CUTTABLE_TAG: &str = "cuttable";

/// Tag marking components that can act as a slicing tool.
pub const KNIFE_TAG: &str = "Knife";

/// Sweep result attached to an overlap begin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// World-space point of contact.
    pub impact_point: Point3,
}

/// The host reports that another component started overlapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapBegin {
    pub other_actor: ActorId,
    pub other: ComponentId,
    pub from_sweep: bool,
    pub hit: Option<HitResult>,
}

impl OverlapBegin {
    /// A non-sweep overlap with no hit data.
    #[must_use]
    pub fn new(other_actor: ActorId, other: ComponentId) -> Self {
        Self {
            other_actor,
            other,
            from_sweep: false,
            hit: None,
        }
    }

    /// Marks the overlap as coming from a sweep that hit at `impact_point`.
    #[must_use]
    pub fn with_sweep_hit(mut self, impact_point: Point3) -> Self {
        self.from_sweep = true;
        self.hit = Some(HitResult { impact_point });
        self
    }

    /// The matching end signal.
    #[must_use]
    pub fn ended(&self) -> OverlapEnd {
        OverlapEnd {
            other_actor: self.other_actor,
            other: self.other,
        }
    }
}

/// The host reports that another component stopped overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapEnd {
    pub other_actor: ActorId,
    pub other: ComponentId,
}

/// Callback interface the host invokes for a component's overlap and tick signals.
pub trait OverlapListener {
    fn on_overlap_begin(&mut self, scene: &mut Scene, event: &OverlapBegin);

    fn on_overlap_end(&mut self, scene: &mut Scene, event: &OverlapEnd);

    fn on_tick(&mut self, _scene: &mut Scene, _delta_seconds: f64) {}
}

/// Why a begin signal did not open a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotCuttable,
    SessionActive,
    ConversionInFlight,
    /// The object is the one the tip is touching.
    TipEngaged,
    /// The tool lost its blade socket or was removed from the scene.
    BladeUnavailable,
}

/// Result of handling a begin signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Ignored(RejectReason),
    /// A session is open; `converted` is set if the target had to be made sliceable first.
    SessionOpened { converted: bool },
    /// The target could not be made sliceable.
    ConversionDropped,
}

/// Why a session ended without a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The tip passed through the target.
    Withdrawn,
    /// The blade left where it came in.
    ReturnedToStart,
    /// The target was destroyed outside the tool.
    TargetLost,
    /// Slicing or baking the halves failed.
    CommitFailed,
    BladeUnavailable,
}

/// Solids left behind by a committed cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutResult {
    /// New standalone components; one if the plane missed the target.
    pub pieces: Vec<ComponentId>,
    /// The destroyed owner of the original target.
    pub destroyed: ActorId,
}

/// Result of handling an end signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// Not the session target, or no session.
    Ignored,
    Aborted(AbortReason),
    Committed(CutResult),
}

/// Builder for [`SlicingTool`].
#[derive(Debug, Clone)]
pub struct SlicingToolBuilder {
    tool_object: ComponentId,
    tips: Vec<ComponentId>,
    config: SlicingConfig,
}

impl SlicingToolBuilder {
    /// Replaces the default configuration.
    #[must_use]
    pub fn config(mut self, config: SlicingConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a tip sensor marker. At most one may be registered.
    #[must_use]
    pub fn tip(mut self, component: ComponentId) -> Self {
        self.tips.push(component);
        self
    }

    /// Validates the tool object and creates the tool.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool object or tip is missing from the
    /// scene, the tool object is not tagged `"Knife"` or has no blade
    /// socket, or more than one tip was registered.
    pub fn build(self, scene: &Scene) -> Result<SlicingTool> {
        let tool = scene.component(self.tool_object)?;
        if !tool.has_tag(KNIFE_TAG) {
            return Err(ToolError::MissingTag(KNIFE_TAG).into());
        }
        if tool.socket(SocketName::Blade.as_str()).is_none() {
            return Err(ToolError::MissingSocket(SocketName::Blade.as_str()).into());
        }
        let tip = match self.tips.as_slice() {
            [] => None,
            [tip] => {
                scene.component(*tip)?;
                Some(TipSensor::new(*tip))
            }
            tips => return Err(ToolError::MultipleTips(tips.len()).into()),
        };

        if self.config.console_log {
            tracing::info!(tool = %tool.name, has_tip = tip.is_some(), "slicing tool ready");
        }
        Ok(SlicingTool {
            tool_object: self.tool_object,
            tip,
            config: self.config,
            constraints: ConstraintManager::new(self.config.angular_limit_deg),
            joint: CutJoint::default(),
            state: CutState::Idle,
            conversion_requests: 0,
        })
    }
}

/// A blade-bearing tool and its cut state machine.
#[derive(Debug, Clone)]
pub struct SlicingTool {
    tool_object: ComponentId,
    tip: Option<TipSensor>,
    config: SlicingConfig,
    constraints: ConstraintManager,
    joint: CutJoint,
    state: CutState,
    conversion_requests: usize,
}

impl SlicingTool {
    /// Starts building a tool around `tool_object`, the component carrying
    /// the blade sockets.
    #[must_use]
    pub fn builder(tool_object: ComponentId) -> SlicingToolBuilder {
        SlicingToolBuilder {
            tool_object,
            tips: Vec::new(),
            config: SlicingConfig::default(),
        }
    }

    #[must_use]
    pub fn tool_object(&self) -> ComponentId {
        self.tool_object
    }

    #[must_use]
    pub fn config(&self) -> &SlicingConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &CutState {
        &self.state
    }

    #[must_use]
    pub fn is_currently_cutting(&self) -> bool {
        matches!(self.state, CutState::Cutting(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&CutSession> {
        self.state.session()
    }

    /// The tool's joint, for the host physics solver.
    #[must_use]
    pub fn joint(&self) -> &CutJoint {
        &self.joint
    }

    /// Number of standalone to sliceable conversions this tool has requested.
    #[must_use]
    pub fn conversion_requests(&self) -> usize {
        self.conversion_requests
    }

    #[must_use]
    pub fn tip(&self) -> Option<&TipSensor> {
        self.tip.as_ref()
    }

    /// The tip sensor, so the host can forward the tip marker's own overlaps.
    pub fn tip_mut(&mut self) -> Option<&mut TipSensor> {
        self.tip.as_mut()
    }

    /// Handles an overlap begin on the blade.
    pub fn handle_overlap_begin(&mut self, scene: &mut Scene, event: &OverlapBegin) -> BeginOutcome {
        self.abort_if_target_lost(scene);
        self.begin(scene, event, false)
    }

    /// Handles an overlap end on the blade.
    pub fn handle_overlap_end(&mut self, scene: &mut Scene, event: &OverlapEnd) -> EndOutcome {
        if self.abort_if_target_lost(scene) {
            return EndOutcome::Aborted(AbortReason::TargetLost);
        }
        let CutState::Cutting(session) = self.state else {
            return EndOutcome::Ignored;
        };
        if event.other != session.target {
            return EndOutcome::Ignored;
        }

        if self.tip_is_engaged_with(session.target) {
            self.end_session(scene, "tool withdrawn through the tip");
            return EndOutcome::Aborted(AbortReason::Withdrawn);
        }

        let returned = match self.blade_contains_entry(scene, &session) {
            Ok(returned) => returned,
            Err(err) => {
                tracing::warn!(%err, "blade unavailable at overlap end");
                self.end_session(scene, "blade unavailable");
                return EndOutcome::Aborted(AbortReason::BladeUnavailable);
            }
        };
        if returned {
            self.end_session(scene, "blade returned to its entry point");
            return EndOutcome::Aborted(AbortReason::ReturnedToStart);
        }

        let outcome = match self.commit(scene, &session) {
            Ok(result) => {
                if self.config.console_log {
                    tracing::info!(pieces = result.pieces.len(), "cut committed");
                }
                EndOutcome::Committed(result)
            }
            Err(err) => {
                tracing::warn!(%err, "cut failed");
                EndOutcome::Aborted(AbortReason::CommitFailed)
            }
        };
        self.end_session(scene, "cut resolved");
        outcome
    }

    /// Per-frame update; draws debug visuals while cutting.
    pub fn tick(&mut self, scene: &mut Scene) {
        self.abort_if_target_lost(scene);
        let CutState::Cutting(session) = self.state else {
            return;
        };
        if !(self.config.show_plane || self.config.show_trajectory) {
            return;
        }
        if let Err(err) = self.draw_debug(scene, &session) {
            tracing::trace!(%err, "skipped debug visuals");
        }
    }

    fn begin(&mut self, scene: &mut Scene, event: &OverlapBegin, retry: bool) -> BeginOutcome {
        match self.state {
            CutState::Cutting(_) => return reject(RejectReason::SessionActive),
            CutState::AwaitingConversion(_) => {
                return reject(RejectReason::ConversionInFlight)
            }
            CutState::Idle => {}
        }
        if !scene.has_tag(event.other, CUTTABLE_TAG) {
            return reject(RejectReason::NotCuttable);
        }
        if self.tip_is_engaged_with(event.other) {
            return reject(RejectReason::TipEngaged);
        }

        if scene.as_sliceable(event.other).is_none() {
            if retry {
                tracing::warn!("conversion did not yield a sliceable solid");
                return BeginOutcome::ConversionDropped;
            }
            self.state = CutState::AwaitingConversion(event.other);
            self.conversion_requests += 1;
            let converted = ConvertToSliceable::new(event.other).execute(scene);
            self.state = CutState::Idle;
            if let Err(err) = converted {
                tracing::warn!(%err, "dropping overlap, target cannot be made sliceable");
                return BeginOutcome::ConversionDropped;
            }
            return match self.begin(scene, event, true) {
                BeginOutcome::SessionOpened { .. } => BeginOutcome::SessionOpened { converted: true },
                other => other,
            };
        }

        match self.open_session(scene, event) {
            Ok(()) => BeginOutcome::SessionOpened { converted: false },
            Err(err) => {
                tracing::warn!(%err, "cannot open cut session");
                BeginOutcome::Ignored(RejectReason::BladeUnavailable)
            }
        }
    }

    fn open_session(&mut self, scene: &mut Scene, event: &OverlapBegin) -> Result<()> {
        let (blade_pose, _) = self.blade(scene)?;
        let contact = match (event.from_sweep, event.hit) {
            (true, Some(hit)) => hit.impact_point,
            _ => Point3::from(blade_pose.translation.vector),
        };
        let target_transform = scene.transform(event.other)?;
        let session = CutSession::capture(
            event.other,
            &target_transform,
            &contact,
            &blade_pose.rotation,
        );

        let mesh = scene
            .as_sliceable_mut(event.other)
            .ok_or(SceneError::WrongBody {
                expected: "sliceable",
            })?;
        mesh.body.notify_rigid_body_collision = true;
        scene.set_collision_response(
            self.tool_object,
            CollisionChannel::PhysicsBody,
            CollisionResponse::Overlap,
        )?;

        let blade_local = self.blade_socket_local(scene)?;
        self.constraints.arm(
            &mut self.joint,
            JointFrame {
                component: self.tool_object,
                local: blade_local,
            },
            JointFrame {
                component: event.other,
                local: session.entry_pose(&Transform::identity()),
            },
        );
        self.state = CutState::Cutting(session);

        tracing::debug!(
            x = session.relative_location.x,
            y = session.relative_location.y,
            z = session.relative_location.z,
            "cut session opened"
        );
        if self.config.console_log {
            tracing::info!("cut started");
        }
        Ok(())
    }

    /// Checks whether the recorded entry point, carried along with the
    /// target, still lies inside the blade marker.
    fn blade_contains_entry(&self, scene: &Scene, session: &CutSession) -> Result<bool> {
        let (blade_pose, marker) = self.blade(scene)?;
        let target_transform = scene.transform(session.target)?;
        let entry = session.contact_point(&target_transform);
        Ok(marker.contains_point(&blade_pose, &entry))
    }

    /// Splits the target and replaces its owner with standalone pieces.
    /// A failure part way through restores the target and drops any piece
    /// already spawned.
    fn commit(&self, scene: &mut Scene, session: &CutSession) -> Result<CutResult> {
        let (blade_pose, _) = self.blade(scene)?;
        let plane_point = Point3::from(blade_pose.translation.vector);
        let plane_normal = self.up_axis(scene)?;

        let target = scene.component(session.target)?;
        let owner = target.owner;
        let snapshot = target.body.clone();
        let mesh = scene
            .as_sliceable(session.target)
            .ok_or(SceneError::WrongBody {
                expected: "sliceable",
            })?;
        let (cap, material) = match mesh.inside_cut_material() {
            Some(material) => (CapOption::NewCappedSection, Some(material)),
            None => (CapOption::NoCap, None),
        };

        let other = match PlaneSlice::new(session.target, plane_point, plane_normal)
            .with_cap(cap, material)
            .execute(scene)
        {
            Ok(other) => other,
            Err(err) => {
                undo_partial_commit(scene, session.target, snapshot, None, &[]);
                return Err(err);
            }
        };

        let mut pieces = Vec::with_capacity(2);
        if let Err(err) = bake_halves(scene, session.target, other, owner, &mut pieces) {
            undo_partial_commit(scene, session.target, snapshot, other, &pieces);
            return Err(err);
        }
        tracing::debug!(pieces = pieces.len(), "replaced target with standalone pieces");
        Ok(CutResult {
            pieces,
            destroyed: owner,
        })
    }

    fn end_session(&mut self, scene: &mut Scene, why: &str) {
        self.constraints.release(&mut self.joint);
        if let Err(err) = scene.set_collision_response(
            self.tool_object,
            CollisionChannel::PhysicsBody,
            CollisionResponse::Block,
        ) {
            tracing::warn!(%err, "cannot restore tool collision");
        }
        scene.flush_persistent_debug();
        self.state = CutState::Idle;
        tracing::debug!(why, "cut session ended");
        if self.config.console_log {
            tracing::info!(why, "cut session ended");
        }
    }

    /// Ends the session if the target was destroyed behind the tool's back.
    fn abort_if_target_lost(&mut self, scene: &mut Scene) -> bool {
        let lost = self
            .session()
            .is_some_and(|session| !scene.contains(session.target));
        if lost {
            tracing::warn!("cut target destroyed externally, aborting");
            self.end_session(scene, "target lost");
        }
        lost
    }

    fn tip_is_engaged_with(&self, component: ComponentId) -> bool {
        self.tip.is_some_and(|tip| tip.is_engaged_with(component))
    }

    fn blade_socket_local(&self, scene: &Scene) -> Result<Transform> {
        scene
            .component(self.tool_object)?
            .socket(SocketName::Blade.as_str())
            .map(|socket| socket.local)
            .ok_or_else(|| ToolError::MissingSocket(SocketName::Blade.as_str()).into())
    }

    /// World pose and marker box of the blade.
    fn blade(&self, scene: &Scene) -> Result<(Transform, OrientedBox)> {
        let tool = scene.component(self.tool_object)?;
        let socket = tool
            .socket(SocketName::Blade.as_str())
            .ok_or(ToolError::MissingSocket(SocketName::Blade.as_str()))?;
        let marker = OrientedBox::new(marker_half_extents(socket, self.config.marker_scale));
        Ok((tool.transform * socket.local, marker))
    }

    /// Slicing plane normal: the tool object's up axis.
    fn up_axis(&self, scene: &Scene) -> Result<Vector3> {
        Ok(scene.transform(self.tool_object)?.rotation * Vector3::z())
    }

    fn draw_debug(&self, scene: &mut Scene, session: &CutSession) -> Result<()> {
        let (pose, marker) = self.blade(scene)?;
        let blade = BladeFrame {
            pose,
            marker,
            plane_normal: self.up_axis(scene)?,
        };
        if self.config.show_plane {
            debug::draw_slicing_plane(scene, session, &blade)?;
            debug::draw_entrance_point(scene, session, &self.config)?;
            debug::draw_exit_point(scene, session, &blade, &self.config)?;
        }
        if self.config.show_trajectory {
            debug::draw_trajectory(scene, &blade);
        }
        Ok(())
    }
}

/// Bakes both halves into standalone solids, then destroys the original owner.
fn bake_halves(
    scene: &mut Scene,
    target: ComponentId,
    other: Option<ComponentId>,
    owner: ActorId,
    pieces: &mut Vec<ComponentId>,
) -> Result<()> {
    pieces.push(ConvertToStandalone::new(target).execute(scene)?);
    if let Some(other) = other {
        pieces.push(ConvertToStandalone::new(other).execute(scene)?);
    }
    scene.destroy_actor(owner)?;
    Ok(())
}

fn undo_partial_commit(
    scene: &mut Scene,
    target: ComponentId,
    body: Body,
    other: Option<ComponentId>,
    pieces: &[ComponentId],
) {
    for &piece in pieces {
        let Ok(owner) = scene.component(piece).map(|c| c.owner) else {
            continue;
        };
        if let Err(err) = scene.destroy_actor(owner) {
            tracing::warn!(%err, "cannot drop baked piece");
        }
    }
    if let Some(other) = other {
        if let Err(err) = scene.remove_component(other) {
            tracing::warn!(%err, "cannot drop other half");
        }
    }
    match scene.component_mut(target) {
        Ok(component) => component.body = body,
        Err(err) => tracing::warn!(%err, "cannot restore cut target"),
    }
    tracing::debug!(pieces = pieces.len(), "rolled back partial cut");
}

fn reject(reason: RejectReason) -> BeginOutcome {
    tracing::trace!(?reason, "overlap begin ignored");
    BeginOutcome::Ignored(reason)
}

impl OverlapListener for SlicingTool {
    fn on_overlap_begin(&mut self, scene: &mut Scene, event: &OverlapBegin) {
        self.handle_overlap_begin(scene, event);
    }

    fn on_overlap_end(&mut self, scene: &mut Scene, event: &OverlapEnd) {
        self.handle_overlap_end(scene, event);
    }

    fn on_tick(&mut self, scene: &mut Scene, _delta_seconds: f64) {
        self.tick(scene);
    }
}
