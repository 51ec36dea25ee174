use crate::scene::{ComponentId, Scene};

use super::{OverlapBegin, OverlapEnd, OverlapListener, CUTTABLE_TAG};

/// Depth-limit sensor at the far end of a slicing tool.
///
/// Tracks the cuttable object it is currently touching. When the blade
/// sees a begin or end for that same object the cut has gone all the way
/// through, and the tool refuses to start or aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipSensor {
    component: ComponentId,
    engaged: Option<ComponentId>,
}

impl TipSensor {
    /// Creates a disengaged sensor for the marker component `component`.
    #[must_use]
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            engaged: None,
        }
    }

    /// The sensor's own marker component.
    #[must_use]
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// The cuttable object the tip is touching, if any.
    #[must_use]
    pub fn engaged_target(&self) -> Option<ComponentId> {
        self.engaged
    }

    /// Returns `true` if the tip is touching `component`.
    #[must_use]
    pub fn is_engaged_with(&self, component: ComponentId) -> bool {
        self.engaged == Some(component)
    }
}

impl OverlapListener for TipSensor {
    fn on_overlap_begin(&mut self, scene: &mut Scene, event: &OverlapBegin) {
        if self.engaged.is_some() || !scene.has_tag(event.other, CUTTABLE_TAG) {
            return;
        }
        tracing::trace!("tip engaged");
        self.engaged = Some(event.other);
    }

    fn on_overlap_end(&mut self, _scene: &mut Scene, event: &OverlapEnd) {
        if self.is_engaged_with(event.other) {
            tracing::trace!("tip disengaged");
            self.engaged = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{OrientedBox, Transform, Vector3};
    use crate::scene::{Body, ComponentData};

    fn marker(scene: &mut Scene, tag: Option<&str>) -> ComponentId {
        let actor = scene.spawn_actor("thing");
        let mut data = ComponentData::new(
            "thing",
            Transform::identity(),
            Body::Marker(OrientedBox::new(Vector3::repeat(1.0))),
        );
        if let Some(tag) = tag {
            data = data.with_tag(tag);
        }
        scene.add_component(actor, data).unwrap()
    }

    fn begin(scene: &Scene, other: ComponentId) -> OverlapBegin {
        OverlapBegin::new(scene.component(other).unwrap().owner, other)
    }

    #[test]
    fn engages_first_cuttable_only() {
        let mut scene = Scene::new();
        let tip_marker = marker(&mut scene, None);
        let first = marker(&mut scene, Some(CUTTABLE_TAG));
        let second = marker(&mut scene, Some(CUTTABLE_TAG));
        let plain = marker(&mut scene, None);
        let mut tip = TipSensor::new(tip_marker);

        let ev = begin(&scene, plain);
        tip.on_overlap_begin(&mut scene, &ev);
        assert_eq!(tip.engaged_target(), None);

        let ev = begin(&scene, first);
        tip.on_overlap_begin(&mut scene, &ev);
        let ev = begin(&scene, second);
        tip.on_overlap_begin(&mut scene, &ev);
        assert!(tip.is_engaged_with(first));
    }

    #[test]
    fn disengages_when_engaged_target_ends() {
        let mut scene = Scene::new();
        let tip_marker = marker(&mut scene, None);
        let first = marker(&mut scene, Some(CUTTABLE_TAG));
        let second = marker(&mut scene, Some(CUTTABLE_TAG));
        let mut tip = TipSensor::new(tip_marker);

        let ev = begin(&scene, first);
        tip.on_overlap_begin(&mut scene, &ev);

        let end = begin(&scene, second).ended();
        tip.on_overlap_end(&mut scene, &end);
        assert!(tip.is_engaged_with(first));

        let end = begin(&scene, first).ended();
        tip.on_overlap_end(&mut scene, &end);
        assert_eq!(tip.engaged_target(), None);
    }
}
