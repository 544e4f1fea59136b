use std::sync::Arc;

use log::debug;
use nalgebra as na;

use crate::bbox::Aabb;
use crate::bounds::{BoundsRegion, HandBounds};
use crate::classifier::PoseClassifier;
use crate::config::HandStateConfig;
use crate::debounce::Debouncer;
use crate::frame::HandFrame;
use crate::interaction::{InputPhase, InteractionMapping, MappingInput, MappingValue};
use crate::joint::{Joint, Pose, JOINT_COUNT};
use crate::pose::PoseDefinition;
use crate::velocity::VelocityEstimator;
use crate::{Clock, MonotonicClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    NotTracked,
    Tracked,
}

/// Receives hand notifications. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait HandListener {
    /// Fired only on transitions.
    fn on_tracking_state_changed(
        &mut self,
        hand: Handedness,
        old: TrackingState,
        new: TrackingState,
    ) {
    }

    /// Wrist pose, fired every tick while tracked.
    fn on_pose_changed(&mut self, hand: Handedness, pose: &Pose) {}

    fn on_mappings_updated(&mut self, hand: Handedness, mappings: &[InteractionMapping]) {}

    fn on_hand_data_changed(&mut self, hand: Handedness, frame: &HandFrame) {}

    fn on_pose_input(&mut self, hand: Handedness, pose_id: &str, phase: InputPhase) {}
}

pub struct HandState {
    handedness: Handedness,
    config: HandStateConfig,
    enabled: bool,
    closed: bool,
    clock: Box<dyn Clock>,
    classifier: Option<PoseClassifier>,
    listeners: Vec<Box<dyn HandListener>>,

    joints: [Option<Pose>; JOINT_COUNT],
    bounds: HandBounds,
    velocity: VelocityEstimator,

    pinch: Debouncer,
    point: Debouncer,
    is_pinching: bool,
    was_pinching: bool,
    is_pointing: bool,
    was_pointing: bool,
    is_gripping: bool,
    was_gripping: bool,

    pointer_pose: Pose,
    tracked_pose: Option<Arc<PoseDefinition>>,
    last_tracked_pose: Option<Arc<PoseDefinition>>,

    tracking_state: TrackingState,
    position_available: bool,
    rotation_available: bool,
    mappings: Vec<InteractionMapping>,
}

impl HandState {
    pub fn new(handedness: Handedness, config: HandStateConfig) -> Self {
        let mappings = config
            .mappings
            .iter()
            .map(|input| InteractionMapping::new(*input))
            .collect();

        Self {
            handedness,
            config,
            enabled: true,
            closed: false,
            clock: Box::new(MonotonicClock::new()),
            classifier: None,
            listeners: Vec::new(),
            joints: [None; JOINT_COUNT],
            bounds: HandBounds::new(),
            velocity: VelocityEstimator::new(),
            pinch: Debouncer::default(),
            point: Debouncer::default(),
            is_pinching: false,
            was_pinching: false,
            is_pointing: false,
            was_pointing: false,
            is_gripping: false,
            was_gripping: false,
            pointer_pose: Pose::identity(),
            tracked_pose: None,
            last_tracked_pose: None,
            tracking_state: TrackingState::NotTracked,
            position_available: false,
            rotation_available: false,
            mappings,
        }
    }

    /// Runs `classifier` as part of every update. Without one, the frame's
    /// `tracked_pose` is taken as already resolved by the caller.
    pub fn with_classifier(mut self, classifier: PoseClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn add_listener<L: HandListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn update(&mut self, frame: &mut HandFrame) {
        if !self.enabled || self.closed {
            return;
        }

        self.was_pinching = self.is_pinching;
        self.was_pointing = self.is_pointing;
        self.was_gripping = self.is_gripping;
        self.last_tracked_pose = self.tracked_pose.clone();

        for (known, reported) in self.joints.iter_mut().zip(frame.joints.iter()) {
            if let Some(pose) = reported {
                *known = Some(*pose);
            }
        }

        if let Some(classifier) = self.classifier.as_mut() {
            classifier.process(frame);
        }

        self.update_gestures(frame);
        self.bounds.update(self.config.effective_bounds_mode(), &self.joints);

        let clock = &self.clock;
        self.velocity
            .update(self.joints[Joint::Palm.index()].as_ref(), || clock.unscaled_time());

        self.pointer_pose = frame.pointer_pose;
        self.tracked_pose = frame.tracked_pose.clone();

        let wrist = self.joints[Joint::Wrist.index()];
        self.position_available = wrist.is_some();
        self.rotation_available = wrist.is_some();

        let old_state = self.tracking_state;
        self.tracking_state = if wrist.is_some() && frame.tracked {
            TrackingState::Tracked
        } else {
            TrackingState::NotTracked
        };

        if old_state != self.tracking_state {
            debug!(
                "{} hand tracking {:?} -> {:?}",
                self.handedness.as_str(),
                old_state,
                self.tracking_state
            );
            let hand = self.handedness;
            let new_state = self.tracking_state;
            self.notify(|l| l.on_tracking_state_changed(hand, old_state, new_state));
        }

        if let (TrackingState::Tracked, Some(wrist)) = (self.tracking_state, wrist) {
            let hand = self.handedness;
            self.notify(|l| l.on_pose_changed(hand, &wrist));
        }

        self.update_mappings();

        let hand = self.handedness;
        let frame = &*frame;
        self.notify(|l| l.on_hand_data_changed(hand, frame));
    }

    /// Releases a still-recognized pose and stops processing further frames.
    /// Must be called by the owner when the hand goes away.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let publishes_pose = self.mapping(MappingInput::TrackedPose).is_some();
        if let (Some(pose), true) = (self.tracked_pose.take(), publishes_pose) {
            debug!("{} hand closed while in pose `{}`", self.handedness.as_str(), pose.id());
            let hand = self.handedness;
            self.notify(|l| l.on_pose_input(hand, pose.id(), InputPhase::Up));
        }

        self.last_tracked_pose = None;
        self.pinch.clear();
        self.point.clear();
        self.is_pinching = false;
        self.is_pointing = false;
        self.bounds.clear();
        self.velocity.reset();
        if let Some(classifier) = self.classifier.as_mut() {
            classifier.reset();
        }
    }

    fn update_gestures(&mut self, frame: &HandFrame) {
        if frame.tracked {
            self.is_pinching = self.pinch.push(frame.is_pinching);
            self.is_pointing = self.point.push(frame.is_pointing);
        } else {
            self.pinch.clear();
            self.point.clear();
            self.is_pinching = false;
            self.is_pointing = false;
        }

        self.is_gripping = frame.is_gripping;
    }

    fn update_mappings(&mut self) {
        let pose_changed = self.tracked_pose.as_ref().map(|p| p.id())
            != self.last_tracked_pose.as_ref().map(|p| p.id());

        for i in 0..self.mappings.len() {
            let value = match self.mappings[i].input {
                MappingInput::SpatialPointer => Some(MappingValue::Pose(self.pointer_pose)),
                MappingInput::Select => Some(MappingValue::Digital(self.is_pinching)),
                MappingInput::Point => Some(MappingValue::Digital(self.is_pointing)),
                MappingInput::SpatialGrip => self.joint(Joint::Palm).map(MappingValue::Pose),
                MappingInput::IndexFinger => self.joint(Joint::IndexTip).map(MappingValue::Pose),
                MappingInput::TrackedPose => {
                    if pose_changed {
                        Some(MappingValue::PoseId(
                            self.tracked_pose.as_ref().map(|p| p.shared_id()),
                        ))
                    } else {
                        None
                    }
                }
            };

            match value {
                Some(value) => {
                    self.mappings[i].set(value);
                }
                None => self.mappings[i].changed = false,
            }
        }

        if pose_changed && self.mappings.iter().any(|m| m.input == MappingInput::TrackedPose) {
            let hand = self.handedness;
            if let Some(prev) = self.last_tracked_pose.clone() {
                self.notify(|l| l.on_pose_input(hand, prev.id(), InputPhase::Up));
            }
            if let Some(next) = self.tracked_pose.clone() {
                debug!("{} hand recognized pose `{}`", hand.as_str(), next.id());
                self.notify(|l| l.on_pose_input(hand, next.id(), InputPhase::Down));
            }
        }

        let hand = self.handedness;
        let mappings = std::mem::take(&mut self.mappings);
        self.notify(|l| l.on_mappings_updated(hand, &mappings));
        self.mappings = mappings;
    }

    #[inline]
    fn notify<F: FnMut(&mut dyn HandListener)>(&mut self, mut f: F) {
        for listener in self.listeners.iter_mut() {
            f(listener.as_mut());
        }
    }

    #[inline]
    fn joint(&self, joint: Joint) -> Option<Pose> {
        self.joints[joint.index()]
    }

    #[inline]
    pub fn try_get_joint_pose(&self, joint: Joint) -> Option<Pose> {
        self.joint(joint)
    }

    #[inline]
    pub fn try_get_bounds(&self, region: BoundsRegion) -> Option<&[Aabb]> {
        self.bounds.get(region)
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn config(&self) -> &HandStateConfig {
        &self.config
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn tracking_state(&self) -> TrackingState {
        self.tracking_state
    }

    #[inline]
    pub fn is_position_available(&self) -> bool {
        self.position_available
    }

    #[inline]
    pub fn is_rotation_available(&self) -> bool {
        self.rotation_available
    }

    #[inline]
    pub fn is_pinching(&self) -> bool {
        self.is_pinching
    }

    #[inline]
    pub fn was_pinching(&self) -> bool {
        self.was_pinching
    }

    #[inline]
    pub fn is_pointing(&self) -> bool {
        self.is_pointing
    }

    #[inline]
    pub fn was_pointing(&self) -> bool {
        self.was_pointing
    }

    #[inline]
    pub fn is_gripping(&self) -> bool {
        self.is_gripping
    }

    #[inline]
    pub fn was_gripping(&self) -> bool {
        self.was_gripping
    }

    #[inline]
    pub fn pointer_pose(&self) -> &Pose {
        &self.pointer_pose
    }

    #[inline]
    pub fn tracked_pose(&self) -> Option<&Arc<PoseDefinition>> {
        self.tracked_pose.as_ref()
    }

    #[inline]
    pub fn velocity(&self) -> &na::Vector3<f32> {
        self.velocity.velocity()
    }

    #[inline]
    pub fn angular_velocity(&self) -> &na::Vector3<f32> {
        self.velocity.angular_velocity()
    }

    #[inline]
    pub fn mappings(&self) -> &[InteractionMapping] {
        &self.mappings
    }

    #[inline]
    pub fn mapping(&self, input: MappingInput) -> Option<&InteractionMapping> {
        self.mappings.iter().find(|m| m.input == input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::HandBoundsMode;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Scripted clock shared between a test and the state under test.
    #[derive(Clone, Default)]
    struct TestClock(Rc<Cell<f32>>);

    impl TestClock {
        fn advance(&self, dt: f32) {
            self.0.set(self.0.get() + dt);
        }
    }

    impl Clock for TestClock {
        fn unscaled_time(&self) -> f32 {
            self.0.get()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Tracking(TrackingState, TrackingState),
        Pose,
        Mappings,
        Data,
        PoseInput(String, InputPhase),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    impl HandListener for Recorder {
        fn on_tracking_state_changed(
            &mut self,
            _: Handedness,
            old: TrackingState,
            new: TrackingState,
        ) {
            self.0.borrow_mut().push(Event::Tracking(old, new));
        }

        fn on_pose_changed(&mut self, _: Handedness, _: &Pose) {
            self.0.borrow_mut().push(Event::Pose);
        }

        fn on_mappings_updated(&mut self, _: Handedness, _: &[InteractionMapping]) {
            self.0.borrow_mut().push(Event::Mappings);
        }

        fn on_hand_data_changed(&mut self, _: Handedness, _: &HandFrame) {
            self.0.borrow_mut().push(Event::Data);
        }

        fn on_pose_input(&mut self, _: Handedness, pose_id: &str, phase: InputPhase) {
            self.0.borrow_mut().push(Event::PoseInput(pose_id.to_string(), phase));
        }
    }

    fn test_pose(x: f32, y: f32, z: f32) -> Pose {
        Pose::from_position(na::Vector3::new(x, y, z))
    }

    /// Tracked frame with every joint reported at a distinct position.
    fn test_frame() -> HandFrame {
        let mut frame = HandFrame {
            tracked: true,
            ..Default::default()
        };
        for joint in Joint::ALL {
            let i = joint.index() as f32;
            frame.set_joint(joint, test_pose(i * 0.01, i * 0.002, 0.0));
        }
        frame
    }

    fn state() -> (HandState, Recorder, TestClock) {
        let recorder = Recorder::default();
        let clock = TestClock::default();
        let mut state = HandState::new(Handedness::Right, HandStateConfig::default())
            .with_clock(clock.clone());
        state.add_listener(recorder.clone());
        (state, recorder, clock)
    }

    #[test]
    fn test_pinch_debounce() {
        let (mut state, _, _) = state();
        let mut frame = test_frame();
        frame.is_pinching = true;

        for _ in 0..4 {
            state.update(&mut frame);
            assert!(!state.is_pinching());
        }
        state.update(&mut frame);
        assert!(state.is_pinching());
        assert_eq!(state.mapping(MappingInput::Select).unwrap().digital(), Some(true));

        frame.is_pinching = false;
        state.update(&mut frame);
        assert!(!state.is_pinching());
        assert!(state.was_pinching());
    }

    #[test]
    fn test_point_debounce_independent_of_pinch() {
        let (mut state, _, _) = state();
        let mut frame = test_frame();
        frame.is_pointing = true;
        for _ in 0..5 {
            state.update(&mut frame);
        }
        assert!(state.is_pointing());
        assert!(!state.is_pinching());
    }

    #[test]
    fn test_losing_tracking_clears_gestures() {
        let (mut state, _, _) = state();
        let mut frame = test_frame();
        frame.is_pinching = true;
        frame.is_pointing = true;
        for _ in 0..5 {
            state.update(&mut frame);
        }
        assert!(state.is_pinching() && state.is_pointing());

        frame.tracked = false;
        state.update(&mut frame);
        assert!(!state.is_pinching());
        assert!(!state.is_pointing());
        assert_eq!(state.tracking_state(), TrackingState::NotTracked);

        // Re-acquiring restarts the warm-up.
        frame.tracked = true;
        for _ in 0..4 {
            state.update(&mut frame);
            assert!(!state.is_pinching());
        }
        state.update(&mut frame);
        assert!(state.is_pinching());
    }

    #[test]
    fn test_grip_is_passthrough() {
        let (mut state, _, _) = state();
        let mut frame = test_frame();
        frame.is_gripping = true;
        state.update(&mut frame);
        assert!(state.is_gripping());
        frame.is_gripping = false;
        state.update(&mut frame);
        assert!(!state.is_gripping());
        assert!(state.was_gripping());
    }

    #[test]
    fn test_joints_merge_without_dropping() {
        let (mut state, _, _) = state();
        let mut frame = test_frame();
        state.update(&mut frame);

        let mut sparse = HandFrame {
            tracked: false,
            ..Default::default()
        };
        sparse.set_joint(Joint::IndexTip, test_pose(1.0, 2.0, 3.0));
        state.update(&mut sparse);

        assert_eq!(
            state.try_get_joint_pose(Joint::IndexTip).map(|p| p.position),
            Some(na::Vector3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            state.try_get_joint_pose(Joint::ThumbTip),
            frame.joint(Joint::ThumbTip).copied()
        );
    }

    #[test]
    fn test_tracking_requires_wrist() {
        let (mut state, recorder, _) = state();
        let mut frame = HandFrame {
            tracked: true,
            ..Default::default()
        };
        frame.set_joint(Joint::Palm, test_pose(0.0, 0.0, 0.0));
        state.update(&mut frame);
        assert_eq!(state.tracking_state(), TrackingState::NotTracked);
        assert!(!state.is_position_available());
        assert_eq!(recorder.take(), vec![Event::Mappings, Event::Data]);

        frame.set_joint(Joint::Wrist, test_pose(0.0, -0.05, 0.0));
        state.update(&mut frame);
        assert_eq!(state.tracking_state(), TrackingState::Tracked);
        assert!(state.is_position_available());
        assert!(state.is_rotation_available());
        assert_eq!(
            recorder.take(),
            vec![
                Event::Tracking(TrackingState::NotTracked, TrackingState::Tracked),
                Event::Pose,
                Event::Mappings,
                Event::Data,
            ]
        );

        // Steady state: no transition, pose every tick.
        state.update(&mut frame);
        assert_eq!(recorder.take(), vec![Event::Pose, Event::Mappings, Event::Data]);

        // Untracked but the wrist is still known: position stays available.
        frame.tracked = false;
        state.update(&mut frame);
        assert!(state.is_position_available());
        assert_eq!(
            recorder.take(),
            vec![
                Event::Tracking(TrackingState::Tracked, TrackingState::NotTracked),
                Event::Mappings,
                Event::Data,
            ]
        );
    }

    #[test]
    fn test_disabled_is_noop() {
        let (mut state, recorder, _) = state();
        state.set_enabled(false);
        let mut frame = test_frame();
        frame.is_pinching = true;
        state.update(&mut frame);

        assert!(state.try_get_joint_pose(Joint::Wrist).is_none());
        assert_eq!(state.tracking_state(), TrackingState::NotTracked);
        assert!(recorder.take().is_empty());

        state.set_enabled(true);
        state.update(&mut frame);
        assert_eq!(state.tracking_state(), TrackingState::Tracked);
    }

    #[test]
    fn test_bounds_follow_config() {
        let config = HandStateConfig {
            bounds_mode: HandBoundsMode::Hand,
            physics_enabled: true,
            ..Default::default()
        };
        let mut on = HandState::new(Handedness::Left, config);
        let mut frame = test_frame();
        on.update(&mut frame);
        assert_eq!(on.try_get_bounds(BoundsRegion::Hand).map(|b| b.len()), Some(1));
        assert!(on.try_get_bounds(BoundsRegion::Palm).is_none());

        // Physics disabled: the configured mode is ignored.
        let (mut off, _, _) = state();
        off.config.bounds_mode = HandBoundsMode::Hand;
        off.update(&mut frame);
        assert!(off.try_get_bounds(BoundsRegion::Hand).is_none());
    }

    #[test]
    fn test_velocity_from_clock() {
        let (mut state, _, clock) = state();
        let mut frame = test_frame();

        for tick in 0..10 {
            if tick == 9 {
                let palm = frame.joint(Joint::Palm).copied().unwrap();
                let moved = palm.position + na::Vector3::new(0.5, 0.0, 0.0);
                frame.set_joint(Joint::Palm, Pose::new(moved, palm.rotation));
            }
            state.update(&mut frame);
            clock.advance(0.1);
        }

        // 0.5 m over 0.9 s, weighted 0.2
        let expected = 0.5 / 0.9 * 0.2;
        assert!((state.velocity().x - expected).abs() < 1e-4);
        assert!(state.angular_velocity().norm() < 1e-5);
    }

    #[test]
    fn test_pose_inputs_and_close() {
        let (mut state, recorder, _) = state();
        let fist = Arc::new(PoseDefinition::baked("fist", HandFrame::default()));
        let open = Arc::new(PoseDefinition::baked("open", HandFrame::default()));

        let mut frame = test_frame();
        frame.tracked_pose = Some(fist.clone());
        state.update(&mut frame);
        let events = recorder.take();
        assert!(events.contains(&Event::PoseInput("fist".into(), InputPhase::Down)));
        assert_eq!(
            state.mapping(MappingInput::TrackedPose).unwrap().pose_id(),
            Some("fist")
        );
        assert!(state.mapping(MappingInput::TrackedPose).unwrap().changed);

        state.update(&mut frame);
        assert!(!recorder.take().iter().any(|e| matches!(e, Event::PoseInput(..))));
        assert!(!state.mapping(MappingInput::TrackedPose).unwrap().changed);

        frame.tracked_pose = Some(open);
        state.update(&mut frame);
        let inputs: Vec<_> = recorder
            .take()
            .into_iter()
            .filter(|e| matches!(e, Event::PoseInput(..)))
            .collect();
        assert_eq!(
            inputs,
            vec![
                Event::PoseInput("fist".into(), InputPhase::Up),
                Event::PoseInput("open".into(), InputPhase::Down),
            ]
        );

        state.close();
        assert_eq!(recorder.take(), vec![Event::PoseInput("open".into(), InputPhase::Up)]);
        assert!(state.tracked_pose().is_none());
        assert!(state.is_closed());

        state.close();
        state.update(&mut frame);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_close_drops_bounds_and_velocity() {
        let config = HandStateConfig {
            bounds_mode: HandBoundsMode::Hand,
            physics_enabled: true,
            ..Default::default()
        };
        let clock = TestClock::default();
        let mut hand = HandState::new(Handedness::Left, config).with_clock(clock.clone());
        let mut frame = test_frame();

        for tick in 0..10 {
            if tick == 9 {
                let palm = frame.joint(Joint::Palm).copied().unwrap();
                let moved = palm.position + na::Vector3::new(1.0, 0.0, 0.0);
                frame.set_joint(Joint::Palm, Pose::new(moved, palm.rotation));
            }
            hand.update(&mut frame);
            clock.advance(0.1);
        }
        assert!(hand.try_get_bounds(BoundsRegion::Hand).is_some());
        assert!(hand.velocity().x > 0.0);

        hand.close();
        assert!(hand.try_get_bounds(BoundsRegion::Hand).is_none());
        assert_eq!(*hand.velocity(), na::Vector3::zeros());
        assert_eq!(*hand.angular_velocity(), na::Vector3::zeros());
        // Joints keep their last known pose for late queries.
        assert!(hand.try_get_joint_pose(Joint::Wrist).is_some());
    }

    #[test]
    fn test_close_without_pose_is_silent() {
        let (mut state, recorder, _) = state();
        state.update(&mut test_frame());
        recorder.take();
        state.close();
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_embedded_classifier() {
        let mut baked = HandFrame::default();
        baked.is_gripping = true;
        baked.grip_strength = 1.0;
        let classifier = PoseClassifier::new(vec![PoseDefinition::baked("fist", baked)]).unwrap();

        let (state, _, _) = state();
        let mut state = state.with_classifier(classifier);

        let mut frame = test_frame();
        frame.is_gripping = true;
        frame.grip_strength = 1.0;
        for _ in 0..10 {
            state.update(&mut frame);
            assert!(state.tracked_pose().is_none());
        }
        state.update(&mut frame);
        assert_eq!(state.tracked_pose().map(|p| p.id()), Some("fist"));
        assert_eq!(frame.tracked_pose_id(), Some("fist"));
    }
}
