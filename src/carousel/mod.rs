// File: ./src/carousel/mod.rs
// Three-frame week pager driven by a horizontal drag gesture.
//
// Offsets are in pixels of the carousel area. Positive offsets slide the
// frames right and reveal the previous week; negative offsets reveal the next.
pub mod spring;

use crate::frame::WeekFrame;
use crate::haptics::{HapticKind, HapticSink};
use crate::lookup::MealIndex;
use crate::navigation::{Direction, NavigationOutcome, WeekNavigation};
use chrono::NaiveDate;
use spring::{Spring, SpringConfig};
use std::time::Duration;
use tracing::debug;

/// Displacement (px) beyond which a released drag commits.
pub const SWIPE_THRESHOLD: f32 = 50.0;
/// Release speed (px/s) beyond which a drag commits regardless of distance.
pub const VELOCITY_THRESHOLD: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Animating,
}

/// What a released (or programmatic) gesture turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureDecision {
    /// Paging animation started; navigation happens when it finishes.
    Commit(Direction),
    /// Below both thresholds, springs back.
    Cancel,
    /// Over a threshold but navigation is not allowed that way; springs back.
    Denied(Direction),
}

/// Commit test for a released drag. `None` means snap back.
pub fn decide(translation: f32, velocity: f32) -> Option<Direction> {
    let commit = velocity.abs() > VELOCITY_THRESHOLD || translation.abs() > SWIPE_THRESHOLD;
    if !commit {
        return None;
    }
    if translation > 0.0 || velocity > 0.0 {
        Some(Direction::Previous)
    } else {
        Some(Direction::Next)
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Dragging,
    Animating {
        spring: Spring,
        then: Option<Direction>,
    },
}

pub struct Carousel<H: HapticSink> {
    state: State,
    offset: f32,
    frame_width: f32,
    haptics: H,
}

impl<H: HapticSink> Carousel<H> {
    pub fn new(frame_width: f32, haptics: H) -> Self {
        Self {
            state: State::Idle,
            offset: 0.0,
            frame_width: frame_width.max(1.0),
            haptics,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Dragging => Phase::Dragging,
            State::Animating { .. } => Phase::Animating,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.phase() == Phase::Animating
    }

    /// Current horizontal displacement, always within `[-frame_width, frame_width]`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn frame_width(&self) -> f32 {
        self.frame_width
    }

    /// Layout changed. Only applied while idle so a running animation keeps
    /// its target.
    pub fn set_frame_width(&mut self, width: f32) {
        if width > 0.0 && matches!(self.state, State::Idle) {
            self.frame_width = width;
        }
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn haptics_mut(&mut self) -> &mut H {
        &mut self.haptics
    }

    /// Starts a gesture. Ignored (returns false) unless idle.
    pub fn begin_drag(&mut self) -> bool {
        match self.state {
            State::Idle => {
                self.state = State::Dragging;
                true
            }
            _ => {
                debug!("Drag ignored in phase {:?}", self.phase());
                false
            }
        }
    }

    /// Follows the finger. No navigation state is touched here.
    pub fn update_drag(&mut self, translation: f32) {
        if matches!(self.state, State::Dragging) {
            self.offset = self.clamp(translation);
        }
    }

    /// Releases the gesture. `None` if no drag was active.
    pub fn end_drag(
        &mut self,
        translation: f32,
        velocity: f32,
        nav: &WeekNavigation,
    ) -> Option<GestureDecision> {
        if !matches!(self.state, State::Dragging) {
            return None;
        }
        self.offset = self.clamp(translation);
        let decision = match decide(translation, velocity) {
            Some(direction) => self.start_page(direction, nav),
            None => {
                self.snap_back();
                GestureDecision::Cancel
            }
        };
        debug!(
            "Drag released at {:.1}px, {:.1}px/s: {:?}",
            translation, velocity, decision
        );
        Some(decision)
    }

    /// The input system interrupted the gesture. Same as a sub-threshold release.
    pub fn cancel_drag(&mut self) {
        if matches!(self.state, State::Dragging) {
            debug!("Drag cancelled by input system");
            self.snap_back();
        }
    }

    /// Button or key paging. Runs the same boundary check and animation as a swipe.
    pub fn page(&mut self, direction: Direction, nav: &WeekNavigation) -> Option<GestureDecision> {
        if !matches!(self.state, State::Idle) {
            return None;
        }
        Some(self.start_page(direction, nav))
    }

    /// Advances any running animation. When a paging animation completes the
    /// navigation transition is applied exactly once and the offset jumps back
    /// to 0 in the same call, so the next render already shows the new week.
    pub fn tick(&mut self, dt: Duration, nav: &mut WeekNavigation) -> Option<NavigationOutcome> {
        let State::Animating { spring, then } = &mut self.state else {
            return None;
        };
        let done = spring.advance(dt);
        let position = spring.position();
        let then = *then;
        self.offset = self.clamp(position);
        if !done {
            return None;
        }

        self.state = State::Idle;
        self.offset = 0.0;
        then.map(|direction| nav.go(direction))
    }

    /// Week starts for the three frames: previous, current, next.
    pub fn frame_anchors(&self, nav: &WeekNavigation) -> [NaiveDate; 3] {
        nav.frame_anchors()
    }

    pub fn frames<'a>(
        &self,
        nav: &WeekNavigation,
        index: &'a MealIndex,
        today: NaiveDate,
    ) -> [WeekFrame<'a>; 3] {
        nav.frame_anchors()
            .map(|anchor| WeekFrame::build(anchor, index, today))
    }

    fn start_page(&mut self, direction: Direction, nav: &WeekNavigation) -> GestureDecision {
        if !nav.can_go(direction) {
            self.haptics.emit(HapticKind::Warning);
            self.snap_back();
            return GestureDecision::Denied(direction);
        }
        self.haptics.emit(HapticKind::ImpactLight);
        let target = match direction {
            Direction::Previous => self.frame_width,
            Direction::Next => -self.frame_width,
        };
        self.state = State::Animating {
            spring: Spring::new(SpringConfig::PAGE, self.offset, target, 0.0),
            then: Some(direction),
        };
        GestureDecision::Commit(direction)
    }

    fn snap_back(&mut self) {
        self.state = State::Animating {
            spring: Spring::new(SpringConfig::SNAP_BACK, self.offset, 0.0, 0.0),
            then: None,
        };
    }

    fn clamp(&self, value: f32) -> f32 {
        value.clamp(-self.frame_width, self.frame_width)
    }
}
