use crate::carousel::{Carousel, GestureDecision, Phase};
use crate::haptics::{HapticKind, Recorder};
use crate::model::{MealPlanId, MealSlot};
use crate::navigation::{Direction, NavigationOutcome, WeekNavigation};
use crate::source::PlanSnapshot;
use crate::tui::action::AppEvent;
use chrono::NaiveDate;
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::info;

/// Logical pixels per terminal column in the carousel area.
pub const PX_PER_COLUMN: f32 = 8.0;
/// Terminal rows per day in the grid.
pub const ROWS_PER_DAY: u16 = 2;
/// Width of the date prefix inside a frame.
pub const DATE_GUTTER: u16 = 3;

const VELOCITY_WINDOW: Duration = Duration::from_millis(100);
const FLASH_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Ready,
    NotFound(MealPlanId),
    Error(String),
}

#[derive(Debug, Clone)]
struct DragTracker {
    start_column: u16,
    moved: bool,
    samples: VecDeque<(Instant, f32)>,
}

impl DragTracker {
    fn velocity(&self) -> f32 {
        match (self.samples.front(), self.samples.back()) {
            (Some((t0, x0)), Some((t1, x1))) => {
                let dt = t1.duration_since(*t0).as_secs_f32();
                if dt > 0.0 { (x1 - x0) / dt } else { 0.0 }
            }
            _ => 0.0,
        }
    }

    fn record(&mut self, at: Instant, translation: f32) {
        self.samples.push_back((at, translation));
        while let Some((t, _)) = self.samples.front() {
            if at.duration_since(*t) > VELOCITY_WINDOW && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

pub struct AppState {
    pub screen: Screen,
    pub snapshot: Option<PlanSnapshot>,
    pub nav: WeekNavigation,
    pub carousel: Carousel<Recorder>,
    pub today: NaiveDate,
    pub cursor_day: usize,
    pub cursor_slot: MealSlot,
    pub message: String,
    pub flash: Option<(HapticKind, Instant)>,
    /// Carousel area from the last draw, used for hit testing.
    pub carousel_area: Rect,
    drag: Option<DragTracker>,
    /// Plan change that arrived mid-gesture, applied once the carousel is idle.
    deferred: Option<AppEvent>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            screen: Screen::Loading,
            snapshot: None,
            nav: WeekNavigation::new(today),
            carousel: Carousel::new(PX_PER_COLUMN, Recorder::default()),
            today,
            cursor_day: 0,
            cursor_slot: MealSlot::Lunch,
            message: "Loading meal plan...".to_string(),
            flash: None,
            carousel_area: Rect::default(),
            drag: None,
            deferred: None,
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        let changes_plan = matches!(event, AppEvent::Loaded(_) | AppEvent::NotFound(_));
        if changes_plan && self.carousel.phase() != Phase::Idle {
            self.deferred = Some(event);
            return;
        }
        match event {
            AppEvent::Loaded(snapshot) => {
                let previous = self.nav.anchor();
                let same_plan = self.nav.plan_id() == Some(snapshot.plan.id);
                self.nav.initialize(&snapshot.plan);
                if same_plan {
                    // Reload keeps the displayed week when it is still inside the plan
                    while self.nav.anchor() < previous && self.nav.can_go_next() {
                        self.nav.go_next();
                    }
                }
                self.message = format!(
                    "{}: {} meals",
                    snapshot.plan.title,
                    snapshot.index.meal_count()
                );
                self.snapshot = Some(*snapshot);
                self.screen = Screen::Ready;
            }
            AppEvent::NotFound(id) => {
                self.nav.clear();
                self.snapshot = None;
                self.screen = Screen::NotFound(id);
                self.message = "Meal plan not found".to_string();
            }
            AppEvent::Error(msg) => {
                // Keep showing stale data on a failed reload
                if self.snapshot.is_none() {
                    self.screen = Screen::Error(msg.clone());
                }
                self.message = format!("Error: {}", msg);
            }
            AppEvent::Status(msg) => {
                self.message = msg;
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.screen == Screen::Ready
    }

    /// Called when the carousel area is laid out. Frame width follows the
    /// terminal width, but never while an animation is running.
    pub fn set_carousel_area(&mut self, area: Rect) {
        self.carousel_area = area;
        self.carousel
            .set_frame_width(f32::from(area.width.max(1)) * PX_PER_COLUMN);
    }

    fn px_per_column(&self) -> f32 {
        self.carousel.frame_width() / f32::from(self.carousel_area.width.max(1))
    }

    /// Offset of the carousel in whole terminal columns.
    pub fn offset_columns(&self) -> i32 {
        (self.carousel.offset() / self.px_per_column()).round() as i32
    }

    pub fn page(&mut self, direction: Direction) -> Option<GestureDecision> {
        if !self.is_ready() {
            return None;
        }
        let decision = self.carousel.page(direction, &self.nav);
        self.note_decision(decision);
        self.drain_feedback(Instant::now());
        decision
    }

    pub fn tick(&mut self, dt: Duration) -> Option<NavigationOutcome> {
        let outcome = self.carousel.tick(dt, &mut self.nav);
        if let Some(NavigationOutcome::Moved { .. }) = outcome {
            self.message = self.nav.week_label();
        }
        if self.carousel.phase() == Phase::Idle
            && let Some(event) = self.deferred.take()
        {
            self.apply(event);
        }
        let now = Instant::now();
        self.drain_feedback(now);
        if let Some((_, at)) = self.flash
            && now.duration_since(at) > FLASH_DURATION
        {
            self.flash = None;
        }
        outcome
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let day = (self.cursor_day as i32 + delta).clamp(0, 6);
        self.cursor_day = day as usize;
    }

    pub fn toggle_slot(&mut self) {
        self.cursor_slot = match self.cursor_slot {
            MealSlot::Lunch => MealSlot::Dinner,
            MealSlot::Dinner => MealSlot::Lunch,
        };
    }

    pub fn selected_cell(&self) -> (NaiveDate, MealSlot) {
        let dates = crate::week::week_dates(self.nav.anchor(), crate::week::WeekStart::Monday);
        (dates[self.cursor_day], self.cursor_slot)
    }

    /// Enter key on the highlighted cell.
    pub fn press_selected(&mut self) -> Option<(NaiveDate, MealSlot)> {
        if !self.is_ready() || self.carousel.is_animating() {
            return None;
        }
        let (date, slot) = self.selected_cell();
        self.on_meal_press(date, slot);
        Some((date, slot))
    }

    pub fn on_meal_press(&mut self, date: NaiveDate, slot: MealSlot) {
        let title = self
            .snapshot
            .as_ref()
            .and_then(|s| s.index.meal_at(date, slot))
            .map(|m| m.title.clone());
        info!("Meal cell pressed: {} {} ({:?})", date, slot, title);
        self.message = match title {
            Some(title) => format!("{} {}: {}", date.format("%a %b %-d"), slot, title),
            None => format!("{} {}: no meal planned", date.format("%a %b %-d"), slot),
        };
    }

    /// Maps a terminal position to a cell of the displayed week.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(usize, MealSlot)> {
        let area = self.carousel_area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let day = usize::from((row - area.y) / ROWS_PER_DAY);
        let local = column - area.x;
        if day > 6 || local < DATE_GUTTER {
            return None;
        }
        let cell_width = area.width.saturating_sub(DATE_GUTTER + 1) / 2;
        let inner = local - DATE_GUTTER;
        if inner < cell_width {
            Some((day, MealSlot::Lunch))
        } else if inner > cell_width {
            Some((day, MealSlot::Dinner))
        } else {
            None
        }
    }

    pub fn pointer_down(&mut self, column: u16, row: u16, at: Instant) {
        if !self.is_ready() || !self.in_area(column, row) {
            return;
        }
        if self.carousel.begin_drag() {
            let mut samples = VecDeque::new();
            samples.push_back((at, 0.0));
            self.drag = Some(DragTracker {
                start_column: column,
                moved: false,
                samples,
            });
        }
    }

    pub fn pointer_move(&mut self, column: u16, at: Instant) {
        let px = self.px_per_column();
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let translation = (f32::from(column) - f32::from(drag.start_column)) * px;
        drag.moved |= column != drag.start_column;
        drag.record(at, translation);
        self.carousel.update_drag(translation);
    }

    /// Ends the gesture. A release without movement presses the cell under
    /// the pointer.
    pub fn pointer_up(
        &mut self,
        column: u16,
        row: u16,
        at: Instant,
    ) -> Option<(NaiveDate, MealSlot)> {
        let Some(mut drag) = self.drag.take() else {
            // Release whose press never reached us
            self.carousel.cancel_drag();
            return None;
        };
        let px = self.px_per_column();
        let translation = (f32::from(column) - f32::from(drag.start_column)) * px;
        drag.moved |= column != drag.start_column;

        if !drag.moved {
            self.carousel.cancel_drag();
            let (day, slot) = self.cell_at(column, row)?;
            self.cursor_day = day;
            self.cursor_slot = slot;
            let (date, slot) = self.selected_cell();
            self.on_meal_press(date, slot);
            return Some((date, slot));
        }

        drag.record(at, translation);
        let velocity = drag.velocity();
        let decision = self.carousel.end_drag(translation, velocity, &self.nav);
        self.note_decision(decision);
        self.drain_feedback(at);
        None
    }

    /// Terminal focus loss or similar interruption.
    pub fn pointer_cancel(&mut self) {
        if self.drag.take().is_some() {
            self.carousel.cancel_drag();
        }
    }

    fn in_area(&self, column: u16, row: u16) -> bool {
        let area = self.carousel_area;
        column >= area.x && row >= area.y && column < area.right() && row < area.bottom()
    }

    fn note_decision(&mut self, decision: Option<GestureDecision>) {
        if let Some(GestureDecision::Denied(direction)) = decision {
            let edge = match direction {
                Direction::Previous => "first",
                Direction::Next => "last",
            };
            self.message = format!("Already at the {} week of the plan", edge);
        }
    }

    fn drain_feedback(&mut self, now: Instant) {
        if let Some(kind) = self.carousel.haptics_mut().take().pop() {
            self.flash = Some((kind, now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::MealIndex;
    use crate::model::demo;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot(plan_id: MealPlanId) -> PlanSnapshot {
        let plan = demo::meal_plans()
            .into_iter()
            .find(|p| p.id == plan_id)
            .unwrap();
        PlanSnapshot {
            index: MealIndex::for_plan(plan_id, demo::meals(), demo::users()),
            participants: demo::participants()
                .into_iter()
                .filter(|p| p.meal_plan_id == plan_id)
                .collect(),
            plan,
        }
    }

    fn ready_state(plan_id: MealPlanId) -> AppState {
        let mut state = AppState::new(date("2024-11-13"));
        state.apply(AppEvent::Loaded(Box::new(snapshot(plan_id))));
        state.set_carousel_area(Rect::new(10, 4, 43, 14));
        state
    }

    fn settle(state: &mut AppState) -> Option<NavigationOutcome> {
        for _ in 0..400 {
            if let Some(outcome) = state.tick(Duration::from_millis(16)) {
                return Some(outcome);
            }
            if !state.carousel.is_animating() {
                return None;
            }
        }
        panic!("animation did not finish");
    }

    #[test]
    fn loaded_plan_starts_on_its_first_week() {
        let state = ready_state(2);
        assert!(state.is_ready());
        assert_eq!(state.nav.anchor(), date("2024-12-16"));
    }

    #[test]
    fn not_found_clears_navigation() {
        let mut state = ready_state(1);
        state.apply(AppEvent::NotFound(9));
        assert_eq!(state.screen, Screen::NotFound(9));
        assert!(state.page(Direction::Next).is_none());
    }

    #[test]
    fn error_after_load_keeps_data() {
        let mut state = ready_state(1);
        state.apply(AppEvent::Error("offline".to_string()));
        assert!(state.is_ready());
        assert!(state.message.contains("offline"));
    }

    #[test]
    fn click_without_movement_presses_cell() {
        let mut state = ready_state(1);
        let now = Instant::now();
        // Rows 6-7 hold Tuesday; columns 13.. are the lunch cell
        state.pointer_down(14, 6, now);
        let pressed = state.pointer_up(14, 6, now);
        assert_eq!(pressed, Some((date("2024-11-12"), MealSlot::Lunch)));
        assert!(state.message.contains("Grilled Chicken Salad"));
    }

    #[test]
    fn drag_left_pages_to_next_week() {
        let mut state = ready_state(2);
        let start = Instant::now();
        state.pointer_down(40, 6, start);
        state.pointer_move(35, start + Duration::from_millis(50));
        state.pointer_move(28, start + Duration::from_millis(100));
        assert!(state.pointer_up(28, 6, start + Duration::from_millis(150)).is_none());
        assert!(state.carousel.is_animating());
        let outcome = settle(&mut state);
        assert!(matches!(outcome, Some(NavigationOutcome::Moved { .. })));
        assert_eq!(state.nav.anchor(), date("2024-12-23"));
    }

    #[test]
    fn small_slow_drag_snaps_back() {
        let mut state = ready_state(2);
        let start = Instant::now();
        state.pointer_down(40, 6, start);
        state.pointer_move(39, start + Duration::from_millis(400));
        state.pointer_up(39, 6, start + Duration::from_millis(800));
        assert_eq!(settle(&mut state), None);
        assert_eq!(state.nav.anchor(), date("2024-12-16"));
        assert_eq!(state.carousel.offset(), 0.0);
    }

    #[test]
    fn paging_past_the_plan_flashes_warning() {
        let mut state = ready_state(1);
        let decision = state.page(Direction::Next);
        assert_eq!(decision, Some(GestureDecision::Denied(Direction::Next)));
        assert_eq!(state.flash.map(|(k, _)| k), Some(HapticKind::Warning));
        assert!(state.message.contains("last week"));
    }

    #[test]
    fn cursor_stays_in_week() {
        let mut state = ready_state(1);
        state.move_cursor(-3);
        assert_eq!(state.cursor_day, 0);
        state.move_cursor(10);
        assert_eq!(state.cursor_day, 6);
        state.toggle_slot();
        assert_eq!(state.selected_cell(), (date("2024-11-17"), MealSlot::Dinner));
    }

    #[test]
    fn reload_during_drag_waits_for_idle() {
        let mut state = ready_state(1);
        assert!(!state.nav.can_go_next());
        let start = Instant::now();
        state.pointer_down(40, 6, start);
        assert_eq!(state.carousel.phase(), Phase::Dragging);

        let mut longer = snapshot(1);
        longer.plan.end_date = date("2024-12-31");
        state.apply(AppEvent::Loaded(Box::new(longer)));
        assert!(!state.nav.can_go_next());

        state.pointer_move(39, start + Duration::from_millis(400));
        state.pointer_up(39, 6, start + Duration::from_millis(800));
        assert!(!state.nav.can_go_next());
        settle(&mut state);
        state.tick(Duration::from_millis(16));
        assert!(state.nav.can_go_next());
        assert_eq!(
            state.snapshot.as_ref().map(|s| s.plan.end_date),
            Some(date("2024-12-31"))
        );
    }

    #[test]
    fn reload_keeps_displayed_week() {
        let mut state = ready_state(2);
        state.page(Direction::Next);
        settle(&mut state);
        assert_eq!(state.nav.anchor(), date("2024-12-23"));
        state.apply(AppEvent::Loaded(Box::new(snapshot(2))));
        assert_eq!(state.nav.anchor(), date("2024-12-23"));
    }
}
