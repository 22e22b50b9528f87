// File: ./src/navigation.rs
// Owns the displayed week and gates moves against the plan's date range
use crate::model::{MealPlan, MealPlanId};
use crate::week::{self, WeekStart};
use chrono::NaiveDate;
use tracing::{info, warn};

const STARTS_ON: WeekStart = WeekStart::Monday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Moved { from: NaiveDate, to: NaiveDate },
    /// The move would leave the plan's range (or there is no plan). Not an error.
    Denied(Direction),
}

impl NavigationOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, NavigationOutcome::Denied(_))
    }
}

/// Single owner of the week anchor. The anchor is always the Monday of the
/// displayed week.
#[derive(Debug, Clone)]
pub struct WeekNavigation {
    anchor: NaiveDate,
    plan: Option<PlanRange>,
}

#[derive(Debug, Clone, Copy)]
struct PlanRange {
    id: MealPlanId,
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekNavigation {
    /// Starts on the week containing `today`, with navigation disabled until
    /// a plan is supplied.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            anchor: week::week_start(today, STARTS_ON),
            plan: None,
        }
    }

    pub fn for_plan(plan: &MealPlan) -> Self {
        let mut nav = Self::new(plan.start_date);
        nav.initialize(plan);
        nav
    }

    /// Resets the anchor to the first week of `plan`. Any previous state is discarded.
    pub fn initialize(&mut self, plan: &MealPlan) {
        self.anchor = week::week_start(plan.start_date, STARTS_ON);
        self.plan = Some(PlanRange {
            id: plan.id,
            start: plan.start_date,
            end: plan.end_date,
        });
        info!(
            "Week navigation initialised for plan {} at {}",
            plan.id, self.anchor
        );
    }

    /// Drops the plan, which disables navigation in both directions.
    pub fn clear(&mut self) {
        self.plan = None;
    }

    pub fn plan_id(&self) -> Option<MealPlanId> {
        self.plan.map(|p| p.id)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week_start(&self) -> NaiveDate {
        week::week_start(self.anchor, STARTS_ON)
    }

    pub fn week_end(&self) -> NaiveDate {
        week::week_end(self.anchor, STARTS_ON)
    }

    pub fn week_days(&self) -> [String; 7] {
        week::week_days(self.anchor, STARTS_ON)
    }

    pub fn week_label(&self) -> String {
        week::week_label(self.anchor, STARTS_ON)
    }

    pub fn can_go_previous(&self) -> bool {
        match self.plan {
            Some(plan) => self.week_start() > week::week_start(plan.start, STARTS_ON),
            None => false,
        }
    }

    pub fn can_go_next(&self) -> bool {
        match self.plan {
            Some(plan) => self.week_end() < plan.end,
            None => false,
        }
    }

    pub fn can_go(&self, direction: Direction) -> bool {
        match direction {
            Direction::Previous => self.can_go_previous(),
            Direction::Next => self.can_go_next(),
        }
    }

    pub fn go_previous(&mut self) -> NavigationOutcome {
        self.go(Direction::Previous)
    }

    pub fn go_next(&mut self) -> NavigationOutcome {
        self.go(Direction::Next)
    }

    pub fn go(&mut self, direction: Direction) -> NavigationOutcome {
        if !self.can_go(direction) {
            warn!("Navigation {:?} denied at week {}", direction, self.anchor);
            return NavigationOutcome::Denied(direction);
        }
        let from = self.anchor;
        self.anchor = match direction {
            Direction::Previous => week::previous_week(from, STARTS_ON),
            Direction::Next => week::next_week(from, STARTS_ON),
        };
        info!("Moved {:?} from {} to {}", direction, from, self.anchor);
        NavigationOutcome::Moved {
            from,
            to: self.anchor,
        }
    }

    /// Week starts for the carousel frames: previous, current, next.
    pub fn frame_anchors(&self) -> [NaiveDate; 3] {
        [
            week::previous_week(self.anchor, STARTS_ON),
            self.week_start(),
            week::next_week(self.anchor, STARTS_ON),
        ]
    }
}
