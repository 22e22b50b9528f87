use crate::model::MealPlanId;
use crate::source::PlanSnapshot;

/// Requests from the UI loop to the data task.
#[derive(Debug)]
pub enum Action {
    Reload,
    Quit,
}

/// Results from the data task back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    Loaded(Box<PlanSnapshot>),
    NotFound(MealPlanId),
    Error(String),
    Status(String),
}
