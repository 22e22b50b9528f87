// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod demo;
pub mod item;

// Re-export types so code can use `crate::model::Meal` directly
pub use item::{
    AccessLevel, Meal, MealId, MealPlan, MealPlanId, MealSlot, Participant, User, UserId,
};
