// File: ./src/lookup.rs
// (date, slot) -> meal index, plus user resolution for chef / not-eating badges
use crate::model::{Meal, MealPlanId, MealSlot, Participant, User, UserId};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct MealIndex {
    meals: HashMap<(NaiveDate, MealSlot), Meal>,
    users: HashMap<UserId, User>,
}

impl MealIndex {
    /// Builds the index from meals already filtered to one plan.
    /// If two meals share a (date, slot), the later one wins.
    pub fn new(meals: Vec<Meal>, users: Vec<User>) -> Self {
        let mut by_slot = HashMap::with_capacity(meals.len());
        for meal in meals {
            if let Some(old) = by_slot.insert((meal.date, meal.slot), meal) {
                warn!(
                    "Duplicate meal for {} {}: {} replaced",
                    old.date, old.slot, old.id
                );
            }
        }

        let mut by_id = HashMap::with_capacity(users.len());
        for user in users {
            // First occurrence wins, matching a linear scan
            if let Entry::Vacant(slot) = by_id.entry(user.id) {
                slot.insert(user);
            }
        }

        debug!(
            "Indexed {} meals and {} users",
            by_slot.len(),
            by_id.len()
        );
        Self {
            meals: by_slot,
            users: by_id,
        }
    }

    /// Same as [`MealIndex::new`] but drops meals belonging to other plans first.
    pub fn for_plan(plan_id: MealPlanId, meals: Vec<Meal>, users: Vec<User>) -> Self {
        let meals = meals
            .into_iter()
            .filter(|m| m.meal_plan_id == plan_id)
            .collect();
        Self::new(meals, users)
    }

    pub fn meal_at(&self, date: NaiveDate, slot: MealSlot) -> Option<&Meal> {
        self.meals.get(&(date, slot))
    }

    pub fn resolve_user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn chef(&self, meal: &Meal) -> Option<&User> {
        self.resolve_user(meal.chef_id)
    }

    /// Resolved users in the meal's order. Ids without a user are skipped.
    pub fn not_eating_users(&self, meal: &Meal) -> Vec<&User> {
        meal.not_eating_users
            .iter()
            .filter_map(|id| {
                let user = self.resolve_user(*id);
                if user.is_none() {
                    debug!("Meal {} lists unknown user {}", meal.id, id);
                }
                user
            })
            .collect()
    }

    /// Users behind participant rows, in participant order. Unknown ids are skipped.
    pub fn participant_users(&self, participants: &[Participant]) -> Vec<&User> {
        participants
            .iter()
            .filter_map(|p| self.resolve_user(p.user_id))
            .collect()
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }
}
