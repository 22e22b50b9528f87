// File: ./src/model/demo.rs
// Built-in demo data set, used with `--demo` and by tests
use crate::model::item::{AccessLevel, Meal, MealPlan, MealSlot, Participant, User};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(id: u64, name: &str, email: &str, color: &str) -> User {
    User {
        id,
        email: email.to_string(),
        name: name.to_string(),
        color: Some(color.to_string()),
        created_at: None,
        updated_at: None,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(1, "Alice Johnson", "alice@example.com", "#FF6B6B"),
        user(2, "Bob Smith", "bob@example.com", "#4ECDC4"),
        user(3, "Charlie Brown", "charlie@example.com", "#45B7D1"),
        user(4, "Diana Prince", "diana@example.com", "#FFA07A"),
    ]
}

pub fn meal_plans() -> Vec<MealPlan> {
    let plan = |id, title: &str, description: &str, start, end, owner_id| MealPlan {
        id,
        title: title.to_string(),
        description: Some(description.to_string()),
        start_date: start,
        end_date: end,
        owner_id,
        created_at: None,
        updated_at: None,
    };
    vec![
        plan(
            1,
            "Weekly Family Meal Plan",
            "Our family meal plan for the week",
            date(2024, 11, 11),
            date(2024, 11, 17),
            1,
        ),
        plan(
            2,
            "Holiday Meal Planning",
            "Special meals for the holiday season",
            date(2024, 12, 20),
            date(2024, 12, 31),
            1,
        ),
        plan(
            3,
            "Roommate Meal Schedule",
            "Shared meal planning with roommates",
            date(2024, 11, 18),
            date(2024, 11, 24),
            2,
        ),
    ]
}

pub fn meals() -> Vec<Meal> {
    let meal = |id, title: &str, day, plan, chef, slot, not_eating: &[u64]| Meal {
        id,
        title: title.to_string(),
        date: day,
        meal_plan_id: plan,
        chef_id: chef,
        slot,
        not_eating_users: not_eating.to_vec(),
        created_at: None,
        updated_at: None,
    };
    vec![
        meal(1, "Spaghetti Bolognese", date(2024, 11, 11), 1, 1, MealSlot::Dinner, &[]),
        meal(2, "Grilled Chicken Salad", date(2024, 11, 12), 1, 2, MealSlot::Lunch, &[3]),
        meal(3, "Vegetarian Stir Fry", date(2024, 11, 13), 1, 3, MealSlot::Dinner, &[]),
        meal(4, "Taco Tuesday", date(2024, 11, 14), 1, 1, MealSlot::Dinner, &[]),
        meal(5, "Pizza Night", date(2024, 11, 15), 1, 2, MealSlot::Dinner, &[4]),
        meal(6, "BBQ Ribs", date(2024, 11, 18), 3, 2, MealSlot::Dinner, &[]),
        meal(7, "Roast Turkey", date(2024, 12, 24), 2, 1, MealSlot::Dinner, &[]),
        meal(8, "Leftover Sandwiches", date(2024, 12, 26), 2, 4, MealSlot::Lunch, &[2]),
        meal(9, "New Year Fondue", date(2024, 12, 31), 2, 3, MealSlot::Dinner, &[]),
    ]
}

pub fn participants() -> Vec<Participant> {
    let p = |id, access_level, user_id, meal_plan_id| Participant {
        id,
        access_level,
        user_id,
        meal_plan_id,
        created_at: None,
        updated_at: None,
    };
    vec![
        p(1, AccessLevel::Admin, 1, 1),
        p(2, AccessLevel::Viewer, 2, 1),
        p(3, AccessLevel::Viewer, 3, 1),
        p(4, AccessLevel::Admin, 1, 2),
        p(5, AccessLevel::Admin, 2, 3),
        p(6, AccessLevel::Viewer, 3, 3),
    ]
}
