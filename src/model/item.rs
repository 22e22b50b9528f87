// File: ./src/model/item.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

pub type UserId = u64;
pub type MealPlanId = u64;
pub type MealId = u64;

/// The two scheduling positions of a day. On the wire this is the integer
/// `meal_type` field: 0 for dinner, 1 for lunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MealSlot {
    Lunch,
    Dinner,
}

impl MealSlot {
    /// Column order in the grid.
    pub const ALL: [MealSlot; 2] = [MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl TryFrom<u8> for MealSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MealSlot::Dinner),
            1 => Ok(MealSlot::Lunch),
            other => Err(format!("meal_type must be 0 or 1, got {}", other)),
        }
    }
}

impl From<MealSlot> for u8 {
    fn from(slot: MealSlot) -> u8 {
        match slot {
            MealSlot::Dinner => 0,
            MealSlot::Lunch => 1,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Meal {
    #[validate(range(min = 1))]
    pub id: MealId,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    #[validate(range(min = 1))]
    pub meal_plan_id: MealPlanId,
    #[validate(range(min = 1))]
    pub chef_id: UserId,
    #[serde(rename = "meal_type")]
    pub slot: MealSlot,
    #[serde(default)]
    #[validate(custom(function = "positive_ids"))]
    pub not_eating_users: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    #[validate(range(min = 1))]
    pub id: UserId,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    /// Usually a hex color such as "#FF6B6B". Free-form on the wire;
    /// anything that does not parse gets a generated color when rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "ordered_range"))]
pub struct MealPlan {
    #[validate(range(min = 1))]
    pub id: MealPlanId,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    #[validate(range(min = 1))]
    pub owner_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Viewer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Participant {
    #[validate(range(min = 1))]
    pub id: u64,
    pub access_level: AccessLevel,
    #[validate(range(min = 1))]
    pub user_id: UserId,
    #[validate(range(min = 1))]
    pub meal_plan_id: MealPlanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn positive_ids(ids: &[UserId]) -> Result<(), ValidationError> {
    if ids.contains(&0) {
        return Err(ValidationError::new("positive_ids"));
    }
    Ok(())
}

fn ordered_range(plan: &MealPlan) -> Result<(), ValidationError> {
    if plan.start_date > plan.end_date {
        return Err(ValidationError::new("start_date_after_end_date"));
    }
    Ok(())
}

/// Strict `YYYY-MM-DD` (de)serialization for date-only fields.
pub(crate) mod iso_date {
    use crate::week::{format_iso, parse_iso};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_iso(&raw).map_err(D::Error::custom)
    }
}
