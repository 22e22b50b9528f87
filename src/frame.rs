// File: ./src/frame.rs
// One week of the grid: 7 day rows x (lunch, dinner) cells
use crate::lookup::MealIndex;
use crate::model::{Meal, MealSlot, User};
use crate::week::{self, WeekStart};
use chrono::NaiveDate;

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq)]
pub struct MealCell<'a> {
    pub date: NaiveDate,
    pub slot: MealSlot,
    /// `None` renders as the empty-slot marker.
    pub meal: Option<&'a Meal>,
    pub chef: Option<&'a User>,
    pub not_eating: Vec<&'a User>,
}

impl MealCell<'_> {
    pub fn is_empty(&self) -> bool {
        self.meal.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRow<'a> {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub is_today: bool,
    pub lunch: MealCell<'a>,
    pub dinner: MealCell<'a>,
}

impl<'a> DayRow<'a> {
    pub fn cell(&self, slot: MealSlot) -> &MealCell<'a> {
        match slot {
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekFrame<'a> {
    pub week_start: NaiveDate,
    pub rows: [DayRow<'a>; 7],
}

impl<'a> WeekFrame<'a> {
    /// Stateless: recomputed on every anchor or data change. `today` is the
    /// caller's local calendar date, used only for the highlight.
    pub fn build(anchor: NaiveDate, index: &'a MealIndex, today: NaiveDate) -> Self {
        let dates = week::week_dates(anchor, WeekStart::Monday);
        let rows = std::array::from_fn(|i| {
            let date = dates[i];
            DayRow {
                date,
                day_name: DAY_NAMES[i],
                is_today: date == today,
                lunch: build_cell(index, date, MealSlot::Lunch),
                dinner: build_cell(index, date, MealSlot::Dinner),
            }
        });
        Self {
            week_start: dates[0],
            rows,
        }
    }

    pub fn cell(&self, day: usize, slot: MealSlot) -> Option<&MealCell<'a>> {
        self.rows.get(day).map(|row| row.cell(slot))
    }

    pub fn meal_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| usize::from(!r.lunch.is_empty()) + usize::from(!r.dinner.is_empty()))
            .sum()
    }
}

fn build_cell(index: &MealIndex, date: NaiveDate, slot: MealSlot) -> MealCell<'_> {
    let meal = index.meal_at(date, slot);
    MealCell {
        date,
        slot,
        meal,
        chef: meal.and_then(|m| index.chef(m)),
        not_eating: meal.map(|m| index.not_eating_users(m)).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demo;
    use crate::week::parse_iso;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    #[test]
    fn builds_full_week_grid() {
        let index = MealIndex::for_plan(1, demo::meals(), demo::users());
        let frame = WeekFrame::build(d("2024-11-14"), &index, d("2024-11-13"));

        assert_eq!(frame.week_start, d("2024-11-11"));
        assert_eq!(frame.rows[0].day_name, "Mon");
        assert_eq!(frame.rows[6].date, d("2024-11-17"));
        assert_eq!(frame.meal_count(), 5);

        let tuesday = &frame.rows[1];
        assert_eq!(tuesday.lunch.meal.map(|m| m.id), Some(2));
        assert_eq!(tuesday.lunch.chef.map(|u| u.name.as_str()), Some("Bob Smith"));
        assert_eq!(tuesday.lunch.not_eating.len(), 1);
        assert!(tuesday.dinner.is_empty());
        assert!(tuesday.dinner.chef.is_none());
        assert!(tuesday.dinner.not_eating.is_empty());
    }

    #[test]
    fn highlights_only_today() {
        let index = MealIndex::default();
        let frame = WeekFrame::build(d("2024-11-11"), &index, d("2024-11-13"));
        let flagged: Vec<usize> = frame
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_today)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(flagged, [2]);

        let other_week = WeekFrame::build(d("2024-11-18"), &index, d("2024-11-13"));
        assert!(other_week.rows.iter().all(|r| !r.is_today));
    }

    #[test]
    fn empty_index_gives_empty_cells() {
        let index = MealIndex::default();
        let frame = WeekFrame::build(d("2024-11-11"), &index, d("2000-01-01"));
        assert_eq!(frame.meal_count(), 0);
        assert!(frame.cell(3, MealSlot::Lunch).unwrap().is_empty());
        assert!(frame.cell(7, MealSlot::Lunch).is_none());
    }
}
