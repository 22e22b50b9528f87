use chrono::NaiveDate;
use mealprep::carousel::{Carousel, GestureDecision, Phase};
use mealprep::haptics::{HapticKind, Recorder};
use mealprep::model::MealSlot;
use mealprep::navigation::{Direction, NavigationOutcome, WeekNavigation};
use mealprep::source::{DemoSource, accessible_plans, fetch_snapshot};
use std::time::Duration;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn finish(carousel: &mut Carousel<Recorder>, nav: &mut WeekNavigation) -> Option<NavigationOutcome> {
    let mut outcome = None;
    for _ in 0..500 {
        if let Some(o) = carousel.tick(Duration::from_millis(16), nav) {
            outcome = Some(o);
        }
        if carousel.phase() == Phase::Idle {
            return outcome;
        }
    }
    panic!("carousel kept animating");
}

#[tokio::test]
async fn test_swiping_through_holiday_plan() {
    let snapshot = fetch_snapshot(&DemoSource::new(), 2).await.unwrap();
    let mut nav = WeekNavigation::for_plan(&snapshot.plan);
    let mut carousel = Carousel::new(320.0, Recorder::default());
    let today = date("2024-12-24");

    assert_eq!(nav.week_label(), "Dec 16 - Dec 22, 2024");
    assert!(!nav.can_go_previous());
    assert!(nav.can_go_next());

    // Swipe left past the threshold
    assert!(carousel.begin_drag());
    carousel.update_drag(-120.0);
    assert_eq!(nav.anchor(), date("2024-12-16"));
    let decision = carousel.end_drag(-120.0, -300.0, &nav);
    assert_eq!(decision, Some(GestureDecision::Commit(Direction::Next)));
    assert!(matches!(
        finish(&mut carousel, &mut nav),
        Some(NavigationOutcome::Moved { .. })
    ));
    assert_eq!(nav.week_label(), "Dec 23 - Dec 29, 2024");

    let frames = carousel.frames(&nav, &snapshot.index, today);
    let current = &frames[1];
    assert_eq!(current.week_start, date("2024-12-23"));
    assert!(current.rows[1].is_today);
    assert_eq!(
        current.rows[1].dinner.meal.map(|m| m.title.as_str()),
        Some("Roast Turkey")
    );
    let sandwiches = &current.rows[3].lunch;
    assert_eq!(sandwiches.slot, MealSlot::Lunch);
    assert_eq!(sandwiches.not_eating.len(), 1);

    // Fling to the last week, then hit the boundary
    carousel.begin_drag();
    carousel.end_drag(-10.0, -900.0, &nav);
    finish(&mut carousel, &mut nav);
    assert_eq!(nav.anchor(), date("2024-12-30"));
    assert!(!nav.can_go_next());

    carousel.haptics_mut().take();
    assert_eq!(
        carousel.page(Direction::Next, &nav),
        Some(GestureDecision::Denied(Direction::Next))
    );
    assert_eq!(carousel.haptics().last(), Some(HapticKind::Warning));
    assert_eq!(finish(&mut carousel, &mut nav), None);
    assert_eq!(nav.anchor(), date("2024-12-30"));
    assert_eq!(carousel.offset(), 0.0);
}

#[tokio::test]
async fn test_single_week_plan_cannot_move() {
    let snapshot = fetch_snapshot(&DemoSource::new(), 1).await.unwrap();
    let nav = WeekNavigation::for_plan(&snapshot.plan);
    assert_eq!(nav.week_label(), "Nov 11 - Nov 17, 2024");
    assert!(!nav.can_go_previous());
    assert!(!nav.can_go_next());
}

#[tokio::test]
async fn test_participant_sees_shared_plan() {
    let plans = accessible_plans(&DemoSource::new(), 3).await.unwrap();
    let ids: Vec<_> = plans.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
}
