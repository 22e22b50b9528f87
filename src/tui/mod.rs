pub mod action;
pub mod state;
pub mod view;

use crate::client::{ApiClient, ApiError};
use crate::config::Config;
use crate::model::MealPlanId;
use crate::navigation::Direction;
use crate::source::{DemoSource, MealPlanSource, fetch_snapshot};
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::AppState;
use crate::tui::view::draw;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

const IDLE_POLL: Duration = Duration::from_millis(50);
const ANIMATION_POLL: Duration = Duration::from_millis(16);

pub async fn run(config: Config, plan_id: MealPlanId) -> Result<()> {
    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, event_rx) = mpsc::channel(10);

    // SPAWN ACTOR
    if config.demo {
        info!("Using built-in demo data");
        tokio::spawn(data_actor(DemoSource::new(), plan_id, action_rx, event_tx));
    } else {
        let client = ApiClient::new(
            &config.api_base_url,
            config.access_token.as_deref(),
            config.allow_insecure_certs,
        )?
        .with_timeout(config.request_timeout());
        info!("Using API at {}", client.base_url());
        tokio::spawn(data_actor(client, plan_id, action_rx, event_tx));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let today = chrono::Local::now().date_naive();
    let result = ui_loop(&mut terminal, AppState::new(today), action_tx, event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn data_actor<S: MealPlanSource + 'static>(
    source: S,
    plan_id: MealPlanId,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    load(&source, plan_id, &event_tx).await;

    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            Action::Reload => {
                let _ = event_tx
                    .send(AppEvent::Status("Reloading...".to_string()))
                    .await;
                load(&source, plan_id, &event_tx).await;
            }
        }
    }
}

async fn load<S: MealPlanSource>(source: &S, plan_id: MealPlanId, event_tx: &mpsc::Sender<AppEvent>) {
    let event = match fetch_snapshot(source, plan_id).await {
        Ok(snapshot) => AppEvent::Loaded(Box::new(snapshot)),
        Err(ApiError::NotFound(_)) => AppEvent::NotFound(plan_id),
        Err(e) => {
            error!("Loading plan {} failed: {}", plan_id, e);
            AppEvent::Error(e.to_string())
        }
    };
    let _ = event_tx.send(event).await;
}

async fn ui_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app_state: AppState,
    action_tx: mpsc::Sender<Action>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        while let Ok(event) = event_rx.try_recv() {
            app_state.apply(event);
        }

        let timeout = if app_state.carousel.is_animating() {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };

        if event::poll(timeout)? {
            let event = event::read()?;
            match event {
                Event::Mouse(_) | Event::FocusLost => {
                    handle_pointer(&mut app_state, &event, Instant::now());
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        let _ = action_tx.send(Action::Quit).await;
                        break;
                    }
                    KeyCode::Char('h') | KeyCode::Left => {
                        app_state.page(Direction::Previous);
                    }
                    KeyCode::Char('l') | KeyCode::Right => {
                        app_state.page(Direction::Next);
                    }
                    KeyCode::Down | KeyCode::Char('j') => app_state.move_cursor(1),
                    KeyCode::Up | KeyCode::Char('k') => app_state.move_cursor(-1),
                    KeyCode::Tab => app_state.toggle_slot(),
                    KeyCode::Enter => {
                        app_state.press_selected();
                    }
                    KeyCode::Char('r') => {
                        let _ = action_tx.send(Action::Reload).await;
                    }
                    _ => {}
                },
                _ => {} // Resize is picked up by the next draw
            }
        }

        let now = Instant::now();
        app_state.tick(now.duration_since(last_tick));
        last_tick = now;
    }
    Ok(())
}

/// Routes mouse and focus events to the drag gesture. Only the left button
/// drives it; any other release or losing focus cancels a drag in progress.
fn handle_pointer(app_state: &mut AppState, event: &Event, now: Instant) {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                app_state.pointer_down(mouse.column, mouse.row, now)
            }
            MouseEventKind::Drag(MouseButton::Left) => app_state.pointer_move(mouse.column, now),
            MouseEventKind::Up(MouseButton::Left) => {
                app_state.pointer_up(mouse.column, mouse.row, now);
            }
            MouseEventKind::Up(_) | MouseEventKind::Down(_) => app_state.pointer_cancel(),
            _ => {}
        },
        Event::FocusLost => app_state.pointer_cancel(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::Phase;
    use crate::lookup::MealIndex;
    use crate::model::demo;
    use crate::source::PlanSnapshot;
    use chrono::NaiveDate;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::layout::Rect;

    fn ready_state() -> AppState {
        let plan = demo::meal_plans().remove(1);
        let mut state = AppState::new(NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
        state.apply(AppEvent::Loaded(Box::new(PlanSnapshot {
            index: MealIndex::for_plan(plan.id, demo::meals(), demo::users()),
            participants: Vec::new(),
            plan,
        })));
        state.set_carousel_area(Rect::new(10, 4, 43, 14));
        state
    }

    fn mouse(kind: MouseEventKind, column: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row: 6,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut state = ready_state();
        let now = Instant::now();
        handle_pointer(&mut state, &mouse(MouseEventKind::Down(MouseButton::Left), 40), now);
        handle_pointer(&mut state, &mouse(MouseEventKind::Drag(MouseButton::Left), 20), now);
        assert_eq!(state.carousel.phase(), Phase::Dragging);

        handle_pointer(&mut state, &Event::FocusLost, now);
        assert_eq!(state.carousel.phase(), Phase::Animating);
        while state.carousel.is_animating() {
            assert!(state.tick(Duration::from_millis(16)).is_none());
        }
        assert_eq!(state.carousel.offset(), 0.0);
    }

    #[test]
    fn other_button_release_cancels_drag() {
        let mut state = ready_state();
        let now = Instant::now();
        let anchor = state.nav.anchor();
        handle_pointer(&mut state, &mouse(MouseEventKind::Down(MouseButton::Left), 40), now);
        handle_pointer(&mut state, &mouse(MouseEventKind::Drag(MouseButton::Left), 20), now);
        handle_pointer(&mut state, &mouse(MouseEventKind::Up(MouseButton::Right), 20), now);
        // A later left release is not a gesture end anymore
        handle_pointer(&mut state, &mouse(MouseEventKind::Up(MouseButton::Left), 20), now);
        while state.carousel.is_animating() {
            state.tick(Duration::from_millis(16));
        }
        assert_eq!(state.nav.anchor(), anchor);
    }
}
