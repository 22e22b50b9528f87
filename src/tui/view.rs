use crate::color_utils::{to_rgb8, user_color};
use crate::frame::{MealCell, WeekFrame};
use crate::haptics::HapticKind;
use crate::model::{MealSlot, User};
use crate::tui::state::{AppState, DATE_GUTTER, ROWS_PER_DAY, Screen};
use crate::week::format_range;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_PARTICIPANT_BADGES: usize = 5;

/// One entry per terminal column.
type StyledRow = Vec<(char, Style)>;

/// Right half of a double-width character.
const CONTINUATION: char = '\0';

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    match state.screen.clone() {
        Screen::Loading => draw_notice(f, v_chunks[0], "Loading meal plan...", Color::Cyan),
        Screen::NotFound(id) => draw_notice(
            f,
            v_chunks[0],
            &format!("Meal plan not found (id {})", id),
            Color::Yellow,
        ),
        Screen::Error(msg) => draw_notice(f, v_chunks[0], &msg, Color::Red),
        Screen::Ready => draw_week(f, v_chunks[0], state),
    }

    draw_footer(f, v_chunks[1], state);
}

fn draw_notice(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let notice = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Meal Plan "));
    f.render_widget(notice, area);
}

fn draw_week(f: &mut Frame, area: Rect, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(ROWS_PER_DAY * 7),
            Constraint::Length(3),
        ])
        .split(area);

    let grid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(chunks[2]);
    let heading = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(chunks[1]);

    let carousel_area = Rect {
        height: grid[1].height.min(ROWS_PER_DAY * 7),
        ..grid[1]
    };
    state.set_carousel_area(carousel_area);

    let state = &*state;
    let Some(snapshot) = state.snapshot.as_ref() else {
        return;
    };

    // --- Header ---
    let marker = |allowed: bool| {
        if allowed {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let week_line = Line::from(vec![
        Span::styled("<", marker(state.nav.can_go_previous())),
        Span::styled(
            format!(" {} ", state.nav.week_label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(">", marker(state.nav.can_go_next())),
    ]);
    let description = snapshot.plan.description.clone().unwrap_or_default();
    let header = Paragraph::new(vec![
        week_line,
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", snapshot.plan.title))
            .title_bottom(format!(
                " {} ",
                format_range(snapshot.plan.start_date, snapshot.plan.end_date)
            )),
    );
    f.render_widget(header, chunks[0]);

    // --- Column headings ---
    let cell_width = cell_width(carousel_area.width);
    let headings = format!(
        "{:gutter$}{:<cw$} {:<cw$}",
        "",
        "Lunch",
        "Dinner",
        gutter = DATE_GUTTER as usize,
        cw = cell_width
    );
    f.render_widget(
        Paragraph::new(headings).style(Style::default().fg(Color::DarkGray)),
        heading[1],
    );

    // --- Day column ---
    let day_lines: Vec<Line> = state
        .nav
        .week_days()
        .iter()
        .zip(crate::frame::DAY_NAMES)
        .flat_map(|(iso, name)| {
            let is_today = crate::week::format_iso(state.today) == *iso;
            let label = if is_today {
                Span::styled(
                    name.to_uppercase(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(name)
            };
            [Line::from(label), Line::default()]
        })
        .collect();
    f.render_widget(Paragraph::new(day_lines), grid[0]);

    // --- Carousel ---
    let width = usize::from(carousel_area.width);
    let frames = state
        .carousel
        .frames(&state.nav, &snapshot.index, state.today);
    let cursor = (!state.carousel.is_animating()).then_some((state.cursor_day, state.cursor_slot));
    let rendered: Vec<Vec<StyledRow>> = frames
        .iter()
        .enumerate()
        .map(|(i, frame)| frame_rows(frame, width, if i == 1 { cursor } else { None }))
        .collect();

    let start = (width as i32 - state.offset_columns()).clamp(0, 2 * width as i32) as usize;
    let lines: Vec<Line> = (0..usize::from(ROWS_PER_DAY) * 7)
        .map(|r| {
            let strip: StyledRow = rendered
                .iter()
                .flat_map(|rows| rows[r].iter().copied())
                .skip(start)
                .take(width)
                .collect();
            to_line(strip)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), carousel_area);

    // --- Participants ---
    let participants = snapshot.index.participant_users(&snapshot.participants);
    let mut spans = Vec::new();
    if participants.is_empty() {
        spans.push(Span::styled(
            "No participants",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for user in participants.iter().take(MAX_PARTICIPANT_BADGES) {
            spans.push(badge(user));
            spans.push(Span::raw(" "));
        }
        if participants.len() > MAX_PARTICIPANT_BADGES {
            spans.push(Span::styled(
                format!("+{}", participants.len() - MAX_PARTICIPANT_BADGES),
                Style::default().fg(Color::Gray),
            ));
        }
    }
    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Participants "));
    f.render_widget(bar, chunks[3]);
}

fn draw_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let color = match state.flash.map(|(kind, _)| kind) {
        Some(HapticKind::Warning) => Color::Yellow,
        Some(HapticKind::Error) => Color::Red,
        Some(HapticKind::Success) => Color::Green,
        Some(HapticKind::ImpactLight | HapticKind::ImpactMedium) => Color::White,
        None => Color::Cyan,
    };
    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help_text = "h/l:Week | j/k:Day | Tab:Slot | Enter:Open | r:Reload | q:Quit";
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn cell_width(width: u16) -> usize {
    usize::from(width.saturating_sub(DATE_GUTTER + 1) / 2)
}

fn user_style(user: &User) -> Style {
    let (r, g, b) = to_rgb8(user_color(user));
    // Perceived luminance, 0-255
    let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    let fg = if luma < 128 { Color::White } else { Color::Black };
    Style::default().bg(Color::Rgb(r, g, b)).fg(fg)
}

fn badge(user: &User) -> Span<'static> {
    Span::styled(format!(" {} ", user.initial()), user_style(user))
}

/// Renders one week into fixed-width rows of styled characters.
fn frame_rows(
    frame: &WeekFrame<'_>,
    width: usize,
    cursor: Option<(usize, MealSlot)>,
) -> Vec<StyledRow> {
    let cw = cell_width(width as u16);
    let mut rows = Vec::with_capacity(usize::from(ROWS_PER_DAY) * 7);
    for (day, row) in frame.rows.iter().enumerate() {
        let date_style = if row.is_today {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut top = styled(&format!("{:>2} ", row.date.format("%-d")), date_style);
        let mut bottom = styled(&" ".repeat(usize::from(DATE_GUTTER)), Style::default());

        for (i, slot) in MealSlot::ALL.iter().enumerate() {
            if i > 0 {
                let sep = Style::default().fg(Color::DarkGray);
                top.push(('│', sep));
                bottom.push(('│', sep));
            }
            let selected = cursor == Some((day, *slot));
            let (t, b) = cell_rows(row.cell(*slot), cw, selected);
            top.extend(t);
            bottom.extend(b);
        }

        for line in [&mut top, &mut bottom] {
            line.resize(width, (' ', Style::default()));
        }
        rows.push(top);
        rows.push(bottom);
    }
    rows
}

fn cell_rows(cell: &MealCell<'_>, width: usize, selected: bool) -> (StyledRow, StyledRow) {
    let base = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let mut top = match cell.meal {
        Some(meal) => styled(&truncate(&meal.title, width), base),
        None => styled(" +", base.fg(Color::DarkGray)),
    };
    let mut bottom = StyledRow::new();
    if let Some(chef) = cell.chef {
        bottom.extend(styled(&format!(" {} ", chef.initial()), user_style(chef)));
    }
    for user in &cell.not_eating {
        bottom.push((' ', Style::default()));
        bottom.extend(styled(
            &format!("x{}", user.initial()),
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
        ));
    }
    top.resize(width, (' ', base));
    bottom.truncate(width);
    bottom.resize(width, (' ', Style::default()));
    (top, bottom)
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Shortens `text` to at most `width` columns, ending in an ellipsis when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = char_width(c);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn styled(text: &str, style: Style) -> StyledRow {
    let mut row = StyledRow::with_capacity(text.len());
    for c in text.chars() {
        match char_width(c) {
            0 => {}
            1 => row.push((c, style)),
            _ => {
                row.push((c, style));
                row.push((CONTINUATION, style));
            }
        }
    }
    row
}

/// A wide character split by the window edge renders as a blank column.
fn to_line(row: StyledRow) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = None;
    let mut open_wide = false;
    for (i, &(c, style)) in row.iter().enumerate() {
        let shown = if c == CONTINUATION {
            if std::mem::take(&mut open_wide) {
                continue;
            }
            ' '
        } else if char_width(c) > 1 {
            open_wide = row.get(i + 1).is_some_and(|(next, _)| *next == CONTINUATION);
            if open_wide { c } else { ' ' }
        } else {
            c
        };
        if current_style != Some(style) && !current.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut current),
                current_style.unwrap_or_default(),
            ));
        }
        current_style = Some(style);
        current.push(shown);
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, current_style.unwrap_or_default()));
    }
    Line::from(spans)
}
