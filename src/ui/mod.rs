use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::display::{ReferenceIdentity, UserCard};
use crate::theme::Theme;
use crate::users::USERS;

// Set once at startup from the config; falls back to the default palette
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn problematic() -> Color { theme().problematic }
fn optimized() -> Color { theme().optimized }
fn inactive() -> Color { theme().inactive }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Console gets whatever the fixed boxes leave over
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Length(9),               // Controls box
            Constraint::Length(6),               // Component boxes
            Constraint::Min(3),                  // Console
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_controls_box(f, app, chunks[1]);
    draw_components(f, app, chunks[2]);
    draw_console_box(f, app, chunks[3]);
    draw_footer(f, chunks[4]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(vec![
            Span::styled(status, Style::default().fg(accent())),
        ])
    } else {
        Line::from(vec![
            Span::styled("Array lookup re-render demonstration", Style::default().fg(header()).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(format!("controller rendered {} times", app.render_count), Style::default().fg(text_dim())),
        ])
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_controls_box(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Controls ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(block.inner(area));
    f.render_widget(block, area);

    // Selector: one row per user, current selection highlighted
    let selected = app.selected_index();
    let mut rows: Vec<Line> = USERS
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let is_selected = selected == Some(i);
            let marker = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text())
            };
            Line::from(Span::styled(format!("{}{} - {}", marker, user.id, user.name), style))
        })
        .collect();
    if selected.is_none() {
        rows.push(Line::from(Span::styled(
            format!("  (user {} not in list)", app.selected_user),
            Style::default().fg(problematic()),
        )));
    }

    let selector = Paragraph::new(rows).block(
        Block::default()
            .title(Span::styled("Select User ID", Style::default().fg(header())))
            .borders(Borders::NONE),
    );
    f.render_widget(selector, halves[0]);

    let button = vec![
        Line::from(vec![
            Span::styled("[ ", Style::default().fg(inactive())),
            Span::styled(format!("Force Re-render (Counter: {})", app.counter), Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", Style::default().fg(inactive())),
        ]),
        Line::from(vec![
            Span::styled("optimized: ", Style::default().fg(optimized())),
            Span::styled(
                format!("{} lookup searches, {} renders skipped", app.optimized_searches(), app.optimized_skips()),
                Style::default().fg(text_dim()),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press f to force a re-render without changing the selected user. \
             The problematic component will re-render unnecessarily.",
            Style::default().fg(text_dim()).add_modifier(Modifier::ITALIC),
        )),
    ];
    let button = Paragraph::new(button).wrap(Wrap { trim: true });
    f.render_widget(button, halves[1]);
}

fn draw_components(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    draw_card(f, &app.problematic_card, problematic(), halves[0]);
    draw_card(f, &app.optimized_card, optimized(), halves[1]);
}

fn draw_card(f: &mut Frame, card: &UserCard, color: Color, area: Rect) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", card.title), Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let (reference_text, reference_color) = match card.reference {
        ReferenceIdentity::New => ("new object reference", problematic()),
        ReferenceIdentity::Stable => ("same object reference", optimized()),
        ReferenceIdentity::Missing => ("no record", text_dim()),
    };

    let lines = vec![
        Line::from(Span::styled(card.summary.as_str(), Style::default().fg(text()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("lookup result: ", Style::default().fg(text_dim())),
            Span::styled(reference_text, Style::default().fg(reference_color)),
        ]),
    ];

    let content = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(content, area);
}

fn draw_console_box(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.trace {
        Some(trace) => format!(" Console ({} lines) ", trace.len()),
        None => " Console ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(inactive())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = match &app.trace {
        Some(trace) => trace
            .tail(visible)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(text_dim()))))
            .collect(),
        None => vec![Line::from(Span::styled(
            "Tracing disabled (enable [trace] in config or drop --no-trace)",
            Style::default().fg(text_dim()),
        ))],
    };

    let console = Paragraph::new(lines).block(block);
    f.render_widget(console, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints: Vec<(&str, &str)> = vec![
        ("↑↓", "User"),
        ("1-5", "Pick"),
        ("f", "Force"),
        ("c", "Clear"),
        ("h", "Help"),
        ("q", "Quit"),
    ];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 85 },
        area
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };
    let step = |n: &'static str, body: &'static str| {
        Line::from(vec![
            Span::styled(n, Style::default().fg(accent())),
            Span::raw(body),
        ])
    };

    let help_text = vec![
        section("═══ Instructions ═══"),
        step("  1. ", "Watch the console box for lookup and render traces"),
        step("  2. ", "Press f several times while keeping the same user selected"),
        step("  3. ", "The problematic (red) component re-renders every time"),
        step("  4. ", "The optimized (green) component only re-renders when the user id changes"),
        step("  5. ", "Change the selection and see how both components handle it"),
        Line::from(""),
        section("═══ Why this happens ═══"),
        step("  Lookup  ", "The naive lookup searches and allocates a new result on every call,"),
        Line::from("          so equal users arrive as different objects each render. The"),
        Line::from("          memoized lookup keeps the last id and result and only searches"),
        Line::from("          again when the id changes."),
        step("  Gate    ", "The optimized component sits behind a props-equality gate that"),
        Line::from("          skips its render when the user id is unchanged. The problematic"),
        Line::from("          component renders whenever the controller redraws."),
        Line::from(""),
        Line::from(Span::styled(
            "  Both are needed: memoization avoids recalculation, the gate avoids re-rendering.",
            Style::default().fg(text_dim()).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" rerender Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
