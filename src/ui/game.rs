use super::markdown::render_markdown;
use super::spinner::spinner_frame;
use super::utils::{centered_rect, wrapped_height};
use super::{MIN_HEIGHT, MIN_WIDTH};
use crate::ai_response::{Character, CharacterStatus, Evidence, EvidenceKind};
use crate::app::App;
use crate::game_state::{GamePhase, GameState, Outcome};
use crate::message::{Message, MessageType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::*,
};

const EVIDENCE_WIDTH: u16 = 30;
const MAX_ROSTER_ROWS: u16 = 9;

pub fn draw_in_game(f: &mut Frame, app: &App) {
    let size = f.area();

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small. Please resize.")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(warning, size);
        return;
    }

    let state = app.state();
    let debug_rows = if app.settings.debug_mode { 1 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(debug_rows),
        ])
        .split(size);

    draw_header(f, state, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(EVIDENCE_WIDTH), Constraint::Min(40)])
        .split(rows[1]);

    draw_evidence(f, &state.evidence, columns[0]);

    let roster_rows = (state.characters.len() as u16).clamp(1, MAX_ROSTER_ROWS) + 3;
    let banner_rows = if state.phase == GamePhase::Error { 1 } else { 0 };
    let suggestion_rows = state.suggestions.len() as u16;
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(roster_rows),
            Constraint::Min(5),
            Constraint::Length(banner_rows),
            Constraint::Length(suggestion_rows + 3),
        ])
        .split(columns[1]);

    draw_roster(f, &state.characters, main[0]);
    draw_narrative(f, app, main[1]);
    if state.phase == GamePhase::Error {
        draw_error_banner(f, main[2]);
    }
    draw_action_panel(f, app, main[3]);

    if app.settings.debug_mode {
        let debug_text = format!(
            "Terminal size: {}x{} | phase: {} | in flight: {} | messages: {}",
            size.width,
            size.height,
            state.phase,
            state.in_flight,
            state.message_history.len()
        );
        let debug = Paragraph::new(debug_text).style(Style::default().fg(Color::Gray));
        f.render_widget(debug, rows[2]);
    }

    if state.is_over() {
        draw_game_over(f, state.outcome, size);
    }
}

fn draw_header(f: &mut Frame, state: &GameState, area: Rect) {
    let turns_style = if state.turns_left <= 3 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let location = if state.location_name.is_empty() {
        "…"
    } else {
        state.location_name.as_str()
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" 滬江高中命案 ", Style::default().fg(Color::Red)),
        Span::raw("│ Location: "),
        Span::styled(location, Style::default().fg(Color::Yellow)),
        Span::raw(" │ Turns left: "),
        Span::styled(state.turns_left.to_string(), turns_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn status_style(status: CharacterStatus) -> Style {
    match status {
        CharacterStatus::Alive => Style::default().fg(Color::Green),
        CharacterStatus::Deceased => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::CROSSED_OUT),
        CharacterStatus::Missing => Style::default().fg(Color::Magenta),
        CharacterStatus::Arrested => Style::default().fg(Color::Blue),
    }
}

fn draw_roster(f: &mut Frame, characters: &[Character], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Characters ");

    if characters.is_empty() {
        let empty = Paragraph::new("Nobody has been identified yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows = characters.iter().map(|character| {
        let marker = if character.is_interrogating { "▶" } else { " " };
        let name_style = if character.is_interrogating {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(vec![
            Cell::from(marker).style(Style::default().fg(Color::Yellow)),
            Cell::from(character.name.as_str()).style(name_style),
            Cell::from(character.role.as_str()),
            Cell::from(character.status.as_ref()).style(status_style(character.status)),
            Cell::from(character.description.as_str()).style(Style::default().fg(Color::Gray)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["", "Name", "Role", "Status", ""])
            .style(Style::default().fg(Color::DarkGray)),
    )
    .block(block);
    f.render_widget(table, area);
}

fn evidence_icon(kind: EvidenceKind) -> &'static str {
    match kind {
        EvidenceKind::Document => "📄",
        EvidenceKind::Weapon => "🔪",
        EvidenceKind::Item => "🔍",
        EvidenceKind::Place => "📍",
    }
}

fn draw_evidence(f: &mut Frame, evidence: &[Evidence], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" Evidence ({}) ", evidence.len()));

    if evidence.is_empty() {
        let empty = Paragraph::new("No evidence collected yet.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = evidence
        .iter()
        .flat_map(|item| {
            [
                Line::from(vec![
                    Span::raw(format!("{} ", evidence_icon(item.icon_type))),
                    Span::styled(
                        item.name.as_str(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    item.description.as_str(),
                    Style::default().fg(Color::Gray),
                )),
                Line::default(),
            ]
        })
        .collect();

    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(list, area);
}

fn message_lines(message: &Message) -> Vec<Line<'static>> {
    match message.message_type {
        MessageType::User => vec![Line::from(Span::styled(
            format!("> {}", message.content),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))],
        MessageType::Game => render_markdown(&message.content, Style::default().fg(Color::White)),
        MessageType::System => vec![Line::from(vec![
            Span::styled(
                "SYSTEM: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.content.clone(), Style::default().fg(Color::Yellow)),
        ])],
    }
}

fn draw_narrative(f: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Case log ");
    if state.in_flight {
        block = block.title_bottom(
            Line::from(spinner_frame(&app.spinner))
                .style(Style::default().fg(Color::Green))
                .alignment(Alignment::Center),
        );
    }
    let inner = block.inner(area);

    let mut lines: Vec<Line> = Vec::new();
    for message in &state.message_history {
        lines.extend(message_lines(message));
        lines.push(Line::default());
    }

    let total_height: usize = lines
        .iter()
        .map(|line| wrapped_height(&line.to_string(), inner.width))
        .sum();
    let visible = inner.height as usize;
    let max_scroll = total_height.saturating_sub(visible);
    app.max_scroll.set(max_scroll);
    let offset = max_scroll.saturating_sub(app.scroll_from_bottom.min(max_scroll));

    let narrative = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0))
        .block(block);
    f.render_widget(narrative, area);
}

fn draw_error_banner(f: &mut Frame, area: Rect) {
    let banner = Paragraph::new("Connection lost. Press Ctrl+R to restart the case.")
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

fn draw_action_panel(f: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let enabled = state.phase == GamePhase::Playing && !state.in_flight;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.suggestions.len() as u16),
            Constraint::Length(3),
        ])
        .split(area);

    let suggestions: Vec<Line> = state
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            Line::from(vec![
                Span::styled(format!(" {}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(suggestion.as_str(), Style::default().fg(Color::LightCyan)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(suggestions), chunks[0]);

    let border_color = if enabled { Color::Green } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(" Action ");
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    if enabled {
        f.render_widget(&app.input, inner);
    } else {
        let hint = if state.in_flight {
            "Waiting for the Game Master…"
        } else {
            "Input disabled."
        };
        let disabled = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        f.render_widget(disabled, inner);
    }
}

fn draw_game_over(f: &mut Frame, outcome: Option<Outcome>, area: Rect) {
    let popup = centered_rect(50, 30, area);
    let (title, color, body) = match outcome {
        Some(Outcome::Won) => (
            " Case closed ",
            Color::Green,
            "You uncovered the truth behind the murder.",
        ),
        _ => (
            " Case unsolved ",
            Color::Red,
            "The truth slipped away. The killer walks free.",
        ),
    };

    let text = vec![
        Line::default(),
        Line::from(Span::styled(
            body,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press r to restart or q to quit",
            Style::default().fg(Color::Gray),
        )),
    ];

    let overlay = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    f.render_widget(Clear, popup);
    f.render_widget(overlay, popup);
}
