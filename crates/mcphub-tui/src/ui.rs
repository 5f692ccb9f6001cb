//! Rendering.
//!
//! Layout, top to bottom: toolbar, view tabs, the active view, key hints.

use mcphub_core::LogLevel;
use mcphub_gui::{HubShell, HubStatus, ServerCard, truncate_description};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{App, Tab};
use crate::input::KEY_HINTS;

const GREEN: Color = Color::Rgb(0x2e, 0xcc, 0x71);
const ORANGE: Color = Color::Rgb(0xf3, 0x9c, 0x12);
const RED: Color = Color::Rgb(0xe7, 0x4c, 0x3c);
const BLUE: Color = Color::Rgb(0x34, 0x98, 0xdb);
const PURPLE: Color = Color::Rgb(0x9b, 0x59, 0xb6);
const MUTED: Color = Color::Gray;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_toolbar(f, app, chunks[0]);
    render_tabs(f, app.tab(), chunks[1]);
    match app.tab() {
        Tab::Servers => render_servers(f, app.shell(), chunks[2]),
        Tab::Logs => render_logs(f, app.shell(), chunks[2]),
    }
    f.render_widget(
        Paragraph::new(Span::styled(KEY_HINTS, Style::default().fg(MUTED))),
        chunks[3],
    );
}

const fn status_color(status: HubStatus) -> Color {
    match status {
        HubStatus::Running => GREEN,
        HubStatus::Starting | HubStatus::Stopping => ORANGE,
        HubStatus::Error => RED,
        HubStatus::Stopped => MUTED,
    }
}

pub(crate) const fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => GREEN,
        LogLevel::Warn => ORANGE,
        LogLevel::Error => RED,
        LogLevel::Debug => BLUE,
        LogLevel::Hub => PURPLE,
    }
}

fn badge_color(badge: &str) -> Color {
    match badge {
        "CONNECTED" => GREEN,
        "CONNECTING" => ORANGE,
        "ERROR" | "DISABLED" => RED,
        _ => MUTED,
    }
}

fn render_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let shell = app.shell();
    let status = shell.status();
    let button = if shell.hub_state().has_process() {
        "[s] Stop Hub"
    } else {
        "[s] Start Hub"
    };

    let port_style = if app.editing_port() {
        Style::default().fg(Color::Black).bg(Color::White)
    } else if shell.port_editable() {
        Style::default()
    } else {
        Style::default().fg(MUTED)
    };
    let mut port_text = shell.port_input().to_string();
    if app.editing_port() {
        port_text.push('_');
    }

    let line = Line::from(vec![
        Span::styled(button, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(
            format!("● {}", status.label()),
            Style::default().fg(status_color(status)),
        ),
        Span::raw("   Port: "),
        Span::styled(port_text, port_style),
        Span::raw("   "),
        Span::styled("[c] Open Config", Style::default().fg(MUTED)),
    ]);

    let block = Block::default().borders(Borders::ALL).title("MCP Hub Manager");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(f: &mut Frame, tab: Tab, area: Rect) {
    let index = match tab {
        Tab::Servers => 0,
        Tab::Logs => 1,
    };
    let tabs = Tabs::new(vec!["Servers", "Logs"])
        .select(index)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn card_lines(card: &ServerCard, selected: bool) -> Vec<Line<'static>> {
    let name_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let badge = card.badge();
    let switch = if card.is_enabled() {
        Span::styled("[on]", Style::default().fg(GREEN))
    } else {
        Span::styled("[off]", Style::default().fg(MUTED))
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw(if selected { "▶ " } else { "  " }),
            Span::styled(card.name().to_string(), name_style),
            Span::raw("  "),
            Span::styled(format!("[{badge}]"), Style::default().fg(badge_color(&badge))),
            Span::raw("  "),
            switch,
        ]),
        Line::from(Span::styled(
            format!("  {}", card.meta_line()),
            Style::default().fg(MUTED),
        )),
        Line::from(format!("  {}", card.tools_label())),
    ];

    if card.tools_expanded {
        for tool in card.tools() {
            lines.push(Line::from(format!("  •  {}", tool.name)));
            if !tool.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("      {}", truncate_description(&tool.description)),
                    Style::default().fg(MUTED),
                )));
            }
        }
    }
    lines.push(Line::default());
    lines
}

fn render_servers(f: &mut Frame, shell: &HubShell, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Servers ({})", shell.roster().len()));

    if let Some(message) = shell.roster().empty_message() {
        let text = Paragraph::new(Span::styled(message, Style::default().fg(MUTED))).block(block);
        f.render_widget(text, area);
        return;
    }

    let mut lines = Vec::new();
    let mut selected_span = (0, 0);
    for (index, card) in shell.roster().cards().enumerate() {
        let selected = index == shell.selected_index();
        let card = card_lines(card, selected);
        if selected {
            selected_span = (lines.len(), lines.len() + card.len());
        }
        lines.extend(card);
    }

    let height = usize::from(block.inner(area).height);
    let scroll = scroll_offset(selected_span, height);
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

/// First visible line such that the selected card's lines `[start, end)`
/// fit in `height` rows, favouring the card's top.
fn scroll_offset((start, end): (usize, usize), height: usize) -> usize {
    if height == 0 || end <= height {
        return 0;
    }
    let wanted = end.saturating_sub(height);
    wanted.min(start)
}

fn render_logs(f: &mut Frame, shell: &HubShell, area: Rect) {
    let logs = shell.logs();
    let title = format!(
        "Logs [filter: {}] [debug: {}] ({} entries)",
        logs.filter(),
        if logs.show_debug() { "on" } else { "off" },
        logs.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let height = usize::from(block.inner(area).height);

    // Newest entries at the bottom; only the tail that fits is built.
    let mut lines: Vec<Line<'_>> = logs
        .visible()
        .rev()
        .take(height)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(MUTED),
                ),
                Span::styled(
                    format!("[{}] ", entry.level),
                    Style::default().fg(level_color(entry.level)),
                ),
                Span::raw(entry.message.as_str()),
            ])
        })
        .collect();
    lines.reverse();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset((0, 4), 10), 0);
        assert_eq!(scroll_offset((8, 12), 10), 2);
        // A card taller than the view is shown from its top.
        assert_eq!(scroll_offset((4, 30), 10), 4);
        assert_eq!(scroll_offset((4, 8), 0), 0);
    }

    #[test]
    fn test_level_colors_match_palette() {
        assert_eq!(level_color(LogLevel::Info), GREEN);
        assert_eq!(level_color(LogLevel::Hub), PURPLE);
        assert_eq!(badge_color("DISABLED"), RED);
        assert_eq!(badge_color("ERROR"), RED);
        assert_eq!(badge_color("CONNECTED"), GREEN);
        assert_eq!(badge_color("DISCONNECTED"), MUTED);
    }
}
