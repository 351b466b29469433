//! Chat layout.
//!
//! ```text
//! ┌─ Aura ──────────────────────────── Online ─┐
//! │                                             │
//! │  (scrolling message timeline)               │
//! │                                             │
//! ├─────────────────────────────────────────────┤
//! │ > input line                                │
//! ├─────────────────────────────────────────────┤
//! │ [listening] [Messages: 12]  Enter:Send ...  │
//! └─────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use ratatui::Frame;

use crate::session::format::{present, FormatOptions};
use crate::transport::AgentLivenessState;

use super::app::App;
use super::markdown;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // messages
            Constraint::Length(3), // input bar
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_header(f, app, outer[0]);
    draw_messages(f, app, outer[1]);
    draw_input(f, app, outer[2]);
    draw_status(f, app, outer[3]);

    // Toast overlay rendered last — sits on top of the messages pane.
    draw_toast(f, app, f.area());
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let (presence, color) = if app.agent_online() {
        ("Online", Color::Green)
    } else {
        ("Offline", Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", app.config.agent_name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let line = Line::from(vec![
        Span::styled(presence, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({})", app.agent_state),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Conversation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let agent_name = app.config.agent_name.clone();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in app.source.messages() {
        let view = present(entry, &agent_name, FormatOptions::default());

        lines.push(Line::from(""));
        let mut meta: Vec<Span<'static>> = Vec::new();
        if let Some(name) = view.name {
            let name_style = if view.local {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };
            meta.push(Span::styled(format!("[{name}] "), name_style));
        }
        if let Some(time) = view.time_short {
            let marker = if view.edited { "*" } else { "" };
            meta.push(Span::styled(
                format!("{marker}{time}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(meta));

        if view.local {
            for text_line in view.body.lines() {
                lines.push(Line::from(Span::raw(text_line.to_string())));
            }
        } else {
            lines.extend(markdown::render_markdown(&view.body));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Start a conversation",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Ask the agent a question to begin chatting.",
            Style::default().fg(Color::DarkGray),
        )));
        if app.show_pre_connect_hint() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Agent is listening, ask it a question",
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    // Clamp scroll so we never scroll past content.
    // Account for line wrapping: each line may occupy multiple visual rows.
    // Use u32 to avoid overflow for very long sessions.
    let inner_height = area.height.saturating_sub(2) as u32;
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let total_lines: u32 = lines
        .iter()
        .map(|line| {
            let width: usize = line.spans.iter().map(|s| s.content.len()).sum();
            if width == 0 {
                1u32
            } else {
                width.div_ceil(inner_width) as u32
            }
        })
        .sum();
    let max_scroll = total_lines.saturating_sub(inner_height);
    let max_scroll_u16 = max_scroll.min(u16::MAX as u32) as u16;

    // Feed the synchronizer: viewport geometry is the size observation,
    // the timeline fingerprint is the content signal.
    let fingerprint = app.source.fingerprint();
    app.scroll.observe(
        (area.width, area.height),
        max_scroll_u16,
        fingerprint,
    );
    let scroll = app.scroll.offset();

    // Tell the input handler how far the pane reaches (PageUp/End).
    app.max_scroll = max_scroll_u16;
    app.viewport_height = inner_height.min(u16::MAX as u32) as u16;

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(para, area);

    // Scrollbar
    if total_lines > inner_height {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll_u16 as usize).position(scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area,
            &mut scrollbar_state,
        );
    }
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, border) = if app.config.supports_chat_input {
        (" Message ", Color::Cyan)
    } else {
        (" Chat input disabled ", Color::DarkGray)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);

    let text = if app.config.supports_chat_input {
        format!("> {}", app.input)
    } else {
        String::new()
    };
    f.render_widget(Paragraph::new(text.clone()).block(block), area);

    if app.config.supports_chat_input {
        let cursor_x = inner.x + (text.len() as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let state_color = match app.agent_state {
        AgentLivenessState::Connecting => Color::Yellow,
        AgentLivenessState::Disconnected => Color::Red,
        _ => Color::Green,
    };

    let spans = vec![
        Span::styled(" [", Style::default().fg(Color::DarkGray)),
        Span::styled(app.agent_state.to_string(), Style::default().fg(state_color)),
        Span::styled("]", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(
            format!("[Messages: {}]", app.source.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            "Enter:Send  \u{2191}\u{2193}:Scroll  End:Bottom  Esc:Clear  ^C:Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the active toast, if any, anchored to the top-right corner.
fn draw_toast(f: &mut Frame, app: &App, area: Rect) {
    let Some(alert) = app.toasts.active() else {
        return;
    };

    let width = 46u16.min(area.width.saturating_sub(2));
    let text_width = width.saturating_sub(2).max(1) as usize;
    let body_rows = alert.description.len().div_ceil(text_width) as u16;
    let height = (body_rows + 2).min(area.height);
    let x = area.right().saturating_sub(width + 1);
    let y = area.y + 1;
    let popup = Rect::new(x, y, width, height);

    // Clear background before drawing the overlay.
    f.render_widget(
        Paragraph::new("").style(Style::default().bg(Color::Black)),
        popup,
    );

    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));
    let para = Paragraph::new(alert.description.clone())
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(para, popup);
}
