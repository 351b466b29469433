//! Markdown rendering for the messages pane.
//!
//! Thin wrapper around `tui-markdown` — converts agent message bodies to
//! styled ratatui `Line`s. The wrapper only ever receives plain strings
//! (payload coercion happens upstream); `tui-markdown` emits styled spans,
//! never raw markup, so nothing unescaped reaches the terminal.

use ratatui::text::{Line, Span};

/// Parse markdown text and return owned styled lines.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.into_owned(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect()
}
