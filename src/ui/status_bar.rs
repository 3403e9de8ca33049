use crate::app::state::AppState;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = match state.status {
        Some(ref msg) if msg.is_error => Theme::status_bar_error(),
        _ => Theme::status_bar(),
    };

    let mut parts: Vec<Span> = vec![Span::styled(format!(" {} ", state.status_line()), style)];

    let hints = if state.picker.visible {
        " ↑↓ move  type to filter  Enter choose  Esc close "
    } else {
        " Tab next  Enter open  Del clear  r reload  q quit "
    };

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + hints.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        hints,
        Style::default().fg(Theme::ACCENT_TEAL).bg(Theme::BORDER_DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
