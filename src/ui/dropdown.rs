use crate::app::state::AppState;
use crate::selector::{Level, LoadStatus};
use crate::ui::theme::Theme;
use crate::ui::{spinner_frame, truncate_to_width};
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

/// One closed dropdown field: label and load status in the border, the
/// current selection (or placeholder) inside.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, level: Level) {
    let selector = &state.selector;
    let enabled = selector.is_enabled(level);
    let focused = state.focus == level;
    let options = selector.options(level);

    let (border_style, border_type) = if focused {
        (Theme::border_focused(), Theme::border_type_focused())
    } else {
        (Theme::border(), Theme::border_type())
    };

    let mut title = vec![Span::styled(
        format!(" {} ", level.label()),
        if enabled { Theme::title() } else { Theme::disabled() },
    )];
    match selector.status(level) {
        LoadStatus::Loading => title.push(Span::styled(
            format!("{} loading ", spinner_frame(state.tick_count)),
            Theme::loading(),
        )),
        LoadStatus::Failed(_) => title.push(Span::styled("failed ", Theme::error())),
        LoadStatus::Empty => title.push(Span::styled("empty ", Theme::error())),
        LoadStatus::Idle | LoadStatus::Ready => {}
    }
    // A failed or empty level that still has options is showing a fallback table
    if matches!(selector.status(level), LoadStatus::Failed(_) | LoadStatus::Empty)
        && !options.is_empty()
    {
        title.push(Span::styled("(fallback) ", Theme::loading()));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let placeholder = state.config.ui.placeholder(level);
    let (text, text_style) = match selector.selected(level) {
        Some(value) => (value, Theme::value()),
        None if enabled => (placeholder, Theme::placeholder()),
        None => (placeholder, Theme::disabled()),
    };

    let suffix = if enabled {
        format!("{} ▾", options.len())
    } else {
        "▾".to_string()
    };
    let suffix_width = suffix.width();
    let avail = (inner.width as usize).saturating_sub(suffix_width + 1);
    let text = truncate_to_width(text, avail);
    let pad = (inner.width as usize).saturating_sub(text.width() + suffix_width);

    let line = Line::from(vec![
        Span::styled(text, text_style),
        Span::raw(" ".repeat(pad)),
        Span::styled(
            suffix,
            if enabled { Theme::placeholder() } else { Theme::disabled() },
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
