use crate::app::state::AppState;
use crate::selector::LoadStatus;
use crate::ui::theme::Theme;
use crate::ui::{spinner_frame, truncate_to_width};
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

pub fn render(frame: &mut Frame, state: &AppState) {
    let picker = &state.picker;
    let Some(level) = picker.level.filter(|_| picker.visible) else {
        return;
    };

    let area = frame.area();

    // Center the popup: 50% width, 70% height, min 40x12
    let popup_w = (area.width / 2).max(40).min(area.width.saturating_sub(4));
    let popup_h = (area.height * 70 / 100)
        .max(12)
        .min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_w)) / 2;
    let popup_y = (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let options = state.selector.options(level);
    let title = match state.selector.status(level) {
        LoadStatus::Loading => format!(
            " {} {} loading... ",
            level.label(),
            spinner_frame(state.tick_count)
        ),
        _ => format!(" {} ({} of {}) ", level.label(), matched(state), options.len()),
    };

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Style::default().fg(Theme::ACCENT_TEAL))
        .style(Style::default().bg(Theme::BG_SURFACE));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if inner.height < 4 || inner.width < 10 {
        return;
    }

    // Filter bar
    let filter_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let filter_line = Line::from(vec![
        Span::styled(" Filter: ", Theme::key_hint()),
        Span::styled(
            if picker.filter.is_empty() {
                "(type to filter)"
            } else {
                picker.filter.as_str()
            },
            if picker.filter.is_empty() {
                Style::default().fg(Theme::TEXT_MUTED)
            } else {
                Style::default().fg(Theme::TEXT_PRIMARY)
            },
        ),
        Span::styled("█", Style::default().fg(Theme::ACCENT_TEAL)),
    ]);
    frame.render_widget(Paragraph::new(filter_line), filter_area);

    // Separator
    let sep_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let sep = Paragraph::new(Line::from(Span::styled(
        "─".repeat(inner.width as usize),
        Style::default().fg(Theme::BORDER_DIM),
    )));
    frame.render_widget(sep, sep_area);

    // List area
    let list_h = (inner.height as usize).saturating_sub(3); // filter + sep + help
    let list_area = Rect::new(
        inner.x,
        inner.y + 2,
        inner.width.saturating_sub(1),
        list_h as u16,
    );

    // Keep the highlighted row on screen even if the handler's page size differs
    let mut start = picker.scroll_offset;
    if picker.selected >= start + list_h {
        start = picker.selected + 1 - list_h;
    }
    let end = (start + list_h).min(picker.rows.len());
    let row_width = list_area.width.saturating_sub(2) as usize;
    let current = state.selector.selected(level);

    let mut lines: Vec<Line> = Vec::new();
    if picker.rows.is_empty() {
        let text = if options.is_empty() {
            " No options available"
        } else {
            " No matches"
        };
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Theme::TEXT_MUTED),
        )));
    }
    for (i, row) in picker.rows.iter().enumerate().take(end).skip(start) {
        let (label, base_style) = match row {
            None => (
                state.config.ui.placeholder(level).to_string(),
                Style::default().fg(Theme::TEXT_SECONDARY),
            ),
            Some(idx) => {
                let value = options[*idx].as_str();
                let style = if Some(value) == current {
                    Style::default().fg(Theme::ACCENT_GREEN)
                } else {
                    Style::default().fg(Theme::TEXT_PRIMARY)
                };
                (value.to_string(), style)
            }
        };
        let style = if i == picker.selected {
            Theme::highlight()
        } else {
            base_style
        };
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(&label, row_width)),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(lines), list_area);

    // Scrollbar
    if picker.rows.len() > list_h {
        let scrollbar_area = Rect::new(
            inner.x + inner.width.saturating_sub(1),
            inner.y + 2,
            1,
            list_h as u16,
        );
        let mut scrollbar_state =
            ScrollbarState::new(picker.rows.len().saturating_sub(list_h)).position(start);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .thumb_style(Theme::scrollbar_thumb())
                .track_style(Theme::scrollbar_track()),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    // Keybinding help
    let help_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
    let help = Line::from(vec![
        Span::styled(" ↑↓", Theme::key_hint()),
        Span::styled(" Navigate  ", Style::default().fg(Theme::TEXT_SECONDARY)),
        Span::styled("Enter", Theme::key_hint()),
        Span::styled(" Choose  ", Style::default().fg(Theme::TEXT_SECONDARY)),
        Span::styled("Esc", Theme::key_hint()),
        Span::styled(" Close", Style::default().fg(Theme::TEXT_SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(help), help_area);
}

/// Number of real options (not the placeholder) currently listed.
fn matched(state: &AppState) -> usize {
    state.picker.rows.iter().filter(|r| r.is_some()).count()
}
