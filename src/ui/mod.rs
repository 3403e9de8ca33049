mod dropdown;
mod layout;
mod picker;
mod status_bar;
mod theme;

use crate::app::state::AppState;
use crate::selector::Level;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    render_title(frame, app_layout.title);
    for (level, field) in Level::ALL.into_iter().zip(app_layout.fields) {
        dropdown::render(frame, field, state, level);
    }
    render_result(frame, app_layout.result, state);
    status_bar::render(frame, app_layout.status_bar, state);

    // Popup last so it draws over the form
    picker::render(frame, state);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled("City Selector", theme::Theme::title())))
        .alignment(Alignment::Center);
    let inner = Rect::new(area.x, area.y + area.height.saturating_sub(2), area.width, 1);
    frame.render_widget(title, inner);
}

fn render_result(frame: &mut Frame, area: Rect, state: &AppState) {
    if !state.config.ui.show_result {
        return;
    }
    let Some(summary) = state.selector.summary() else {
        return;
    };
    let line = Line::from(vec![
        Span::styled("You selected ", theme::Theme::placeholder()),
        Span::styled(summary, theme::Theme::result()),
    ]);
    let inner = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), inner);
}

fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::AppEvent;
    use crate::app::handler;
    use crate::config::AppConfig;
    use crate::selector::{FallbackPolicy, FetchOutcome};
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Goa", 10), "Goa");
        assert_eq!(truncate_to_width("Andhra Pradesh", 8), "Andhra …");
        assert_eq!(truncate_to_width("東京都", 4), "東…");
        assert_eq!(truncate_to_width("Goa", 0), "");
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER.len() as u64));
    }

    #[test]
    fn test_renders_form_and_result() {
        let mut state = AppState::new(AppConfig::default());
        let ticket = match handler::start(&mut state).pop() {
            Some(crate::app::action::Action::Fetch(t)) => t,
            other => panic!("expected fetch, got {:?}", other),
        };
        handler::handle_event(
            &mut state,
            AppEvent::OptionsLoaded {
                ticket,
                outcome: FetchOutcome::Loaded(vec!["India".into()]),
            },
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("City Selector"));
        assert!(text.contains("Select Country"));
        assert!(text.contains("Select State"));
        assert!(!text.contains("You selected"));
    }

    #[test]
    fn test_renders_picker_popup() {
        let mut state = AppState::new(AppConfig::default());
        let ticket = state.selector.load_countries();
        state.selector.apply(
            &ticket,
            FetchOutcome::Loaded(vec!["India".into(), "France".into()]),
        );
        let options = state.selector.options(Level::Country);
        state.picker.open(Level::Country, options, None);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Filter:"));
        assert!(text.contains("France"));
        assert!(text.contains("(2 of 2)"));
    }

    fn render_countries(policy: FallbackPolicy, outcome: FetchOutcome) -> String {
        let mut config = AppConfig::default();
        config.fallback.policy = policy;
        let mut state = AppState::new(config);
        let ticket = state.selector.load_countries();
        state.selector.apply(&ticket, outcome);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn test_failed_marker_without_fallback() {
        let text = render_countries(
            FallbackPolicy::Disabled,
            FetchOutcome::Failed("connection refused".into()),
        );
        assert!(text.contains("Country failed"));
        assert!(!text.contains("(fallback)"));
        assert!(text.contains("0 ▾"));
    }

    #[test]
    fn test_failed_marker_with_static_fallback() {
        let text = render_countries(
            FallbackPolicy::Static,
            FetchOutcome::Failed("connection refused".into()),
        );
        assert!(text.contains("Country failed (fallback)"));
        assert!(text.contains("300 ▾"));
    }

    #[test]
    fn test_empty_marker() {
        let text = render_countries(FallbackPolicy::Disabled, FetchOutcome::Empty);
        assert!(text.contains("Country empty"));
        assert!(!text.contains("(fallback)"));
    }

    #[test]
    fn test_configured_placeholders() {
        let mut config = AppConfig::default();
        config.ui.placeholder_country = "Choose a country".into();
        config.ui.placeholder_state = "Choose a state".into();
        let mut state = AppState::new(config);
        let ticket = state.selector.load_countries();
        state
            .selector
            .apply(&ticket, FetchOutcome::Loaded(vec!["India".into()]));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Choose a country"));
        assert!(text.contains("Choose a state"));
        assert!(text.contains("Select City"));
        assert!(!text.contains("Select Country"));

        // The picker's empty row uses the same label
        let options = state.selector.options(Level::Country);
        state.picker.open(Level::Country, options, None);
        terminal.draw(|f| render(f, &state)).unwrap();
        let popup = screen_text(&terminal);
        assert!(popup.contains(" Choose a country"));
        assert!(popup.contains("India"));
    }
}
