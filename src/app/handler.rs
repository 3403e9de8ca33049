use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::selector::{Applied, FetchOutcome, Level, Ticket};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions to run once at startup: the initial country fetch.
pub fn start(state: &mut AppState) -> Vec<Action> {
    let ticket = state.selector.load_countries();
    state.dirty = true;
    vec![Action::Fetch(ticket)]
}

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => handle_terminal(state, cevent),
        AppEvent::OptionsLoaded { ticket, outcome } => {
            handle_options_loaded(state, ticket, outcome);
            vec![]
        }
        AppEvent::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            if state.selector.is_loading() {
                state.dirty = true;
            }
            vec![]
        }
    }
}

fn handle_options_loaded(state: &mut AppState, ticket: Ticket, outcome: FetchOutcome) {
    let level = ticket.level;
    let name = level.label().to_lowercase();
    let message = match &outcome {
        FetchOutcome::Loaded(_) => None,
        FetchOutcome::Empty => Some(format!("No {} options returned", name)),
        FetchOutcome::Failed(reason) => Some(format!("Could not load {} list: {}", name, reason)),
    };

    match state.selector.apply(&ticket, outcome) {
        Applied::Stale => {
            tracing::debug!(%level, generation = ticket.generation, "dropping stale response");
            return;
        }
        Applied::Installed => {}
    }

    match message {
        Some(text) => state.set_error(text),
        None => {
            if state.status.as_ref().is_some_and(|s| s.is_error) {
                state.status = None;
            }
        }
    }

    if state.picker.visible && state.picker.level == Some(level) {
        let options = state.selector.options(level);
        state.picker.refilter(options);
    }
    state.dirty = true;
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => {
            state.dirty = true;
            handle_key(state, key)
        }
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    // Picker captures all input when visible
    if state.picker.visible {
        return handle_picker_key(state, key);
    }

    match key.code {
        KeyCode::Char('q') => vec![Action::Quit],
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
            state.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
            state.focus_prev();
            vec![]
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let level = state.focus;
            open_picker(state, level);
            vec![]
        }
        KeyCode::Delete | KeyCode::Backspace => {
            let level = state.focus;
            commit(state, level, None)
        }
        KeyCode::Char('r') => {
            state.picker.close();
            state.focus = Level::Country;
            state.set_status("Reloading countries...");
            start(state)
        }
        _ => vec![],
    }
}

fn open_picker(state: &mut AppState, level: Level) {
    if !state.selector.is_enabled(level) {
        let parent = level.parent().map(|p| p.label()).unwrap_or_default();
        state.set_error(format!("Select a {} first", parent.to_lowercase()));
        return;
    }
    let options = state.selector.options(level);
    let current = state.selector.selected(level);
    state.picker.open(level, options, current);
}

fn handle_picker_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let Some(level) = state.picker.level else {
        state.picker.close();
        return vec![];
    };

    match key.code {
        KeyCode::Esc => {
            state.picker.close();
            vec![]
        }
        KeyCode::Up => {
            state.picker.move_up();
            state.picker.ensure_visible(PICKER_PAGE);
            vec![]
        }
        KeyCode::Down => {
            state.picker.move_down();
            state.picker.ensure_visible(PICKER_PAGE);
            vec![]
        }
        KeyCode::PageUp => {
            for _ in 0..PICKER_PAGE {
                state.picker.move_up();
            }
            state.picker.ensure_visible(PICKER_PAGE);
            vec![]
        }
        KeyCode::PageDown => {
            for _ in 0..PICKER_PAGE {
                state.picker.move_down();
            }
            state.picker.ensure_visible(PICKER_PAGE);
            vec![]
        }
        KeyCode::Enter => {
            let Some(row) = state.picker.current_row() else {
                return vec![];
            };
            state.picker.close();
            let actions = commit(state, level, row);
            if row.is_some() {
                if let Some(child) = level.child() {
                    state.focus = child;
                }
            }
            actions
        }
        KeyCode::Backspace => {
            let options = state.selector.options(level);
            state.picker.pop_filter(options);
            vec![]
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let options = state.selector.options(level);
            state.picker.push_filter(c, options);
            vec![]
        }
        _ => vec![],
    }
}

/// Apply a selection (`None` clears the level) and return the follow-up
/// fetch, or a cancellation of now-orphaned fetches when a level is cleared.
fn commit(state: &mut AppState, level: Level, index: Option<usize>) -> Vec<Action> {
    match state.selector.select_index(level, index) {
        Ok(Some(ticket)) => {
            tracing::info!(%level, value = ?state.selector.selected(level), "selection changed");
            state.status = None;
            vec![Action::Fetch(ticket)]
        }
        Ok(None) => {
            tracing::info!(%level, value = ?state.selector.selected(level), "selection changed");
            match state.selector.summary() {
                Some(summary) if state.config.ui.show_result => {
                    state.set_status(format!("Selected {}", summary))
                }
                _ => state.status = None,
            }
            level.child().map(Action::CancelFrom).into_iter().collect()
        }
        Err(e) => {
            state.set_error(e.to_string());
            vec![]
        }
    }
}
