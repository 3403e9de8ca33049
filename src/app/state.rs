use crate::config::AppConfig;
use crate::selector::{CascadingSelector, Level, LoadStatus};

/// Rows scrolled by PageUp/PageDown in the option picker.
pub const PICKER_PAGE: usize = 10;

/// Popup listing the options of one level.
///
/// `rows` holds what is currently shown: `None` is the "Select ..." entry
/// that clears the level, `Some(i)` indexes the level's option list. The
/// placeholder is hidden while a filter is typed.
#[derive(Debug, Default)]
pub struct PickerState {
    pub visible: bool,
    pub level: Option<Level>,
    pub filter: String,
    pub rows: Vec<Option<usize>>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl PickerState {
    pub fn open(&mut self, level: Level, options: &[String], current: Option<&str>) {
        self.visible = true;
        self.level = Some(level);
        self.filter.clear();
        self.selected = 0;
        self.scroll_offset = 0;
        self.refilter(options);
        if let Some(current) = current {
            if let Some(pos) = self
                .rows
                .iter()
                .position(|r| r.is_some_and(|i| options[i] == current))
            {
                self.selected = pos;
            }
        }
        self.ensure_visible(PICKER_PAGE);
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.level = None;
        self.filter.clear();
        self.rows.clear();
    }

    /// Rebuild `rows` from `options` and the current filter (case-insensitive
    /// substring match).
    pub fn refilter(&mut self, options: &[String]) {
        let needle = self.filter.to_lowercase();
        self.rows = if needle.is_empty() {
            std::iter::once(None)
                .chain((0..options.len()).map(Some))
                .collect()
        } else {
            options
                .iter()
                .enumerate()
                .filter(|(_, o)| o.to_lowercase().contains(&needle))
                .map(|(i, _)| Some(i))
                .collect()
        };
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn push_filter(&mut self, c: char, options: &[String]) {
        self.filter.push(c);
        self.selected = 0;
        self.scroll_offset = 0;
        self.refilter(options);
    }

    pub fn pop_filter(&mut self, options: &[String]) {
        if self.filter.pop().is_some() {
            self.selected = 0;
            self.scroll_offset = 0;
            self.refilter(options);
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// The highlighted row, if the list is not empty.
    pub fn current_row(&self) -> Option<Option<usize>> {
        self.rows.get(self.selected).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct AppState {
    pub config: AppConfig,
    pub selector: CascadingSelector,
    pub focus: Level,
    pub picker: PickerState,
    pub status: Option<StatusMessage>,
    pub tick_count: u64,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let selector = CascadingSelector::new(config.fallback.policy);
        Self {
            config,
            selector,
            focus: Level::Country,
            picker: PickerState::default(),
            status: None,
            tick_count: 0,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
        self.dirty = true;
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
        self.dirty = true;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.child().unwrap_or(Level::Country);
        self.dirty = true;
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.parent().unwrap_or(Level::City);
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status {
            return msg.text.clone();
        }
        let counts: Vec<String> = Level::ALL
            .iter()
            .map(|&level| {
                let n = self.selector.options(level).len();
                match self.selector.status(level) {
                    LoadStatus::Loading => format!("{}: …", level),
                    _ => format!("{}: {}", level, n),
                }
            })
            .collect();
        counts.join(" | ")
    }
}
