//! The cascading country → state → city state machine.
//!
//! The selector never performs I/O. Operations that need data return a
//! [`Ticket`] describing the fetch to run; the caller later hands the result
//! back through [`CascadingSelector::apply`]. Every level carries a
//! generation counter that is bumped whenever the level is reset, so a
//! response for a ticket issued before the reset is recognised as stale and
//! dropped.

use super::fallback::{self, FallbackPolicy};
use super::outcome::FetchOutcome;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Country,
    State,
    City,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Country, Level::State, Level::City];

    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Country => None,
            Level::State => Some(Level::Country),
            Level::City => Some(Level::State),
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Level::Country => Some(Level::State),
            Level::State => Some(Level::City),
            Level::City => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Country => "Country",
            Level::State => "State",
            Level::City => "City",
        }
    }

    fn index(self) -> usize {
        match self {
            Level::Country => 0,
            Level::State => 1,
            Level::City => 2,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Load state of one dropdown. `Failed` doubles as the per-level error flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Empty,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct LevelState {
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub status: LoadStatus,
    generation: u64,
}

impl LevelState {
    fn reset(&mut self) {
        self.options.clear();
        self.selected = None;
        self.status = LoadStatus::Idle;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// One in-flight fetch: which list it fills, for which parents, and the
/// generation of the level at the moment it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub level: Level,
    pub generation: u64,
    pub country: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Installed,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("{0} is disabled until its parent is selected")]
    Disabled(Level),
    #[error("\"{value}\" is not a {level} option")]
    UnknownOption { level: Level, value: String },
}

pub struct CascadingSelector {
    levels: [LevelState; 3],
    policy: FallbackPolicy,
}

impl CascadingSelector {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            levels: Default::default(),
            policy,
        }
    }

    pub fn level(&self, level: Level) -> &LevelState {
        &self.levels[level.index()]
    }

    fn level_mut(&mut self, level: Level) -> &mut LevelState {
        &mut self.levels[level.index()]
    }

    pub fn options(&self, level: Level) -> &[String] {
        &self.level(level).options
    }

    pub fn selected(&self, level: Level) -> Option<&str> {
        self.level(level).selected.as_deref()
    }

    pub fn status(&self, level: Level) -> &LoadStatus {
        &self.level(level).status
    }

    /// Country is always enabled; every other level needs its parent selected.
    pub fn is_enabled(&self, level: Level) -> bool {
        match level.parent() {
            None => true,
            Some(parent) => self.selected(parent).is_some(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.levels.iter().any(|l| l.status == LoadStatus::Loading)
    }

    /// Reset the whole form and request the country list.
    pub fn load_countries(&mut self) -> Ticket {
        for level in &mut self.levels {
            level.reset();
        }
        self.begin_fetch(Level::Country)
    }

    /// Choose a country (or clear it with `""`). Resets states and cities and,
    /// for a non-empty value, returns the states fetch to run.
    pub fn select_country(&mut self, value: &str) -> Result<Option<Ticket>, SelectError> {
        self.assign(Level::Country, value)?;
        self.reset_below(Level::Country);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.begin_fetch(Level::State)))
    }

    /// Choose a state (or clear it with `""`). Resets cities and, for a
    /// non-empty value, returns the cities fetch to run.
    pub fn select_state(&mut self, value: &str) -> Result<Option<Ticket>, SelectError> {
        self.assign(Level::State, value)?;
        self.reset_below(Level::State);
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.begin_fetch(Level::City)))
    }

    pub fn select_city(&mut self, value: &str) -> Result<(), SelectError> {
        self.assign(Level::City, value)
    }

    /// Select by option index, `None` meaning the placeholder entry.
    pub fn select_index(
        &mut self,
        level: Level,
        index: Option<usize>,
    ) -> Result<Option<Ticket>, SelectError> {
        let value = match index {
            Some(i) => self
                .options(level)
                .get(i)
                .cloned()
                .ok_or_else(|| SelectError::UnknownOption {
                    level,
                    value: format!("#{}", i),
                })?,
            None => String::new(),
        };
        match level {
            Level::Country => self.select_country(&value),
            Level::State => self.select_state(&value),
            Level::City => self.select_city(&value).map(|_| None),
        }
    }

    /// Install the result of a fetch. Results for superseded tickets are
    /// ignored and leave the selector untouched.
    pub fn apply(&mut self, ticket: &Ticket, outcome: FetchOutcome) -> Applied {
        if self.level(ticket.level).generation != ticket.generation {
            return Applied::Stale;
        }

        let (options, status) = match outcome {
            FetchOutcome::Loaded(items) => (items, LoadStatus::Ready),
            FetchOutcome::Empty => (self.fallback_for(ticket), LoadStatus::Empty),
            FetchOutcome::Failed(reason) => {
                (self.fallback_for(ticket), LoadStatus::Failed(reason))
            }
        };

        let level = self.level_mut(ticket.level);
        level.options = options;
        level.status = status;
        Applied::Installed
    }

    /// `"City, State, Country"` once the form is complete.
    pub fn summary(&self) -> Option<String> {
        let city = self.selected(Level::City)?;
        let state = self.selected(Level::State)?;
        let country = self.selected(Level::Country)?;
        Some(format!("{}, {}, {}", city, state, country))
    }

    fn assign(&mut self, level: Level, value: &str) -> Result<(), SelectError> {
        if !self.is_enabled(level) {
            return Err(SelectError::Disabled(level));
        }
        if !value.is_empty() && !self.options(level).iter().any(|o| o == value) {
            return Err(SelectError::UnknownOption {
                level,
                value: value.to_string(),
            });
        }
        self.level_mut(level).selected = (!value.is_empty()).then(|| value.to_string());
        Ok(())
    }

    fn reset_below(&mut self, level: Level) {
        let mut next = level.child();
        while let Some(child) = next {
            self.level_mut(child).reset();
            next = child.child();
        }
    }

    fn begin_fetch(&mut self, level: Level) -> Ticket {
        let country = self.level(Level::Country).selected.clone();
        let state = self.level(Level::State).selected.clone();
        let target = self.level_mut(level);
        target.status = LoadStatus::Loading;
        Ticket {
            level,
            generation: target.generation,
            country: if level > Level::Country { country } else { None },
            state: if level > Level::State { state } else { None },
        }
    }

    fn fallback_for(&self, ticket: &Ticket) -> Vec<String> {
        if self.policy == FallbackPolicy::Disabled {
            return Vec::new();
        }
        let country = ticket.country.as_deref().unwrap_or_default();
        let state = ticket.state.as_deref().unwrap_or_default();
        match ticket.level {
            Level::Country => fallback::countries(),
            Level::State => fallback::states(country),
            Level::City => fallback::cities(country, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> FetchOutcome {
        FetchOutcome::Loaded(items.iter().map(|s| s.to_string()).collect())
    }

    /// Selector with countries loaded, India selected and its states loaded.
    fn with_india(policy: FallbackPolicy) -> CascadingSelector {
        let mut sel = CascadingSelector::new(policy);
        let t = sel.load_countries();
        sel.apply(&t, list(&["India", "France"]));
        let t = sel.select_country("India").unwrap().unwrap();
        sel.apply(&t, list(&["Goa", "Kerala"]));
        sel
    }

    #[test]
    fn test_load_countries() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Disabled);
        let ticket = sel.load_countries();
        assert_eq!(ticket.level, Level::Country);
        assert_eq!(sel.status(Level::Country), &LoadStatus::Loading);
        assert!(sel.is_loading());

        assert_eq!(sel.apply(&ticket, list(&["India", "France"])), Applied::Installed);
        assert_eq!(sel.options(Level::Country), ["India", "France"]);
        assert_eq!(sel.status(Level::Country), &LoadStatus::Ready);
        assert!(!sel.is_loading());
    }

    #[test]
    fn test_country_failure_empties_list_by_default() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Disabled);
        let ticket = sel.load_countries();
        sel.apply(&ticket, FetchOutcome::Failed("500".into()));
        assert!(sel.options(Level::Country).is_empty());
        assert_eq!(sel.status(Level::Country), &LoadStatus::Failed("500".into()));

        let ticket = sel.load_countries();
        sel.apply(&ticket, FetchOutcome::Empty);
        assert!(sel.options(Level::Country).is_empty());
        assert_eq!(sel.status(Level::Country), &LoadStatus::Empty);
    }

    #[test]
    fn test_country_failure_uses_static_table() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Static);
        let ticket = sel.load_countries();
        sel.apply(&ticket, FetchOutcome::Failed("timeout".into()));
        assert_eq!(sel.options(Level::Country).len(), 300);
        assert_eq!(sel.options(Level::Country)[0], "India");
        assert!(matches!(sel.status(Level::Country), LoadStatus::Failed(_)));
    }

    #[test]
    fn test_goa_fallback_cities() {
        let mut sel = with_india(FallbackPolicy::Static);
        let ticket = sel.select_state("Goa").unwrap().unwrap();
        assert_eq!(ticket.country.as_deref(), Some("India"));
        assert_eq!(ticket.state.as_deref(), Some("Goa"));

        sel.apply(&ticket, FetchOutcome::Failed("connection refused".into()));
        let cities = sel.options(Level::City);
        assert_eq!(cities.len(), 12);
        assert_eq!(cities[0], "Panaji");
        assert_eq!(cities[11], "Cuncolim");
    }

    #[test]
    fn test_static_policy_without_table_is_empty() {
        let mut sel = with_india(FallbackPolicy::Static);
        let ticket = sel.select_state("Kerala").unwrap().unwrap();
        sel.apply(&ticket, FetchOutcome::Empty);
        assert!(sel.options(Level::City).is_empty());
    }

    #[test]
    fn test_select_country_clears_descendants() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        let t = sel.select_state("Goa").unwrap().unwrap();
        sel.apply(&t, list(&["Panaji", "Margao"]));
        sel.select_city("Margao").unwrap();

        let ticket = sel.select_country("France").unwrap().unwrap();
        assert_eq!(ticket.level, Level::State);
        assert_eq!(ticket.country.as_deref(), Some("France"));
        assert_eq!(sel.selected(Level::Country), Some("France"));
        for level in [Level::State, Level::City] {
            assert!(sel.selected(level).is_none());
            assert!(sel.options(level).is_empty());
        }
        assert_eq!(sel.status(Level::State), &LoadStatus::Loading);
    }

    #[test]
    fn test_select_state_clears_city() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        let t = sel.select_state("Goa").unwrap().unwrap();
        sel.apply(&t, list(&["Panaji"]));
        sel.select_city("Panaji").unwrap();

        let t = sel.select_state("Kerala").unwrap().unwrap();
        assert_eq!(t.level, Level::City);
        assert!(sel.selected(Level::City).is_none());
        assert!(sel.options(Level::City).is_empty());
        assert_eq!(sel.options(Level::State), ["Goa", "Kerala"]);
    }

    #[test]
    fn test_clearing_country_issues_no_fetch() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        assert_eq!(sel.select_country("").unwrap(), None);
        assert!(sel.selected(Level::Country).is_none());
        assert!(sel.options(Level::State).is_empty());
        assert_eq!(sel.status(Level::State), &LoadStatus::Idle);
        assert!(!sel.is_enabled(Level::State));
    }

    #[test]
    fn test_enabled_gating() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Disabled);
        assert!(sel.is_enabled(Level::Country));
        assert!(!sel.is_enabled(Level::State));
        assert!(!sel.is_enabled(Level::City));
        assert_eq!(sel.select_state("Goa"), Err(SelectError::Disabled(Level::State)));
        assert_eq!(sel.select_city("Panaji"), Err(SelectError::Disabled(Level::City)));

        let mut sel = with_india(FallbackPolicy::Disabled);
        assert!(sel.is_enabled(Level::State));
        assert!(!sel.is_enabled(Level::City));
        sel.select_state("Goa").unwrap();
        assert!(sel.is_enabled(Level::City));
    }

    #[test]
    fn test_unknown_option_leaves_state_alone() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        let err = sel.select_country("Atlantis").unwrap_err();
        assert!(matches!(err, SelectError::UnknownOption { level: Level::Country, .. }));
        assert_eq!(sel.selected(Level::Country), Some("India"));
        assert_eq!(sel.options(Level::State), ["Goa", "Kerala"]);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Disabled);
        let t = sel.load_countries();
        sel.apply(&t, list(&["India", "France"]));

        let india = sel.select_country("India").unwrap().unwrap();
        let france = sel.select_country("France").unwrap().unwrap();
        assert_ne!(india.generation, france.generation);

        assert_eq!(sel.apply(&france, list(&["Bretagne"])), Applied::Installed);
        assert_eq!(sel.apply(&india, list(&["Goa"])), Applied::Stale);
        assert_eq!(sel.options(Level::State), ["Bretagne"]);
        assert_eq!(sel.status(Level::State), &LoadStatus::Ready);
    }

    #[test]
    fn test_stale_city_response_after_country_change() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        let cities = sel.select_state("Goa").unwrap().unwrap();
        sel.select_country("France").unwrap();
        assert_eq!(sel.apply(&cities, list(&["Panaji"])), Applied::Stale);
        assert!(sel.options(Level::City).is_empty());
    }

    #[test]
    fn test_select_index() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        let t = sel.select_index(Level::State, Some(1)).unwrap().unwrap();
        assert_eq!(t.state.as_deref(), Some("Kerala"));
        assert_eq!(sel.select_index(Level::State, None).unwrap(), None);
        assert!(sel.selected(Level::State).is_none());
        assert!(sel.select_index(Level::State, Some(9)).is_err());
    }

    #[test]
    fn test_summary() {
        let mut sel = with_india(FallbackPolicy::Disabled);
        assert_eq!(sel.summary(), None);
        let t = sel.select_state("Goa").unwrap().unwrap();
        sel.apply(&t, list(&["Panaji"]));
        sel.select_city("Panaji").unwrap();
        assert_eq!(sel.summary().as_deref(), Some("Panaji, Goa, India"));
    }

    #[test]
    fn test_duplicate_options_are_kept_in_order() {
        let mut sel = CascadingSelector::new(FallbackPolicy::Disabled);
        let t = sel.load_countries();
        sel.apply(&t, list(&["Chad", "Chad", "Benin"]));
        assert_eq!(sel.options(Level::Country), ["Chad", "Chad", "Benin"]);
    }
}
