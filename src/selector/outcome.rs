/// Result of fetching one option list, as seen by the selector.
///
/// Transport details are flattened away: the selector only needs to know
/// whether it got options, got nothing, or got an error worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(Vec<String>),
    Empty,
    Failed(String),
}

impl FetchOutcome {
    /// Classify a decoded list. An empty array is `Empty`, never `Loaded`.
    pub fn from_list(items: Vec<String>) -> Self {
        if items.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Loaded(items)
        }
    }
}

impl<E: std::fmt::Display> From<Result<Vec<String>, E>> for FetchOutcome {
    fn from(result: Result<Vec<String>, E>) -> Self {
        match result {
            Ok(items) => FetchOutcome::from_list(items),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}
