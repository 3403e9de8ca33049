use crate::selector::{FetchOutcome, Ticket};
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A fetch task finished (successfully or not)
    OptionsLoaded {
        ticket: Ticket,
        outcome: FetchOutcome,
    },

    /// Tick for the loading spinner
    Tick,
}
