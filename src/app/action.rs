use crate::selector::{Level, Ticket};

#[derive(Debug, PartialEq)]
pub enum Action {
    Fetch(Ticket),
    CancelFrom(Level),
    Quit,
}
