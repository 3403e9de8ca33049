pub mod fallback;
pub mod machine;
pub mod outcome;

pub use fallback::FallbackPolicy;
pub use machine::{Applied, CascadingSelector, Level, LoadStatus, Ticket};
pub use outcome::FetchOutcome;
