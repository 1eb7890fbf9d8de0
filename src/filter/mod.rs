//! Record filter and projector
//!
//! Keeps records where `species == "Human"`, `status == "Alive"` and
//! `origin.name` starts with `"Earth"`, then projects them to
//! `{name, location, image}`. The criteria are configurable; the defaults
//! are the values above.

mod predicate;
mod types;

pub use predicate::RecordFilter;
pub use types::FilterCriteria;
