//! Search module.
//!
//! Case-insensitive substring search and the suggestion list state.

pub mod filter;
mod state;

pub use filter::{filter, matches};
pub use state::SearchState;
