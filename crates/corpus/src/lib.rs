//! Corpus handling for Stoa.
//!
//! - [`store`] loads and validates the static collection of wisdom items
//! - [`tagging`] fills in missing tags and preferences from keyword rules
//! - [`local`] is the dependency-free selection heuristic of last resort

pub mod local;
pub mod store;
pub mod tagging;

pub use local::LocalSelector;
pub use store::Corpus;
