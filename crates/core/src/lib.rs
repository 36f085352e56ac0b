//! # Stoa Core
//!
//! Domain types, traits, and error definitions for the Stoa wisdom selection
//! engine. This crate has **no I/O**: it defines the vocabulary every other
//! crate implements against.
//!
//! ## Layout
//!
//! - [`context`]: raw sensor readings and the discrete [`Context`] derived from them
//! - [`item`]: the immutable wisdom entries held by the corpus
//! - [`provider`]: vendor enumeration and the provider configuration value
//! - [`selector`]: the `ItemSelector` contract shared by every remote tier
//! - [`signals`]: the upstream sensor collaborator

pub mod context;
pub mod error;
pub mod item;
pub mod provider;
pub mod selector;
pub mod signals;

// Re-export key types at crate root for ergonomics
pub use context::{classify, Context, PrimaryTag, RawSignals, StressLevel, TimeOfDay};
pub use error::{CorpusError, Error, Result, SelectError};
pub use item::Item;
pub use provider::{ProviderConfig, Vendor};
pub use selector::{ItemSelector, SelectionResult, Tier};
pub use signals::{SignalSource, StaticSignals};
