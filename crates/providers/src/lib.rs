//! Remote selection tiers for Stoa.
//!
//! Every adapter implements `stoa_core::ItemSelector`. The registry turns a
//! `ProviderConfig` into the matching [`ProviderClient`] variant; the
//! retrieval client stands alone.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;
pub mod prompt;
pub mod registry;
pub mod retrieval;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use registry::{ProviderClient, ProviderRegistry};
pub use retrieval::RetrievalClient;
