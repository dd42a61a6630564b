//! Content generation: prompts, the provider seam and its implementations.

pub mod fixed;
pub mod gemini;
pub mod prompt;
pub mod provider;

pub use fixed::FixedProvider;
pub use gemini::GeminiProvider;
pub use provider::{BLURB_FALLBACK, ContentProvider};
