//! AI provider adapters.
//!
//! ```text
//! service::generate_plan
//!     |
//!     v
//! Arc<dyn PlanProvider> --generate(api_key, ProviderRequest)--> raw JSON text
//!     |
//!     +-- GeminiProvider (HTTPS, generateContent)
//! ```

pub mod gemini;
pub mod trait_def;

pub use gemini::GeminiProvider;
pub use trait_def::{PlanProvider, ProviderError, ProviderRequest};
