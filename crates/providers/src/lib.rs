//! Providers - LLM clients behind a single plan/report contract
//!
//! - Gemini, with Google Search grounding metadata as structured sources
//! - OpenRouter chat completions, with search requested in the prompt
//! - Citation cleanup shared by both

pub mod error;
pub mod gemini;
pub mod openrouter;
pub mod router;
pub mod sources;
pub mod transport;

pub use error::ProviderError;
pub use router::{Generation, ProviderClient};
pub use sources::{normalize_sources, RawSource};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
