//! Completion service access: the gateway seam, the HTTP client and
//! validation of what comes back.

pub mod gateway;
pub mod openai;
pub mod validate;

pub use gateway::{CompletionGateway, GenerationParams, complete_with_timeout, completion_timeout};
pub use openai::OpenAiClient;
pub use validate::{GeneratedMessage, validate};
