use serde::{Deserialize, Serialize};

/// Token usage summary attached to a `final` event, when the provider reports one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUsage {
    /// Tokens in the input context.
    pub input_tokens: Option<u64>,
    /// Tokens generated in the response.
    pub output_tokens: Option<u64>,
    /// Sum of input and output tokens.
    pub total_tokens: Option<u64>,
    /// Portion of input tokens served from a prompt cache.
    pub cached_input_tokens: Option<u64>,
    /// Tokens spent on hidden reasoning.
    pub reasoning_output_tokens: Option<u64>,
    /// Number of underlying provider requests this usage aggregates.
    pub requests: Option<u32>,
}
