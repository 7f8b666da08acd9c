// Career analysis: model prompt, response recovery, schema, and fallback generation.
// All model calls go through llm_client; nothing here talks HTTP to the provider.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
pub(crate) mod fixtures;
