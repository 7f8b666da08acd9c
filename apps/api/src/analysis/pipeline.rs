//! Analysis pipeline: model call → normalizer → schema check, with the
//! fallback generator taking over on any upstream or recovery failure.

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::fallback;
use crate::analysis::models::{AnalysisResult, SchemaError};
use crate::analysis::normalizer::{normalize, NormalizeError};
use crate::analysis::prompts::analysis_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionBackend, LlmError};

/// Why the model path was abandoned. Never surfaced to clients.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error("no usable API credential is configured")]
    CredentialAbsent,

    #[error("upstream model unavailable: {0}")]
    UpstreamUnavailable(#[from] LlmError),

    #[error("unrecoverable model response: {0}")]
    UnrecoverableResponse(#[from] NormalizeError),

    #[error("model response failed schema validation: {0}")]
    SchemaMismatch(#[from] SchemaError),
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    NeedsFallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Model,
    Fallback,
}

#[derive(Debug)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
}

/// Runs the model path only. `None` means no credential was configured.
pub async fn request_analysis(
    llm: Option<&dyn CompletionBackend>,
    resume_text: &str,
) -> AnalysisOutcome {
    let Some(llm) = llm else {
        return AnalysisOutcome::NeedsFallback(FallbackReason::CredentialAbsent);
    };

    match try_model(llm, resume_text).await {
        Ok(result) => AnalysisOutcome::Completed(result),
        Err(reason) => AnalysisOutcome::NeedsFallback(reason),
    }
}

async fn try_model(
    llm: &dyn CompletionBackend,
    resume_text: &str,
) -> Result<AnalysisResult, FallbackReason> {
    let prompt = analysis_prompt(resume_text);
    let raw = llm.complete(&prompt, JSON_ONLY_SYSTEM).await?;
    info!("Model response received, {} characters", raw.len());

    let recovered = normalize(&raw)?;
    info!("Recovered JSON object at {:?} stage", recovered.stage);

    Ok(AnalysisResult::from_value(recovered.object.into())?)
}

/// Always yields a schema-valid result, falling back when the model path fails.
pub async fn analyze(llm: Option<&dyn CompletionBackend>, resume_text: &str) -> Analysis {
    match request_analysis(llm, resume_text).await {
        AnalysisOutcome::Completed(result) => Analysis {
            result,
            source: AnalysisSource::Model,
        },
        AnalysisOutcome::NeedsFallback(reason) => {
            warn!("Using fallback analysis: {reason}");
            Analysis {
                result: fallback_analysis(resume_text),
                source: AnalysisSource::Fallback,
            }
        }
    }
}

fn fallback_analysis(resume_text: &str) -> AnalysisResult {
    fallback::generate(resume_text, &mut rand::thread_rng())
}
