//! # Model Rotation
//!
//! Every generator asks the language model for JSON and parses it into a
//! typed value. [`generate_json`] walks the configured model list in
//! order; a model whose call fails (after the client's own retries) or
//! whose output does not parse is skipped. The first parsed value wins.

use astra_clients::{ClientError, LlmClient};
use astra_core::prompts::strip_code_fences;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no language models configured")]
    NoModels,

    #[error("model {model} failed: {source}")]
    Client {
        model: String,
        #[source]
        source: ClientError,
    },

    #[error("model {model} returned unparsable output: {source}")]
    Parse {
        model: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Generate with each model in turn until one yields a parsable `T`.
///
/// Returns the error from the last model tried when all fail.
pub async fn generate_json<T: DeserializeOwned>(
    llm: &LlmClient,
    system: Option<&str>,
    prompt: &str,
    temperature: f32,
) -> Result<T, EngineError> {
    let mut last_error = EngineError::NoModels;

    for model in llm.models() {
        let raw = match llm.generate(model, system, prompt, temperature).await {
            Ok(raw) => raw,
            Err(source) => {
                tracing::warn!(model = %model, error = %source, "model call failed, trying next");
                last_error = EngineError::Client {
                    model: model.clone(),
                    source,
                };
                continue;
            }
        };

        match serde_json::from_str::<T>(strip_code_fences(&raw)) {
            Ok(value) => {
                tracing::info!(model = %model, "model output parsed");
                return Ok(value);
            }
            Err(source) => {
                tracing::warn!(model = %model, error = %source, "model output did not parse, trying next");
                last_error = EngineError::Parse {
                    model: model.clone(),
                    source,
                };
            }
        }
    }

    Err(last_error)
}
