//! Generation service boundary: prompt construction and the [`Generator`]
//! adapter interface.
//!
//! The engine treats the service as opaque text-in/text-out. A concrete
//! adapter is constructed by the caller and injected as `Arc<dyn Generator>`,
//! which lets tests substitute doubles that return canned or malformed text.
//!
//! ```text
//! Planner
//!     |
//!     | build_prompt(tasks, range_text)
//!     v
//! GenerationRequest { prompt, max_output_length, temperature, top_p, .. }
//!     |
//!     v
//! &dyn Generator --generate()--> GenerationResponse { text }
//!     |                               (HttpGenerator, CommandGenerator, ...)
//!     v
//! schedule::reconcile
//! ```

pub mod command;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

pub use command::CommandGenerator;
pub use http::{HttpGenerator, HttpGeneratorConfig};

/// Example line embedded in the prompt to show the expected format.
pub const FORMAT_EXAMPLE: &str = "8:00 AM - 9:00 AM: Task";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Upper bound on generated length (tokens for model-backed services).
    pub max_output_length: usize,
    /// Always 1: the engine consumes exactly one completion.
    pub num_completions: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Whether the service may truncate an over-long prompt.
    pub truncate: bool,
}

/// The text returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
}

/// Sampling parameters applied to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_output_length: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub truncate: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_output_length: 200,
            temperature: 0.7,
            top_p: 0.9,
            truncate: true,
        }
    }
}

impl GenerationSettings {
    /// Build a request for `prompt` with these settings.
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.into(),
            max_output_length: self.max_output_length,
            num_completions: 1,
            temperature: self.temperature,
            top_p: self.top_p,
            truncate: self.truncate,
        }
    }
}

/// Failures of the generation call itself.
///
/// Unusable text is not an error at this layer; it is handled by
/// reconciliation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("http error: {0}")]
    Http(String),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to spawn {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error talking to {program:?}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program:?} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },
}

// ---------------------------------------------------------------------------
// Adapter interface
// ---------------------------------------------------------------------------

/// Adapter interface for a text generation service.
///
/// Object-safe so it can be held as `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short name for logs (e.g. "http", "command").
    fn name(&self) -> &str;

    /// Run one request to completion.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Build the scheduling instruction for the generation service.
pub fn build_prompt(tasks: &[Task], range_text: &str) -> String {
    let task_list = tasks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Create a daily schedule for the following tasks: {task_list}.\n\
         Available time: {range_text}.\n\
         Format the schedule as a list with time slots and tasks, e.g., '{FORMAT_EXAMPLE}'.\n\
         Respect the task durations and spread tasks within the time range.\n"
    )
}
