//! Shared test utilities for dayplan integration tests.
//!
//! Provides [`Generator`] doubles that return canned text or fail outright,
//! so the engine's generated, fallback, and error paths can be exercised
//! without a real service.

use std::sync::Mutex;

use async_trait::async_trait;

use dayplan_core::generate::{GenerationError, GenerationRequest, GenerationResponse, Generator};

/// Task list used throughout the examples.
pub const EXAMPLE_TASKS: &str = "gym: 1h, write report: 2h, call friend";
/// Availability window used throughout the examples.
pub const EXAMPLE_RANGE: &str = "8 AM–6 PM";

/// Returns the same text for every request and records each request.
#[derive(Debug, Default)]
pub struct CannedGenerator {
    text: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl CannedGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Generator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
        Ok(GenerationResponse {
            text: self.text.clone(),
        })
    }
}

/// Fails every request as if the service were unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Err(GenerationError::Http("service unavailable".to_string()))
    }
}

/// Echoes the prompt back, like a model that returns its full input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        Ok(GenerationResponse {
            text: request.prompt.clone(),
        })
    }
}
