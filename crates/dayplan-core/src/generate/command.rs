//! Subprocess generator.
//!
//! Runs a configured program, writes the prompt to its stdin, and returns
//! its stdout as the completion. Sampling parameters are exported as
//! `DAYPLAN_*` environment variables so wrapper scripts around local model
//! runners can pick them up.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{GenerationError, GenerationRequest, GenerationResponse, Generator};

/// Generator that shells out to an external program.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn io_error(&self, source: std::io::Error) -> GenerationError {
        GenerationError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("DAYPLAN_MAX_LENGTH", request.max_output_length.to_string())
            .env("DAYPLAN_NUM_COMPLETIONS", request.num_completions.to_string())
            .env("DAYPLAN_TEMPERATURE", request.temperature.to_string())
            .env("DAYPLAN_TOP_P", request.top_p.to_string())
            .env("DAYPLAN_TRUNCATE", request.truncate.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GenerationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(program = %self.program, pid = ?child.id(), "spawned generator process");

        // Feed stdin while stdout and stderr drain, so a program that echoes
        // as it reads cannot fill its output pipe and stall the write.
        let stdin = child.stdin.take();
        let prompt = request.prompt.as_bytes();
        let write_prompt = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(prompt).await {
                Ok(()) => Ok(()),
                // The program exited without reading; its exit status decides.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(program = %self.program, "generator closed stdin early");
                    Ok(())
                }
                Err(e) => Err(e),
            }
            // `stdin` drops here, closing the pipe so the program sees EOF.
        };

        let (written, output) = tokio::join!(write_prompt, child.wait_with_output());
        written.map_err(|e| self.io_error(e))?;
        let output = output.map_err(|e| self.io_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(program = %self.program, status = %output.status, "generator process failed");
            return Err(GenerationError::ExitStatus {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        Ok(GenerationResponse { text })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::generate::GenerationSettings;

    fn sh(script: &str) -> CommandGenerator {
        CommandGenerator::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn returns_stdout_as_completion() {
        let generator = CommandGenerator::new("cat", vec![]);
        let request = GenerationSettings::default().request("8:00 AM - 9:00 AM: gym\n");
        let response = generator.generate(&request).await.unwrap();
        assert_eq!(response.text, "8:00 AM - 9:00 AM: gym\n");
    }

    #[tokio::test]
    async fn exports_sampling_parameters() {
        let generator = sh("cat > /dev/null; echo \"$DAYPLAN_MAX_LENGTH $DAYPLAN_TOP_P $DAYPLAN_NUM_COMPLETIONS\"");
        let request = GenerationSettings::default().request("x");
        let response = generator.generate(&request).await.unwrap();
        assert_eq!(response.text.trim(), "200 0.9 1");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let generator = sh("echo model crashed >&2; exit 3");
        let request = GenerationSettings::default().request("x");
        let err = generator.generate(&request).await.unwrap_err();
        match err {
            GenerationError::ExitStatus { stderr, .. } => assert_eq!(stderr, "model crashed"),
            other => panic!("expected ExitStatus, got: {other}"),
        }
    }

    #[tokio::test]
    async fn large_prompt_streams_through_without_stalling() {
        let generator = CommandGenerator::new("cat", vec![]);
        let prompt = "8:00 AM - 9:00 AM: gym\n".repeat(50_000);
        let request = GenerationSettings::default().request(prompt.clone());
        let response = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            generator.generate(&request),
        )
        .await
        .expect("generate stalled on a prompt larger than the pipe buffer")
        .unwrap();
        assert_eq!(response.text.len(), prompt.len());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let generator = CommandGenerator::new("/nonexistent/dayplan-model", vec![]);
        let request = GenerationSettings::default().request("x");
        let err = generator.generate(&request).await.unwrap_err();
        assert!(
            matches!(err, GenerationError::Spawn { .. }),
            "expected Spawn, got: {err}"
        );
    }
}
