use std::path::Path;

use tracing::{info, instrument};

use crate::completion::CompletionClient;
use crate::constants;
use crate::error::VivaError;
use crate::prompt::build_system_instruction;
use crate::student::StudentContext;
use crate::transcript::Transcript;

/// One interview run for one student. Owns the system instruction (built once
/// from the student context), the transcript, and the completion client.
/// Construction is all-or-nothing: if either per-student file fails to load,
/// no session exists. Reuse across students means constructing a new session.
#[derive(Debug)]
pub struct InterviewSession {
    student_id: String,
    system_instruction: String,
    transcript: Transcript,
    client: CompletionClient,
    model: String,
}

impl InterviewSession {
    pub fn new(
        data_dir: &Path,
        student_id: &str,
        client: CompletionClient,
    ) -> Result<Self, VivaError> {
        let context = StudentContext::load(data_dir, student_id)?;
        let system_instruction = build_system_instruction(&context);

        info!(student_id, "Interview session created");

        Ok(Self {
            student_id: student_id.to_string(),
            system_instruction,
            transcript: Transcript::new(),
            client,
            model: constants::VIVA_MODEL.clone(),
        })
    }

    /// Runs one turn: appends the user's text to the transcript, asks the
    /// model for the next interviewer turn, appends and returns it.
    ///
    /// If the remote call fails, the user turn stays in the transcript; the
    /// caller sees the error and the next submission continues from there.
    #[instrument(skip(self, user_text), fields(student_id = %self.student_id))]
    pub async fn start_turn(&mut self, user_text: &str) -> Result<String, VivaError> {
        self.transcript.push(user_text);

        let reply = self
            .client
            .complete(
                &self.system_instruction,
                &self.transcript.render(),
                &self.model,
                constants::TEMPERATURE,
            )
            .await?;

        self.transcript.push(reply.clone());

        Ok(reply)
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
