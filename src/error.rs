use std::path::PathBuf;

/// Domain errors. All four kinds are fatal for their scope: configuration and
/// student-data errors abort startup/session construction, remote-call errors
/// abort the current turn.
#[derive(Debug, thiserror::Error)]
pub enum VivaError {
    #[error("OPENAI_API_KEY is not set; export it or add it to .env")]
    ConfigurationMissing,

    #[error("no {kind} data for student {student_id} (expected {path})")]
    StudentDataNotFound {
        student_id: String,
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} data for student {student_id} at {path} is not valid JSON")]
    StudentDataMalformed {
        student_id: String,
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion request failed: {0}")]
    RemoteCallFailure(String),
}

impl VivaError {
    pub(crate) fn remote(err: impl std::fmt::Display) -> Self {
        VivaError::RemoteCallFailure(err.to_string())
    }
}
