pub mod completion;
pub mod constants;
pub mod error;
pub mod prompt;
pub mod session;
pub mod student;
pub mod transcript;
pub mod web_server;

pub use completion::CompletionClient;
pub use error::VivaError;
pub use session::InterviewSession;
pub use student::StudentContext;
pub use transcript::Transcript;
