// Constants, partly loaded from environment variables.

use std::env;
use std::time::Duration;

// Use lazy_static to initialize env-backed statics safely.
lazy_static::lazy_static! {
    pub static ref OPENAI_API_BASE: String = env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com".to_string());
    pub static ref VIVA_MODEL: String = env::var("VIVA_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
    pub static ref VIVA_DATA_DIR: String = env::var("VIVA_DATA_DIR").unwrap_or_else(|_| ".".to_string());
}

/// Temperature used for every completion call in a session.
pub const TEMPERATURE: f32 = 0.6;

/// First entry of every transcript.
pub const TRANSCRIPT_HEADER: &str = "# 使用者與AI的對話內容";

/// Seed phrase submitted as the very first user turn, before any human input.
pub const OPENING_TRIGGER: &str = "開始口試";

/// Label shown next to user turns in the chat log.
pub const USER_SPEAKER: &str = "你";

/// Label shown next to assistant turns in the chat log.
pub const ASSISTANT_SPEAKER: &str = "AI";

/// Upper bound on a single completion call. There is no streaming here, so a
/// stuck request would otherwise hang the turn forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
