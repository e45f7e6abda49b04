use crate::constants::TRANSCRIPT_HEADER;

/// Ordered, append-only sequence of turn strings, mixed speaker, starting
/// with a fixed header marker. Grows for the lifetime of one session, never
/// truncated or edited. Unbounded by design: long sessions grow the rendered
/// context linearly.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: vec![TRANSCRIPT_HEADER.to_string()],
        }
    }

    /// Appends `text` verbatim. No size cap, no deduplication, no validation.
    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
    }

    /// Newline-joins all entries in insertion order. Idempotent between
    /// pushes: repeated calls yield identical output.
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }

    /// Number of entries, including the header marker.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
