use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::VivaError;

/// Per-student context, loaded once at session construction and immutable
/// afterwards. Two files under the data directory feed it:
/// `midterm/<id>.json` (topic -> weakness description) and `mygpt/<id>.json`
/// (category -> ordered question list).
#[derive(Debug, Clone)]
pub struct StudentContext {
    pub student_id: String,
    pub midterm_weaknesses: BTreeMap<String, Value>,
    pub prior_questions: BTreeMap<String, Vec<String>>,
}

impl StudentContext {
    /// Loads both per-student files. All-or-nothing: if either file is
    /// missing or malformed, no context is returned.
    pub fn load(data_dir: &Path, student_id: &str) -> Result<Self, VivaError> {
        let midterm_path = data_dir.join("midterm").join(format!("{student_id}.json"));
        let mygpt_path = data_dir.join("mygpt").join(format!("{student_id}.json"));

        let midterm_weaknesses = read_json(&midterm_path, student_id, "midterm")?;
        let prior_questions = read_json(&mygpt_path, student_id, "prior-questions")?;

        info!(student_id, "Loaded student context");

        Ok(Self {
            student_id: student_id.to_string(),
            midterm_weaknesses,
            prior_questions,
        })
    }

    /// Flattens the midterm map as one `key: value` line per topic. String
    /// values are rendered bare; anything else keeps its JSON text.
    pub fn render_midterm(&self) -> String {
        let mut result = String::new();
        for (key, value) in &self.midterm_weaknesses {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            result.push_str(&format!("{key}: {rendered}\n"));
        }
        result
    }

    /// Flattens the prior questions per category as a 1-based numbered list,
    /// with a blank line between categories.
    pub fn render_prior_questions(&self) -> String {
        let mut result = String::new();
        for (category, questions) in &self.prior_questions {
            result.push_str(&format!("{category}:\n\n"));
            for (idx, question) in questions.iter().enumerate() {
                result.push_str(&format!("{}. {question}\n", idx + 1));
            }
            result.push('\n');
        }
        result
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &PathBuf,
    student_id: &str,
    kind: &'static str,
) -> Result<T, VivaError> {
    let raw = fs::read_to_string(path).map_err(|source| VivaError::StudentDataNotFound {
        student_id: student_id.to_string(),
        kind,
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| VivaError::StudentDataMalformed {
        student_id: student_id.to_string(),
        kind,
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_student_files(dir: &Path, student_id: &str, midterm: &str, mygpt: &str) {
        fs::create_dir_all(dir.join("midterm")).unwrap();
        fs::create_dir_all(dir.join("mygpt")).unwrap();
        fs::write(dir.join("midterm").join(format!("{student_id}.json")), midterm).unwrap();
        fs::write(dir.join("mygpt").join(format!("{student_id}.json")), mygpt).unwrap();
    }

    #[test]
    fn test_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        write_student_files(
            dir.path(),
            "111403538",
            r#"{"recursion": "weak"}"#,
            r#"{"loops": ["why use a for-loop?", "what is an infinite loop?"]}"#,
        );

        let ctx = StudentContext::load(dir.path(), "111403538").unwrap();
        assert_eq!(ctx.student_id, "111403538");

        let midterm = ctx.render_midterm();
        assert!(midterm.contains("recursion: weak"));

        let questions = ctx.render_prior_questions();
        assert!(questions.contains("loops:"));
        assert!(questions.contains("1. why use a for-loop?"));
        assert!(questions.contains("2. what is an infinite loop?"));
    }

    #[test]
    fn test_non_string_midterm_values_keep_json_text() {
        let dir = tempfile::tempdir().unwrap();
        write_student_files(
            dir.path(),
            "s1",
            r#"{"score": 42, "topics": ["a", "b"]}"#,
            r#"{}"#,
        );

        let ctx = StudentContext::load(dir.path(), "s1").unwrap();
        let midterm = ctx.render_midterm();
        assert!(midterm.contains("score: 42"));
        assert!(midterm.contains(r#"topics: ["a","b"]"#));
    }

    #[test]
    fn test_missing_midterm_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("mygpt")).unwrap();
        fs::write(dir.path().join("mygpt").join("s2.json"), "{}").unwrap();

        let err = StudentContext::load(dir.path(), "s2").unwrap_err();
        assert!(matches!(err, VivaError::StudentDataNotFound { kind: "midterm", .. }));
    }

    #[test]
    fn test_missing_mygpt_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("midterm")).unwrap();
        fs::write(dir.path().join("midterm").join("s3.json"), "{}").unwrap();

        let err = StudentContext::load(dir.path(), "s3").unwrap_err();
        assert!(matches!(err, VivaError::StudentDataNotFound { kind: "prior-questions", .. }));
    }

    #[test]
    fn test_malformed_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_student_files(dir.path(), "s4", "not json at all", "{}");

        let err = StudentContext::load(dir.path(), "s4").unwrap_err();
        assert!(matches!(err, VivaError::StudentDataMalformed { kind: "midterm", .. }));
    }
}
