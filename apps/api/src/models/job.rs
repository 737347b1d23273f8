use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-owned job identifier. Kept in the JSON shape it arrived in so the
/// response echoes back exactly what was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{n}"),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

/// Skills arrive either as one free-text string or as a list of tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    List(Vec<String>),
    Text(String),
}

impl Skills {
    /// Renders the skills as a single comma-separated string, dropping blanks.
    pub fn joined(&self) -> String {
        match self {
            Skills::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Skills::Text(text) => text.trim().to_string(),
        }
    }
}

/// A job posting as supplied by the caller. Unknown fields (budget,
/// location, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "_id", alias = "job_id", alias = "jobId")]
    pub id: JobId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Option<Skills>,
}
