use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::job::{JobId, JobRecord};

pub const MATCHED_MESSAGE: &str = "Jobs matched successfully";
pub const NO_TEXT_MESSAGE: &str = "No text found in resume";

/// Body of `POST /match`. Top-level fields are optional here so that a
/// missing field can be reported by name instead of as a generic parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub resume: Option<String>,
    pub jobs: Option<Vec<JobRecord>>,
    #[serde(default, alias = "top_n", alias = "limit")]
    pub top_n: Option<usize>,
}

/// One ranked job.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub job_id: JobId,
    pub score: f32,
}

/// Key under which the job identifier is written in the response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdKey {
    #[default]
    Camel,
    Snake,
}

impl IdKey {
    pub fn as_str(self) -> &'static str {
        match self {
            IdKey::Camel => "jobId",
            IdKey::Snake => "job_id",
        }
    }
}

impl FromStr for IdKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camel" | "jobid" => Ok(IdKey::Camel),
            "snake" | "job_id" => Ok(IdKey::Snake),
            other => Err(format!("unknown id key style '{other}' (expected camel or snake)")),
        }
    }
}

/// A [`MatchResult`] paired with the identifier key it should be written under.
pub struct KeyedMatch<'a> {
    pub result: &'a MatchResult,
    pub key: IdKey,
}

impl Serialize for KeyedMatch<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.key.as_str(), &self.result.job_id)?;
        map.serialize_entry("score", &self.result.score)?;
        map.end()
    }
}

#[derive(Serialize)]
pub struct MatchResponse<'a> {
    pub message: &'static str,
    pub matches: Vec<KeyedMatch<'a>>,
}

impl<'a> MatchResponse<'a> {
    pub fn matched(results: &'a [MatchResult], key: IdKey) -> Self {
        Self {
            message: MATCHED_MESSAGE,
            matches: results
                .iter()
                .map(|result| KeyedMatch { result, key })
                .collect(),
        }
    }

    pub fn no_text() -> Self {
        Self {
            message: NO_TEXT_MESSAGE,
            matches: vec![],
        }
    }
}
