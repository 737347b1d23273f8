use crate::models::job::{JobRecord, Skills};

const SEPARATOR: &str = ". ";

/// Builds the text that represents a job during embedding: title,
/// description and comma-joined skills, skipping blank parts.
pub fn build_job_text(job: &JobRecord) -> String {
    let skills = job.skills.as_ref().map(Skills::joined).unwrap_or_default();
    let parts = [
        job.title.as_deref().unwrap_or(""),
        job.description.as_deref().unwrap_or(""),
        skills.as_str(),
    ];

    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim()
        .to_string()
}
