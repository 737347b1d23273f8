use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::matching::description::build_job_text;
use crate::matching::ranking::{cosine_similarity, rank_top_n};
use crate::models::job::JobRecord;
use crate::models::matching::MatchResult;
use crate::resume::extract_resume_text;

/// Result of a match run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Highest score first, at most `top_n` entries.
    Ranked(Vec<MatchResult>),
    /// The resume decoded and parsed but carried no extractable text
    /// (scanned or image-only).
    NoResumeText,
}

/// Ranks jobs against a resume. Holds the shared embedder plus the permits
/// that bound concurrent inference.
pub struct MatchService {
    embedder: Arc<dyn Embedder>,
    permits: Arc<Semaphore>,
    embed_timeout: Duration,
}

impl MatchService {
    pub fn new(embedder: Arc<dyn Embedder>, concurrency: usize, embed_timeout: Duration) -> Self {
        Self {
            embedder,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            embed_timeout,
        }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Full pipeline: decode, extract, embed, score, rank.
    pub async fn match_resume(
        &self,
        resume: &str,
        jobs: &[JobRecord],
        top_n: usize,
    ) -> Result<MatchOutcome, AppError> {
        validate(jobs, top_n)?;

        let resume_text = extract_resume_text(resume).await?;
        self.match_text(&resume_text, jobs, top_n).await
    }

    /// Ranks jobs against already-extracted resume text.
    pub async fn match_text(
        &self,
        resume_text: &str,
        jobs: &[JobRecord],
        top_n: usize,
    ) -> Result<MatchOutcome, AppError> {
        validate(jobs, top_n)?;

        let resume_text = resume_text.trim();
        if resume_text.is_empty() {
            info!("Resume contains no extractable text");
            return Ok(MatchOutcome::NoResumeText);
        }

        let mut texts = Vec::with_capacity(jobs.len() + 1);
        texts.push(resume_text.to_string());
        texts.extend(jobs.iter().map(build_job_text));

        let vectors = self.embed(texts).await?;
        let (resume_vector, job_vectors) = vectors
            .split_first()
            .ok_or_else(|| AppError::Processing("embedder returned no vectors".to_string()))?;

        if let Some(bad) = job_vectors.iter().find(|v| v.len() != resume_vector.len()) {
            return Err(AppError::Processing(format!(
                "embedding dimension mismatch: resume {} vs job {}",
                resume_vector.len(),
                bad.len()
            )));
        }

        let scores: Vec<f32> = job_vectors
            .iter()
            .map(|job_vector| cosine_similarity(resume_vector, job_vector))
            .collect();

        let matches: Vec<MatchResult> = rank_top_n(&scores, top_n)
            .into_iter()
            .map(|(index, score)| MatchResult {
                job_id: jobs[index].id.clone(),
                score,
            })
            .collect();

        info!(
            jobs = jobs.len(),
            matches = matches.len(),
            top_score = matches.first().map(|m| m.score),
            "Ranked jobs against resume"
        );
        Ok(MatchOutcome::Ranked(matches))
    }

    /// One batched embedding call on the blocking pool, bounded by the
    /// inference permits and the configured timeout. The timeout covers the
    /// wait for a permit as well as inference. The permit travels with the
    /// blocking task so a timed-out call still holds it until it ends.
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let expected = texts.len();
        let permits = Arc::clone(&self.permits);
        let embedder = Arc::clone(&self.embedder);

        let work = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| AppError::Processing(format!("embedding unavailable: {e}")))?;

            debug!(texts = expected, "Embedding resume and job texts");
            let task = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                embedder.embed_batch(&refs)
            });

            task.await
                .map_err(|e| AppError::Processing(format!("embedding task failed: {e}")))?
                .map_err(AppError::from)
        };

        let vectors = tokio::time::timeout(self.embed_timeout, work)
            .await
            .map_err(|_| {
                AppError::Processing(format!(
                    "embedding timed out after {}s",
                    self.embed_timeout.as_secs_f32()
                ))
            })??;

        if vectors.len() != expected {
            return Err(AppError::Processing(format!(
                "embedder returned {} vectors for {expected} texts",
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

fn validate(jobs: &[JobRecord], top_n: usize) -> Result<(), AppError> {
    if jobs.is_empty() {
        return Err(AppError::Validation(
            "Jobs list must not be empty".to_string(),
        ));
    }
    if top_n == 0 {
        return Err(AppError::Validation(
            "topN must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
