//! Sentence embedding backends.
//!
//! `AppState` holds one `Arc<dyn Embedder>`, built once at startup by
//! [`build_embedder`] and shared read-only by every request.

pub mod bert;
pub mod device;
mod error;
pub mod stub;

use std::sync::Arc;

use crate::config::{Config, EmbeddingBackend};

pub use bert::BertEmbedder;
pub use error::EmbeddingError;
pub use stub::StubEmbedder;

/// Text to fixed-dimension vector. Implementations must be deterministic for
/// a given model and safe to call from several threads at once.
///
/// `embed_batch` is CPU-bound and blocking; async callers run it on the
/// blocking pool.
pub trait Embedder: Send + Sync {
    /// Backend or model label, reported by `/health`.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embeds every text in one call, returning vectors in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Builds the embedder selected by `EMBEDDING_BACKEND`.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.embedding_backend {
        EmbeddingBackend::Bert => {
            let model_dir =
                config
                    .model_dir
                    .as_deref()
                    .ok_or_else(|| EmbeddingError::InvalidConfig {
                        reason: "MODEL_DIR is required for the bert backend".to_string(),
                    })?;
            let embedder = BertEmbedder::load(model_dir, &config.model_name, config.max_seq_len)?;
            Ok(Arc::new(embedder))
        }
        EmbeddingBackend::Stub => Ok(Arc::new(StubEmbedder::new(config.stub_dimension)?)),
    }
}
