// Resume-to-job matching: description assembly, embedding, cosine ranking.
// Embedding goes through the shared `Embedder` in AppState; nothing here
// loads a model.

pub mod description;
pub mod handlers;
pub mod ranking;
pub mod service;

pub use service::{MatchOutcome, MatchService};
