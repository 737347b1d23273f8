use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::models::matching::IdKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Bert,
    Stub,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bert" => Ok(EmbeddingBackend::Bert),
            "stub" => Ok(EmbeddingBackend::Stub),
            other => Err(format!("unknown embedding backend '{other}' (expected bert or stub)")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_backend: EmbeddingBackend,
    /// Directory with config.json, tokenizer.json and model.safetensors.
    pub model_dir: Option<PathBuf>,
    pub model_name: String,
    pub max_seq_len: usize,
    pub stub_dimension: usize,
    /// topN used when a request does not carry one.
    pub default_top_n: usize,
    pub id_key: IdKey,
    pub embed_timeout: Duration,
    pub embed_concurrency: usize,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let embedding_backend: EmbeddingBackend =
            parse_or(&lookup, "EMBEDDING_BACKEND", EmbeddingBackend::Bert)?;
        let model_dir = lookup("MODEL_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        if embedding_backend == EmbeddingBackend::Bert && model_dir.is_none() {
            bail!("MODEL_DIR must be set when EMBEDDING_BACKEND=bert");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 5001)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_backend,
            model_dir,
            model_name: lookup("MODEL_NAME").unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
            max_seq_len: positive_or(&lookup, "MAX_SEQ_LEN", 256)?,
            stub_dimension: positive_or(&lookup, "STUB_DIMENSION", 384)?,
            default_top_n: positive_or(&lookup, "DEFAULT_TOP_N", 5)?,
            id_key: parse_or(&lookup, "MATCH_ID_KEY", IdKey::Camel)?,
            embed_timeout: Duration::from_secs(positive_or(&lookup, "EMBED_TIMEOUT_SECS", 60)?),
            embed_concurrency: positive_or(&lookup, "EMBED_CONCURRENCY", 1)?,
            max_body_bytes: positive_or(&lookup, "MAX_BODY_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
    }
}

fn positive_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value = parse_or(lookup, key, default)?;
    if value <= T::default() {
        bail!("Environment variable '{key}' must be a positive number");
    }
    Ok(value)
}
