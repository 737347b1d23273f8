//! BERT sentence-transformer embedder (e.g. `all-MiniLM-L6-v2`).
//!
//! Expects a model directory holding `config.json`, `tokenizer.json` and
//! `model.safetensors`. Output vectors are mean-pooled over the attention
//! mask and L2-normalized, matching sentence-transformers' default pipeline.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::device::select_device;
use super::error::EmbeddingError;
use super::Embedder;

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    name: String,
    dimension: usize,
}

impl std::fmt::Debug for BertEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmbedder")
            .field("name", &self.name)
            .field("device", &self.device)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl BertEmbedder {
    /// Loads the model, tokenizer and weights from `model_dir`.
    pub fn load(
        model_dir: &Path,
        name: impl Into<String>,
        max_seq_len: usize,
    ) -> Result<Self, EmbeddingError> {
        if max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be positive".to_string(),
            });
        }

        let config_path = model_dir.join(CONFIG_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let weights_path = model_dir.join(WEIGHTS_FILE);
        for path in [&config_path, &tokenizer_path, &weights_path] {
            require_file(path)?;
        }

        let device = select_device();
        debug!(?device, "Selected compute device for embeddings");

        let config: Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to parse {}: {e}", config_path.display()),
            })?;

        let tokenizer = load_tokenizer(&tokenizer_path, max_seq_len)?;

        let weights = std::fs::read(&weights_path)?;
        let vb = VarBuilder::from_buffered_safetensors(weights, DType::F32, &device).map_err(
            |e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to read weights: {e}"),
            },
        )?;
        // sentence-transformers checkpoints store the encoder at the root,
        // HF BertModel checkpoints under "bert."
        let vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else {
            vb
        };
        let model = BertModel::load(vb, &config).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to build BERT model: {e}"),
        })?;

        let name = name.into();
        info!(
            model = %name,
            model_dir = %model_dir.display(),
            hidden_size = config.hidden_size,
            max_seq_len,
            "BERT embedding model loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            name,
            dimension: config.hidden_size,
        })
    }

    fn forward(&self, texts: &[&str]) -> Result<Tensor, EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        debug!(
            batch = texts.len(),
            seq_len = input_ids.dim(1)?,
            "Running embedding forward pass"
        );

        // [batch, seq_len, hidden]
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over real tokens only; every sequence holds at least
        // [CLS] and [SEP], so the token count is never zero.
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norms = pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        Ok(pooled.broadcast_div(&norms)?)
    }
}

impl Embedder for BertEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.forward(texts)?.to_vec2::<f32>()?)
    }
}

fn require_file(path: &Path) -> Result<(), EmbeddingError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EmbeddingError::ModelNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn load_tokenizer(path: &Path, max_seq_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to load tokenizer: {e}"),
        })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_seq_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to configure truncation: {e}"),
        })?;

    Ok(tokenizer)
}
