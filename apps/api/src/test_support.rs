//! Shared fixtures for unit and router tests.

use std::collections::HashMap;
use std::time::Duration;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::config::Config;
use crate::embedding::stub::tokenize;
use crate::embedding::{Embedder, EmbeddingError};
use crate::models::job::{JobId, JobRecord};

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "EMBEDDING_BACKEND" => Some("stub".to_string()),
        _ => None,
    })
    .expect("stub config is valid")
}

pub fn job(id: i64, description: &str) -> JobRecord {
    JobRecord {
        id: JobId::Number(id.into()),
        title: None,
        description: Some(description.to_string()),
        skills: None,
    }
}

const VOCABULARY_DIM: usize = 512;

/// Exact bag-of-words embedder: the vocabulary is built from the batch
/// itself, so there are no hash collisions and ranking is predictable.
pub struct VocabularyEmbedder;

impl Embedder for VocabularyEmbedder {
    fn name(&self) -> &str {
        "vocabulary"
    }

    fn dimension(&self) -> usize {
        VOCABULARY_DIM
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            let mut vector = vec![0.0_f32; VOCABULARY_DIM];
            for token in tokenize(text) {
                let next = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next);
                if index >= VOCABULARY_DIM {
                    return Err(EmbeddingError::InferenceFailed {
                        reason: "vocabulary overflow".to_string(),
                    });
                }
                vector[index] += 1.0;
            }
            vectors.push(vector);
        }
        Ok(vectors)
    }
}

pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        4
    }

    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "model unavailable".to_string(),
        })
    }
}

/// Returns the same vectors whatever the input.
pub struct FixedEmbedder(pub Vec<Vec<f32>>);

impl Embedder for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    fn dimension(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(self.0.clone())
    }
}

pub struct SlowEmbedder(pub Duration);

impl Embedder for SlowEmbedder {
    fn name(&self) -> &str {
        "slow"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        std::thread::sleep(self.0);
        Ok(vec![vec![1.0, 0.0]; texts.len()])
    }
}

/// One page per entry, each showing its text in Courier.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages.iter().map(|text| {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(*text)]),
            Operation::new("ET", vec![]),
        ]
    }))
}

/// A single page with an empty content stream, like an image-only scan.
pub fn blank_pdf() -> Vec<u8> {
    build_pdf(std::iter::once(vec![]))
}

/// A structurally valid PDF whose page tree is empty.
pub fn empty_pdf() -> Vec<u8> {
    build_pdf(std::iter::empty())
}

fn build_pdf(pages: impl Iterator<Item = Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf serializes");
    bytes
}
