use super::*;
use crate::embedding::fixtures::{self, HIDDEN_SIZE};
use std::path::PathBuf;
use tempfile::TempDir;

fn model_dir_with(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        std::fs::write(dir.path().join(file), b"{}").unwrap();
    }
    dir
}

#[test]
fn test_known_dimension_table() {
    assert_eq!(known_dimension("intfloat/multilingual-e5-large"), Some(1024));
    assert_eq!(known_dimension("sentence-transformers/all-MiniLM-L6-v2"), Some(384));
    assert_eq!(known_dimension("nomic-ai/nomic-embed-text-v1.5"), Some(768));
    assert_eq!(known_dimension("unknown/model"), None);
}

#[test]
fn test_config_new_defaults() {
    let config = LocalEmbedderConfig::new("intfloat/e5-large-v2", "/models/e5");

    assert_eq!(config.model_name, "intfloat/e5-large-v2");
    assert_eq!(config.model_dir, PathBuf::from("/models/e5"));
    assert_eq!(config.max_seq_len, crate::constants::DEFAULT_MAX_SEQ_LEN);
}

#[test]
fn test_validate_missing_directory() {
    let config = LocalEmbedderConfig::new("m", "/nonexistent/embedder/model");

    assert!(matches!(
        config.validate(),
        Err(EmbeddingError::ModelNotFound { .. })
    ));
}

#[test]
fn test_validate_missing_weights() {
    let dir = model_dir_with(&["config.json", "tokenizer.json"]);
    let config = LocalEmbedderConfig::new("m", dir.path());

    match config.validate() {
        Err(EmbeddingError::ModelLoadFailed { reason }) => {
            assert!(reason.contains("model.safetensors"), "got: {reason}");
        }
        other => panic!("expected ModelLoadFailed, got {other:?}"),
    }
}

#[test]
fn test_validate_zero_seq_len() {
    let dir = model_dir_with(&["config.json", "model.safetensors", "tokenizer.json"]);
    let config = LocalEmbedderConfig::new("m", dir.path()).with_max_seq_len(0);

    assert!(matches!(
        config.validate(),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_load_missing_model_fails() {
    let result = LocalEmbedder::load(LocalEmbedderConfig::new("m", "/nonexistent/path"));

    assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
}

#[test]
fn test_load_corrupt_model_fails() {
    let dir = model_dir_with(&["config.json", "model.safetensors", "tokenizer.json"]);
    let result = LocalEmbedder::load(LocalEmbedderConfig::new("m", dir.path()));

    assert!(matches!(
        result,
        Err(EmbeddingError::ModelLoadFailed { .. })
    ));
}

#[test]
fn test_load_known_model_with_wrong_dimension_fails() {
    let dir = fixtures::bert_encoder_dir();
    let config = LocalEmbedderConfig::new("sentence-transformers/all-MiniLM-L6-v2", dir.path());

    match LocalEmbedder::load(config) {
        Err(EmbeddingError::InvalidConfig { reason }) => {
            assert!(reason.contains("384"), "got: {reason}");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[tokio::test]
async fn test_embed_returns_unit_vectors_of_hidden_size() {
    let dir = fixtures::bert_encoder_dir();
    let embedder = LocalEmbedder::load(LocalEmbedderConfig::new("tiny", dir.path())).unwrap();
    let texts = vec![
        "hello world".to_string(),
        "cats are great and dogs are great too".to_string(),
        "rust".to_string(),
    ];

    let vectors = embedder.embed(&texts).await.unwrap();

    assert_eq!(embedder.dimension(), Some(HIDDEN_SIZE));
    assert_eq!(vectors.len(), texts.len());
    for vector in &vectors {
        assert_eq!(vector.len(), HIDDEN_SIZE);
        assert!(is_unit_norm(vector, NORM_TOLERANCE), "norm {}", l2_norm(vector));
    }
    assert_ne!(vectors[0], vectors[2]);
}

#[tokio::test]
async fn test_padded_batch_matches_texts_embedded_alone() {
    let dir = fixtures::bert_encoder_dir();
    let embedder = LocalEmbedder::load(LocalEmbedderConfig::new("tiny", dir.path())).unwrap();
    let texts = vec![
        "the sky is blue".to_string(),
        "rust".to_string(),
        "hello world hello world cats".to_string(),
    ];

    let batched = embedder.embed(&texts).await.unwrap();

    for (text, vector) in texts.iter().zip(&batched) {
        let alone = embedder.embed(std::slice::from_ref(text)).await.unwrap();
        for (a, b) in alone[0].iter().zip(vector) {
            assert!((a - b).abs() < 1e-4, "{text}: {a} vs {b}");
        }
    }
}

#[tokio::test]
async fn test_long_text_is_truncated() {
    let dir = fixtures::bert_encoder_dir();
    let config = LocalEmbedderConfig::new("tiny", dir.path()).with_max_seq_len(8);
    let embedder = LocalEmbedder::load(config).unwrap();
    let long_text = vec!["cats are great ".repeat(20)];

    let vectors = embedder.embed(&long_text).await.unwrap();

    assert_eq!(vectors[0].len(), HIDDEN_SIZE);
    assert!(is_unit_norm(&vectors[0], NORM_TOLERANCE));
}
