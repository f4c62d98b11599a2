use std::io;
use std::path::Path;

use candle_core::{Device, Tensor};
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Loads a tokenizer from a model directory or explicit tokenizer.json path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else {
        model_path.join("tokenizer.json")
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer configured for batched inference.
///
/// Sequences are truncated to `max_len` and padded to the longest sequence in
/// each batch, so every encoding in a batch has the same length.
pub fn load_batch_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    // BERT vocabularies pad with [PAD], RoBERTa/XLM-R ones with <pad>.
    let (pad_id, pad_token) = match tokenizer.get_padding() {
        Some(params) => (params.pad_id, params.pad_token.clone()),
        None => ["[PAD]", "<pad>"]
            .iter()
            .find_map(|token| tokenizer.token_to_id(token).map(|id| (id, token.to_string())))
            .unwrap_or((0, "[PAD]".to_string())),
    };
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        pad_id,
        pad_token,
        ..Default::default()
    }));

    Ok(tokenizer)
}

/// Input tensors for a padded batch, each shaped `[batch, seq_len]`.
pub struct BatchTensors {
    pub input_ids: Tensor,
    pub type_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Stacks equally long encodings into `[batch, seq_len]` tensors.
pub fn batch_tensors(encodings: &[Encoding], device: &Device) -> candle_core::Result<BatchTensors> {
    let batch = encodings.len();
    let seq_len = encodings.first().map_or(0, |e| e.get_ids().len());

    let mut ids = Vec::with_capacity(batch * seq_len);
    let mut type_ids = Vec::with_capacity(batch * seq_len);
    let mut mask = Vec::with_capacity(batch * seq_len);

    for encoding in encodings {
        if encoding.get_ids().len() != seq_len {
            return Err(candle_core::Error::Msg(format!(
                "ragged batch: expected {} tokens, got {}",
                seq_len,
                encoding.get_ids().len()
            )));
        }
        ids.extend_from_slice(encoding.get_ids());
        type_ids.extend_from_slice(encoding.get_type_ids());
        mask.extend_from_slice(encoding.get_attention_mask());
    }

    Ok(BatchTensors {
        input_ids: Tensor::from_vec(ids, (batch, seq_len), device)?,
        type_ids: Tensor::from_vec(type_ids, (batch, seq_len), device)?,
        attention_mask: Tensor::from_vec(mask, (batch, seq_len), device)?,
    })
}

/// Euclidean norm of a vector.
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `vector` to unit length in place and returns its original norm.
///
/// A zero vector is left untouched.
pub fn normalize_l2(vector: &mut [f32]) -> f32 {
    let norm = l2_norm(vector);
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

/// Returns `true` if `vector` is unit length within `tolerance`.
pub fn is_unit_norm(vector: &[f32], tolerance: f32) -> bool {
    (l2_norm(vector) - 1.0).abs() <= tolerance
}
