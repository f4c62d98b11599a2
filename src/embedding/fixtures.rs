//! Tiny randomly initialised checkpoints written to disk, so the candle
//! loaders and the library backends run end to end without a model download.

use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use candle_transformers::models::bert::{self, BertModel};
use candle_transformers::models::xlm_roberta::{
    self, XLMRobertaForSequenceClassification, XLMRobertaModel,
};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const HIDDEN_SIZE: usize = 16;

/// WordLevel vocabulary; ids follow slice order.
const VOCAB: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "hello", "world", "cats", "dogs", "are", "great", "rust",
    "is", "fast", "the", "sky", "blue",
];

/// XLM-R special ids: `<s>` 0, `<pad>` 1, `</s>` 2.
const XLM_PAD_ID: u32 = 1;

fn bert_config_json() -> Value {
    json!({
        "model_type": "bert",
        "vocab_size": VOCAB.len(),
        "hidden_size": HIDDEN_SIZE,
        "num_hidden_layers": 2,
        "num_attention_heads": 2,
        "intermediate_size": 32,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.0,
        "max_position_embeddings": 32,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0
    })
}

fn xlm_config_json() -> Value {
    json!({
        "model_type": "xlm-roberta",
        "vocab_size": VOCAB.len(),
        "hidden_size": HIDDEN_SIZE,
        "num_hidden_layers": 2,
        "num_attention_heads": 2,
        "intermediate_size": 32,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.0,
        "attention_probs_dropout_prob": 0.0,
        "max_position_embeddings": 32,
        "type_vocab_size": 1,
        "layer_norm_eps": 1e-5,
        "pad_token_id": XLM_PAD_ID,
        "position_embedding_type": "absolute"
    })
}

fn xlm_config() -> xlm_roberta::Config {
    serde_json::from_value(xlm_config_json()).unwrap()
}

fn bert_config() -> bert::Config {
    serde_json::from_value(bert_config_json()).unwrap()
}

fn save(dir: &Path, varmap: &VarMap, config: &Value) {
    varmap.save(dir.join("model.safetensors")).unwrap();
    std::fs::write(dir.join("config.json"), config.to_string()).unwrap();
}

/// Whitespace-split WordLevel tokenizer with BERT-style `[CLS] a [SEP] b [SEP]`
/// framing.
fn write_tokenizer(dir: &Path) {
    let vocab: serde_json::Map<String, Value> = VOCAB
        .iter()
        .enumerate()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect();
    let tokenizer = json!({
        "version": "1.0",
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", 3],
            "cls": ["[CLS]", 2]
        },
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
    });
    std::fs::write(dir.join("tokenizer.json"), tokenizer.to_string()).unwrap();
}

/// BERT sentence encoder with weights at the root, as sentence-transformers
/// exports them.
pub fn bert_encoder_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    BertModel::load(vb, &bert_config()).unwrap();
    save(dir.path(), &varmap, &bert_config_json());
    write_tokenizer(dir.path());
    dir
}

/// BERT cross-encoder: `bert.*` backbone and a single-logit `classifier`.
pub fn bert_classifier_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    BertModel::load(vb.pp("bert"), &bert_config()).unwrap();
    candle_nn::linear(HIDDEN_SIZE, 1, vb.pp("classifier")).unwrap();
    save(dir.path(), &varmap, &bert_config_json());
    write_tokenizer(dir.path());
    dir
}

/// XLM-R encoder at the root, returned with the in-memory model it was saved
/// from.
pub fn xlm_encoder_dir() -> (TempDir, XLMRobertaModel) {
    let dir = TempDir::new().unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let model = XLMRobertaModel::new(&xlm_config(), vb).unwrap();
    save(dir.path(), &varmap, &xlm_config_json());
    (dir, model)
}

/// XLM-R cross-encoder (`roberta.*` plus `classifier.dense`/`out_proj`),
/// returned with the in-memory model it was saved from.
pub fn xlm_classifier_dir() -> (TempDir, XLMRobertaForSequenceClassification) {
    let dir = TempDir::new().unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let model = XLMRobertaForSequenceClassification::new(1, &xlm_config(), vb).unwrap();
    save(dir.path(), &varmap, &xlm_config_json());
    (dir, model)
}
