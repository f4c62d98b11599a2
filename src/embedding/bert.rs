//! BERT-family model wrappers built on `candle_transformers`.
//!
//! - [`BertEncoder`] produces mean-pooled sentence embeddings.
//! - [`BertClassifier`] produces one relevance logit per (query, document) pair.
//!
//! `model_type` in `config.json` selects the backbone: `xlm-roberta` and
//! `roberta` checkpoints run through `models::xlm_roberta`, everything else
//! through `models::bert`. Checkpoints exported from `transformers` store the
//! backbone under a `bert.` or `roberta.` prefix; sentence-transformers exports
//! keep it at the root.

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{self, BertModel};
use candle_transformers::models::xlm_roberta::{self, XLMRobertaModel};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";

#[derive(Deserialize)]
struct ModelType {
    #[serde(default)]
    model_type: Option<String>,
}

fn parse_config<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

fn var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join(WEIGHTS_FILE);
    // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
}

fn with_prefix<'a>(vb: &VarBuilder<'a>, prefix: &str) -> VarBuilder<'a> {
    if vb.contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight")) {
        vb.pp(prefix)
    } else {
        vb.clone()
    }
}

enum Backbone {
    Bert(BertModel),
    /// Position ids start after `pad_token_id` and skip padding tokens.
    XlmRoberta(XLMRobertaModel),
}

impl Backbone {
    /// Returns the backbone and its hidden size.
    fn load(model_dir: &Path, vb: &VarBuilder) -> Result<(Self, usize)> {
        let config_content = std::fs::read_to_string(model_dir.join(CONFIG_FILE))?;
        let ModelType { model_type } = parse_config(&config_content)?;

        match model_type.as_deref() {
            Some("xlm-roberta" | "roberta") => {
                let config: xlm_roberta::Config = parse_config(&config_content)?;
                let model = XLMRobertaModel::new(&config, with_prefix(vb, "roberta"))?;
                Ok((Self::XlmRoberta(model), config.hidden_size))
            }
            _ => {
                let config: bert::Config = parse_config(&config_content)?;
                let model = BertModel::load(with_prefix(vb, "bert"), &config)?;
                Ok((Self::Bert(model), config.hidden_size))
            }
        }
    }

    /// Returns token states shaped `[batch, seq_len, hidden_size]`.
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        match self {
            Self::Bert(model) => model.forward(input_ids, token_type_ids, Some(attention_mask)),
            // XLM-R has a single token type; pair encodings may still tag the
            // second segment with 1.
            Self::XlmRoberta(model) => model.forward(
                input_ids,
                attention_mask,
                &token_type_ids.zeros_like()?,
                None,
                None,
                None,
            ),
        }
    }
}

struct BertEncoderImpl {
    backbone: Backbone,
    hidden_size: usize,
}

/// Sentence encoder: transformer backbone followed by attention-masked mean pooling.
#[derive(Clone)]
pub struct BertEncoder(Arc<BertEncoderImpl>);

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let vb = var_builder(model_dir, device)?;
        let (backbone, hidden_size) = Backbone::load(model_dir, &vb)?;

        Ok(Self(Arc::new(BertEncoderImpl {
            backbone,
            hidden_size,
        })))
    }

    pub fn hidden_size(&self) -> usize {
        self.0.hidden_size
    }

    /// Returns pooled embeddings shaped `[batch, hidden_size]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .0
            .backbone
            .forward(input_ids, token_type_ids, attention_mask)?;
        mean_pool(&hidden, attention_mask)
    }
}

/// Averages token states over non-padding positions.
///
/// Every encoded sequence carries at least its special tokens, so the mask sum
/// per row is never zero.
pub fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let mask = attention_mask.to_dtype(hidden.dtype())?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?;
    summed.broadcast_div(&counts)
}

enum ClassifierHead {
    /// `classifier` linear layer directly on the [CLS] state (BERT exports).
    Linear(Linear),
    /// `classifier.dense` → tanh → `classifier.out_proj` (RoBERTa/XLM-R exports).
    Roberta { dense: Linear, out_proj: Linear },
}

impl ClassifierHead {
    fn load(vb: VarBuilder, hidden_size: usize) -> Result<Self> {
        if vb.contains_tensor("out_proj.weight") {
            Ok(Self::Roberta {
                dense: candle_nn::linear(hidden_size, hidden_size, vb.pp("dense"))?,
                out_proj: candle_nn::linear(hidden_size, 1, vb.pp("out_proj"))?,
            })
        } else {
            Ok(Self::Linear(candle_nn::linear(hidden_size, 1, vb)?))
        }
    }

    fn forward(&self, cls: &Tensor) -> Result<Tensor> {
        match self {
            Self::Linear(linear) => linear.forward(cls),
            Self::Roberta { dense, out_proj } => out_proj.forward(&dense.forward(cls)?.tanh()?),
        }
    }
}

struct BertForSequenceClassificationImpl {
    backbone: Backbone,
    head: ClassifierHead,
}

/// Cross-encoder with a single-logit sequence classification head.
#[derive(Clone)]
pub struct BertClassifier(Arc<BertForSequenceClassificationImpl>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let vb = var_builder(model_dir, device)?;
        let (backbone, hidden_size) = Backbone::load(model_dir, &vb)?;
        let head = ClassifierHead::load(vb.pp("classifier"), hidden_size)?;

        Ok(Self(Arc::new(BertForSequenceClassificationImpl { backbone, head })))
    }

    /// Returns raw logits shaped `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let output = self
            .0
            .backbone
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.0.head.forward(&cls_token)
    }
}
