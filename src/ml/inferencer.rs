// ============================================================
// Layer 5 — Inferencer
// ============================================================
// NeuralTranslator owns a Seq2SeqModel plus the NmtContext it
// was trained with, and implements:
//
//   DecoderNetwork — encoder pass, then decoder logits at the
//                    last trace position
//   Translator     — clean → encode → greedy decode → words
//
// Weights are loaded opportunistically: the final trained model
// if present, else the best checkpoint, else the freshly
// initialised network (with a warning).

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::application::context::NmtContext;
use crate::data::batcher::rows_to_tensor;
use crate::domain::traits::Translator;
use crate::infra::checkpoint::{CheckpointManager, BEST_CHECKPOINT, TRAINED_MODEL};
use crate::ml::decoder::{DecoderNetwork, DecoderTrace, GreedyDecoder};
use crate::ml::model::Seq2SeqModel;

pub struct NeuralTranslator<B: Backend> {
    model:   Seq2SeqModel<B>,
    context: NmtContext,
    decoder: GreedyDecoder,
    device:  B::Device,
}

impl<B: Backend> NeuralTranslator<B> {
    pub fn new(model: Seq2SeqModel<B>, context: NmtContext, device: B::Device) -> Self {
        let decoder = context.greedy_decoder();
        Self { model, context, decoder, device }
    }

    /// Build the network described by `context` and load the best
    /// weights available in its model directory.
    pub fn from_context(context: NmtContext, device: B::Device) -> Result<Self> {
        let ckpt  = CheckpointManager::new(&context.config.model_dir);
        let model = context.model_config().init::<B>(&device);

        let model = if ckpt.has_model(TRAINED_MODEL) {
            ckpt.load_model(model, TRAINED_MODEL, &device)?
        } else if ckpt.has_model(BEST_CHECKPOINT) {
            tracing::warn!("No trained model found; falling back to the best checkpoint");
            ckpt.load_model(model, BEST_CHECKPOINT, &device)?
        } else {
            tracing::warn!(
                "No weights in '{}'; translating with an untrained network",
                ckpt.dir().display(),
            );
            model
        };

        Ok(Self::new(model, context, device))
    }

    /// Run the full greedy loop for one raw sentence.
    pub fn decode_text(&self, text: &str) -> Result<DecoderTrace> {
        let cleaned = self.context.preprocessor.clean(text);
        let row     = self.context.source.encode(&cleaned)?;
        self.decoder.decode(self, &row)
    }
}

impl<B: Backend> DecoderNetwork for NeuralTranslator<B> {
    type State = Tensor<B, 2>;

    fn encode(&self, source_row: &[u32]) -> Result<Tensor<B, 2>> {
        let input = rows_to_tensor::<B>(&[source_row], &self.device);
        Ok(self.model.encoder.forward(input))
    }

    fn next_token_scores(&self, trace: &[u32], state: &Tensor<B, 2>) -> Result<Vec<f32>> {
        let input  = rows_to_tensor::<B>(&[trace], &self.device);
        let logits = self.model.decoder.forward(input, state.clone());
        let [_, len, vocab] = logits.dims();

        logits
            .slice([0..1, len - 1..len, 0..vocab])
            .reshape([vocab])
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read decoder scores: {e:?}"))
    }
}

impl<B: Backend> Translator for NeuralTranslator<B> {
    fn translate(&self, text: &str) -> Result<String> {
        let trace = self.decode_text(text)?;
        tracing::debug!("Decoded {} tokens, stop={:?}", trace.generated().len(), trace.state());
        Ok(self.context.target.vocab().tokens_to_string(trace.generated()))
    }
}
