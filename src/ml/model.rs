// ============================================================
// Layer 5 — GRU Encoder-Decoder
// ============================================================
//
//   encoder_input [B, S] ─► Embedding ─► GRU ─► GRU ─► GRU ─► last step
//                                                               │
//                                                       encoder state [B, H]
//                                                               │
//   decoder_input [B, T] ─► Embedding ─► GRU ─► GRU ─► GRU ─► Linear ─► logits [B, T, V]
//                                         ▲      ▲      ▲
//                                         └──────┴──────┴── initial state = encoder state
//
// Every decoder GRU starts from the same encoder state. The
// encoder and decoder are separate modules so inference can run
// the encoder once per sentence and the decoder once per step.

use burn::{
    nn::{
        gru::{Gru, GruConfig},
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

use crate::data::padding::PAD_ID;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    pub source_vocab:   usize,
    pub target_vocab:   usize,
    pub embedding_size: usize,
    pub state_size:     usize,
    pub num_layers:     usize,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        let encoder = Encoder {
            embedding: EmbeddingConfig::new(self.source_vocab, self.embedding_size).init(device),
            layers:    self.build_grus(device),
        };
        let decoder = Decoder {
            embedding: EmbeddingConfig::new(self.target_vocab, self.embedding_size).init(device),
            layers:    self.build_grus(device),
            output:    LinearConfig::new(self.state_size, self.target_vocab).init(device),
        };
        Seq2SeqModel { encoder, decoder }
    }

    fn build_grus<B: Backend>(&self, device: &B::Device) -> Vec<Gru<B>> {
        (0..self.num_layers)
            .map(|i| {
                let d_input = if i == 0 { self.embedding_size } else { self.state_size };
                GruConfig::new(d_input, self.state_size, true).init(device)
            })
            .collect()
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<Gru<B>>,
}

impl<B: Backend> Encoder<B> {
    /// tokens: [batch, seq_len] → state: [batch, state_size]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let mut x = self.embedding.forward(tokens);
        for layer in &self.layers {
            x = layer.forward(x, None);
        }
        last_step(x)
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<Gru<B>>,
    pub output:    Linear<B>,
}

impl<B: Backend> Decoder<B> {
    /// tokens: [batch, seq_len], state: [batch, state_size]
    ///   → logits: [batch, seq_len, target_vocab]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>, state: Tensor<B, 2>) -> Tensor<B, 3> {
        let mut x = self.embedding.forward(tokens);
        for layer in &self.layers {
            x = layer.forward(x, Some(state.clone()));
        }
        self.output.forward(x)
    }
}

/// Hidden state at the final time step: [B, S, H] → [B, H].
/// The source is pre-padded, so the final step is the last real token.
fn last_step<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch, seq_len, hidden] = x.dims();
    x.slice([0..batch, seq_len - 1..seq_len, 0..hidden])
        .reshape([batch, hidden])
}

#[derive(Module, Debug)]
pub struct Seq2SeqModel<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

impl<B: Backend> Seq2SeqModel<B> {
    /// Teacher-forced forward pass used for training and validation.
    pub fn forward(
        &self,
        encoder_input: Tensor<B, 2, Int>,
        decoder_input: Tensor<B, 2, Int>,
    ) -> Tensor<B, 3> {
        let state = self.encoder.forward(encoder_input);
        self.decoder.forward(decoder_input, state)
    }

    /// Sparse softmax cross-entropy averaged over the non-padding targets.
    /// Returns (loss [1], logits [B, T, V]).
    pub fn forward_loss(
        &self,
        encoder_input:  Tensor<B, 2, Int>,
        decoder_input:  Tensor<B, 2, Int>,
        decoder_target: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 3>) {
        let logits = self.forward(encoder_input, decoder_input);
        let loss   = sequence_loss(logits.clone(), decoder_target);
        (loss, logits)
    }
}

/// Flatten [B, T, V] logits and [B, T] targets and average the
/// cross-entropy over the non-padding targets only.
///
/// burn's pad_tokens zeroes padded rows but still divides by
/// B·T, so the mean is rescaled by B·T / (real targets).
pub fn sequence_loss<B: Backend>(logits: Tensor<B, 3>, targets: Tensor<B, 2, Int>) -> Tensor<B, 1> {
    let [batch, seq_len, vocab] = logits.dims();
    let rows = batch * seq_len;

    let ce = CrossEntropyLossConfig::new()
        .with_pad_tokens(Some(vec![PAD_ID as usize]))
        .init(&logits.device());
    let padded_mean = ce.forward(
        logits.reshape([rows, vocab]),
        targets.clone().reshape([rows]),
    );

    let real = targets
        .greater_elem(PAD_ID as i32)
        .int()
        .sum()
        .float()
        .clamp_min(1.0);
    padded_mean.mul_scalar(rows as f32).div(real)
}
