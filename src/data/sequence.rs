// ============================================================
// Layer 4 — Sequence Encoder
// ============================================================
// Turns sentences into fixed-width rows of token ids for one
// side of the corpus. It combines three things:
//
//   Vocabulary  → word → id lookup, unknown words dropped
//   reverse     → flip token order (source side only)
//   padding     → force every row to max_tokens wide
//
// Why reverse the source?
//   The encoder reads left to right and its LAST state is all
//   the decoder sees. Reversing puts the first English words
//   closest to that state, next to where decoding begins.
//
// Side settings used by this translator:
//   source: reverse, Pre padding, Pre truncation
//   target: forward, Post padding, Post truncation
//
// Reference: Sutskever et al. (2014) Sequence to Sequence Learning

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::padding::{max_tokens_for, pad_batch, pad_sequence, Side};
use crate::data::vocabulary::Vocabulary;

/// Row widths fitted on the training corpus, persisted so that
/// inference pads exactly as training did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub source_max_tokens: usize,
    pub target_max_tokens: usize,
}

#[derive(Clone)]
pub struct SequenceEncoder {
    vocab:      Vocabulary,
    reverse:    bool,
    padding:    Side,
    max_tokens: usize,
}

impl SequenceEncoder {
    /// Encoder with an explicit row width (e.g. loaded from disk).
    pub fn new(vocab: Vocabulary, reverse: bool, padding: Side, max_tokens: usize) -> Self {
        Self { vocab, reverse, padding, max_tokens }
    }

    /// Encoder whose row width is derived from `texts`, returned
    /// with the tokenised corpus so it is not tokenised twice.
    pub fn fit(
        vocab:   Vocabulary,
        texts:   &[String],
        reverse: bool,
        padding: Side,
    ) -> Result<(Self, Vec<Vec<u32>>)> {
        let mut encoder = Self::new(vocab, reverse, padding, 0);
        let tokens = texts
            .iter()
            .map(|t| encoder.tokens(t))
            .collect::<Result<Vec<_>>>()?;
        let lengths: Vec<usize> = tokens.iter().map(Vec::len).collect();
        encoder.max_tokens = max_tokens_for(&lengths);
        tracing::debug!(
            "Fitted sequence width {} over {} sentences (reverse={})",
            encoder.max_tokens,
            texts.len(),
            reverse,
        );
        Ok((encoder, tokens))
    }

    /// Truncation follows the reverse flag: a reversed row keeps its
    /// tail, which is where the sentence's first words now sit.
    pub fn truncating(&self) -> Side {
        if self.reverse { Side::Pre } else { Side::Post }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Unpadded token ids of `text`, reversed if configured.
    pub fn tokens(&self, text: &str) -> Result<Vec<u32>> {
        let mut ids = self.vocab.text_to_ids(text)?;
        if self.reverse {
            ids.reverse();
        }
        Ok(ids)
    }

    /// Pad already-tokenised ids to the row width.
    pub fn pad(&self, tokens: &[u32]) -> Vec<u32> {
        pad_sequence(tokens, self.max_tokens, self.padding, self.truncating())
    }

    /// One fixed-width row for `text`.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.pad(&self.tokens(text)?))
    }

    /// Pad already tokenised rows; shape is always (rows.len(), max_tokens).
    pub fn pad_batch(&self, tokens: &[Vec<u32>]) -> Vec<Vec<u32>> {
        pad_batch(tokens, self.max_tokens, self.padding, self.truncating())
    }
}
