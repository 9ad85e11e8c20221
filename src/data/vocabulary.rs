// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Thin wrapper over a word-level tokenizers::Tokenizer that
// gives the rest of the pipeline integer token ids and back.
//
//   text_to_ids("The cat sat!")  → [1, 2, 3]
//   tokens_to_string(&[1, 2, 3]) → "the cat sat"
//
// Out-of-vocabulary words and padding both come back from the
// tokenizer as id 0 and are dropped, so unknown words vanish
// silently instead of turning into an <unk> marker.

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::padding::PAD_ID;

/// Characters stripped from text before splitting into words.
pub const FILTER_CHARS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Lowercase, blank out FILTER_CHARS, split on whitespace.
/// Must agree with the normalizer written by TokenizerStore.
pub fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if FILTER_CHARS.contains(c) { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[derive(Clone)]
pub struct Vocabulary {
    tokenizer: Tokenizer,
    num_words: usize,
}

impl Vocabulary {
    pub fn new(tokenizer: Tokenizer, num_words: usize) -> Self {
        Self { tokenizer, num_words }
    }

    /// Tokenise `text`, dropping unknown words.
    pub fn text_to_ids(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc
            .get_ids()
            .iter()
            .copied()
            .filter(|&id| id != PAD_ID && (id as usize) < self.num_words)
            .collect())
    }

    /// Id of a single word, after the same normalisation as text.
    pub fn token_id(&self, word: &str) -> Option<u32> {
        let words = split_words(word);
        match words.as_slice() {
            [w] => self.tokenizer.token_to_id(w).filter(|&id| id != PAD_ID),
            _ => None,
        }
    }

    /// Word for `id`; None for padding and unknown ids.
    pub fn token_to_word(&self, id: u32) -> Option<String> {
        if id == PAD_ID {
            return None;
        }
        self.tokenizer.id_to_token(id)
    }

    /// Join the words of `ids` with single spaces, skipping padding.
    pub fn tokens_to_string(&self, ids: &[u32]) -> String {
        ids.iter()
            .filter_map(|&id| self.token_to_word(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
