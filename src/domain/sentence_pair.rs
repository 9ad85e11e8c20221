// ============================================================
// Layer 3 — SentencePair Domain Type
// ============================================================
// One line of a parallel corpus: the source sentence and the
// target sentence on the same line number of the two files.
//
// Example:
//   source: "Thank you so much ."
//   target: "Cảm ơn rất nhiều ."

use serde::{Deserialize, Serialize};

/// An aligned source/target sentence pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Sentence in the source language (English)
    pub source: String,

    /// Sentence in the target language (Vietnamese)
    pub target: String,
}

impl SentencePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Split a list of pairs into the two parallel columns.
pub fn unzip_pairs(pairs: &[SentencePair]) -> (Vec<String>, Vec<String>) {
    pairs
        .iter()
        .map(|p| (p.source.clone(), p.target.clone()))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unzip_keeps_line_alignment() {
        let pairs = vec![
            SentencePair::new("hello", "xin chào"),
            SentencePair::new("thank you", "cảm ơn"),
        ];
        let (src, tgt) = unzip_pairs(&pairs);
        assert_eq!(src, vec!["hello", "thank you"]);
        assert_eq!(tgt, vec!["xin chào", "cảm ơn"]);
    }
}
