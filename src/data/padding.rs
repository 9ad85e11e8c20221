// ============================================================
// Layer 4 — Padding and Truncation
// ============================================================
// Every sentence becomes a token sequence of a different length,
// but a batch tensor needs one fixed width. This module picks
// that width from the corpus and forces each sequence to it.
//
// Sequence width:
//   max_tokens = floor(mean(lengths) + 2 × stddev(lengths))
//
//   Using the true maximum would let one 600-word outlier make
//   every row 600 wide. Mean + 2σ covers the vast majority of
//   sentences and truncates the long tail.
//
// Padding side decides where the zeros go:
//   Pre:  [0, 0, 0, 7, 8, 9]   (encoder — real tokens end the row)
//   Post: [7, 8, 9, 0, 0, 0]   (decoder — start marker begins the row)
//
// Truncation side decides which end is cut when too long:
//   Pre:  keep the LAST max_tokens tokens
//   Post: keep the FIRST max_tokens tokens
//
// Reference: Rust Book §8 (Vectors), §6 (Enums)

use serde::{Deserialize, Serialize};

/// Which end of a sequence padding is added to / tokens are cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Pre,
    Post,
}

/// Token id used for padding. Never assigned to a word.
pub const PAD_ID: u32 = 0;

/// Pad or truncate `tokens` to exactly `max_len` entries.
pub fn pad_sequence(tokens: &[u32], max_len: usize, padding: Side, truncating: Side) -> Vec<u32> {
    let kept: &[u32] = if tokens.len() > max_len {
        match truncating {
            Side::Pre  => &tokens[tokens.len() - max_len..],
            Side::Post => &tokens[..max_len],
        }
    } else {
        tokens
    };

    let fill = max_len - kept.len();
    let mut out = Vec::with_capacity(max_len);
    match padding {
        Side::Pre => {
            out.resize(fill, PAD_ID);
            out.extend_from_slice(kept);
        }
        Side::Post => {
            out.extend_from_slice(kept);
            out.resize(max_len, PAD_ID);
        }
    }
    out
}

/// Pad every sequence of a batch. The result is always
/// `sequences.len()` rows of exactly `max_len` tokens.
pub fn pad_batch(
    sequences:  &[Vec<u32>],
    max_len:    usize,
    padding:    Side,
    truncating: Side,
) -> Vec<Vec<u32>> {
    sequences
        .iter()
        .map(|s| pad_sequence(s, max_len, padding, truncating))
        .collect()
}

/// mean + 2 × population standard deviation of the lengths,
/// truncated toward zero. An empty corpus gives 0.
pub fn max_tokens_for(lengths: &[usize]) -> usize {
    if lengths.is_empty() {
        return 0;
    }
    let n    = lengths.len() as f64;
    let mean = lengths.iter().map(|&l| l as f64).sum::<f64>() / n;
    let var  = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean + 2.0 * var.sqrt()) as usize
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_padding() {
        assert_eq!(pad_sequence(&[7, 8], 4, Side::Pre, Side::Post), vec![0, 0, 7, 8]);
    }

    #[test]
    fn test_post_padding() {
        assert_eq!(pad_sequence(&[7, 8], 4, Side::Post, Side::Post), vec![7, 8, 0, 0]);
    }

    #[test]
    fn test_pre_truncation_keeps_tail() {
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5], 3, Side::Pre, Side::Pre), vec![3, 4, 5]);
    }

    #[test]
    fn test_post_truncation_keeps_head() {
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5], 3, Side::Post, Side::Post), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_sequence_is_all_zero() {
        assert_eq!(pad_sequence(&[], 3, Side::Pre, Side::Pre), vec![0, 0, 0]);
    }

    #[test]
    fn test_batch_width_is_fixed_for_any_input_length() {
        let seqs: Vec<Vec<u32>> = (0..20).map(|n| (1..=n).collect()).collect();
        for (padding, truncating) in [(Side::Pre, Side::Pre), (Side::Post, Side::Post)] {
            let padded = pad_batch(&seqs, 7, padding, truncating);
            assert_eq!(padded.len(), seqs.len());
            assert!(padded.iter().all(|row| row.len() == 7));
        }
    }

    #[test]
    fn test_max_tokens_matches_mean_plus_two_sigma() {
        // mean = 5, population σ = 2  →  5 + 4 = 9
        assert_eq!(max_tokens_for(&[3, 7, 3, 7]), 9);
        // σ = 0  →  mean
        assert_eq!(max_tokens_for(&[4, 4, 4]), 4);
        assert_eq!(max_tokens_for(&[]), 0);
    }
}
