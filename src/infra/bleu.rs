// ============================================================
// Layer 6 — Sentence BLEU
// ============================================================
// Smoothed sentence-level BLEU for a single reference:
//
//   p_n  = clipped n-gram matches / hypothesis n-grams   (n = 1..4)
//   BP   = 1                   if c > r
//          exp(1 - r / c)      otherwise
//   BLEU = BP · exp( Σ w_n · ln p_n ),   w_n = 1/4
//
// Smoothing "method 1": a precision with zero matches becomes
// ε / max(1, hypothesis n-grams), ε = 0.1. A hypothesis sharing
// no unigram with the reference scores 0.
//
// Reference: Papineni et al. (2002) BLEU
//            Chen & Cherry (2014) A Systematic Comparison of
//            Smoothing Techniques for Sentence-Level BLEU

use std::collections::HashMap;

pub const MAX_ORDER: usize = 4;
pub const EPSILON: f64 = 0.1;

fn ngram_counts<'w, 'a>(words: &'w [&'a str], n: usize) -> HashMap<&'w [&'a str], usize> {
    let mut counts = HashMap::new();
    if words.len() >= n {
        for gram in words.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// (clipped matches, total hypothesis n-grams) for order `n`.
fn modified_precision(reference: &[&str], hypothesis: &[&str], n: usize) -> (usize, usize) {
    let ref_counts = ngram_counts(reference, n);
    let hyp_counts = ngram_counts(hypothesis, n);

    let matches = hyp_counts
        .iter()
        .map(|(gram, &count)| count.min(ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = hyp_counts.values().sum();
    (matches, total)
}

/// Smoothed BLEU of `hypothesis` against one `reference`, in [0, 1].
pub fn sentence_bleu(reference: &[&str], hypothesis: &[&str]) -> f64 {
    let hyp_len = hypothesis.len();
    if hyp_len == 0 {
        return 0.0;
    }

    let precisions: Vec<(usize, usize)> = (1..=MAX_ORDER)
        .map(|n| modified_precision(reference, hypothesis, n))
        .collect();
    if precisions[0].0 == 0 {
        return 0.0;
    }

    let weight = 1.0 / MAX_ORDER as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|&(matches, total)| {
            let p = if matches == 0 {
                EPSILON / total.max(1) as f64
            } else {
                matches as f64 / total as f64
            };
            weight * p.ln()
        })
        .sum();

    brevity_penalty(reference.len(), hyp_len) * log_sum.exp()
}

fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > ref_len {
        1.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}

/// Whitespace-tokenise both sides, then score.
pub fn sentence_bleu_str(reference: &str, hypothesis: &str) -> f64 {
    let r: Vec<&str> = reference.split_whitespace().collect();
    let h: Vec<&str> = hypothesis.split_whitespace().collect();
    sentence_bleu(&r, &h)
}

/// Arithmetic mean; 0 for no scores.
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sentences_score_one() {
        let s = "tôi yêu bạn rất nhiều hôm nay";
        assert!((sentence_bleu_str(s, s) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        assert_eq!(sentence_bleu_str("tôi yêu bạn", "chúng ta đi"), 0.0);
    }

    #[test]
    fn test_empty_hypothesis_scores_zero() {
        assert_eq!(sentence_bleu_str("tôi yêu bạn", ""), 0.0);
    }

    #[test]
    fn test_short_hypothesis_uses_smoothing() {
        // the single bigram matches; no trigram or 4-gram exists
        let score = sentence_bleu_str("tôi yêu bạn", "tôi yêu");
        // p1 = 1, p2 = 1, p3 = 0.1/1, p4 = 0.1/1
        // BP = exp(1 - 3/2)
        let expected = (1.0f64 - 1.5).exp() * (0.25 * (0.1f64.ln() * 2.0)).exp();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_clipping_limits_repeated_words() {
        // "the" appears once in the reference, four times here
        let (matches, total) = modified_precision(&["the", "cat"], &["the", "the", "the", "the"], 1);
        assert_eq!((matches, total), (1, 4));
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let pairs = [
            ("một hai ba bốn năm", "một hai ba"),
            ("một hai", "một hai ba bốn năm sáu"),
            ("a b c d e f", "f e d c b a"),
        ];
        for (r, h) in pairs {
            let s = sentence_bleu_str(r, h);
            assert!((0.0..=1.0).contains(&s), "{r} / {h} → {s}");
        }
    }

    #[test]
    fn test_average_is_arithmetic_mean() {
        assert_eq!(average(&[]), 0.0);
        assert!((average(&[0.2, 0.4, 0.6]) - 0.4).abs() < 1e-12);
    }
}
