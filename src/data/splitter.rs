// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles samples and carves off a fixed-size validation set.
//
// Why a fixed count instead of a fraction?
//   The training corpus is large (~130k pairs); 10 000 held-out
//   pairs give a stable validation loss for early stopping while
//   leaving the rest for training. On smaller corpora the count
//   is clamped so at least one sample remains for training.
//
// A seeded StdRng makes the split reproducible between runs, so
// a resumed training run validates on the same sentences.
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, validation)
/// where validation holds at most `val_size` items.
pub fn split_train_val<T>(mut samples: Vec<T>, val_size: usize, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let val_size = val_size.min(total.saturating_sub(1));
    let val      = samples.split_off(total - val_size);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 20, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 15, 7);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_validation_clamped_on_small_corpus() {
        let items: Vec<usize> = (0..5).collect();
        let (train, val)      = split_train_val(items, 10_000, 7);
        assert_eq!(train.len(), 1);
        assert_eq!(val.len(),   4);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 10, 7);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_val((0..30).collect::<Vec<usize>>(), 5, 42);
        let (b, _) = split_train_val((0..30).collect::<Vec<usize>>(), 5, 42);
        assert_eq!(a, b);
    }
}
