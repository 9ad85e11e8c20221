// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by training and inference:
//
//   checkpoint.rs      — model weights via Burn's CompactRecorder
//                        (`training_model`, `checkpoint`) plus the
//                        JSON side files train_config.json and
//                        corpus_stats.json
//
//   tokenizer_store.rs — word-level tokenizer per language
//                        Built from the training corpus on first
//                        use, then reloaded so inference sees the
//                        exact vocabulary training did.
//
//   metrics.rs         — per-epoch CSV log and early stopping
//
//   bleu.rs            — smoothed sentence BLEU for evaluation
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger and early stopping
pub mod metrics;

/// Sentence-level BLEU
pub mod bleu;
