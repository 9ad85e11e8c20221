// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw parallel text files to tensor batches.
//
//   train.en / train.vi
//       │
//       ▼
//   TextCorpusLoader  → aligned SentencePairs
//       │
//       ▼
//   Preprocessor      → entity decoding, whitespace cleanup,
//       │               "starttt … enddd" around targets
//       ▼
//   Vocabulary        → words to ids (tokenizers word-level model)
//       │
//       ▼
//   SequenceEncoder   → reverse / pad / truncate to max_tokens
//       │
//       ▼
//   split_train_val   → seeded train/validation split
//       │
//       ▼
//   TranslationDataset → Burn Dataset of shifted target rows
//       │
//       ▼
//   TranslationBatcher → [batch, len] Int tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Keras preprocessing: Tokenizer, pad_sequences

/// Reads parallel one-sentence-per-line files
pub mod loader;

/// Cleans raw text and marks target sentences
pub mod preprocessor;

/// Fixed-width padding and truncation
pub mod padding;

/// Word ↔ id mapping on top of a tokenizers model
pub mod vocabulary;

/// Sentence → padded id row, with corpus-derived width
pub mod sequence;

/// Implements Burn's Dataset trait for translation samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits samples into train/validation sets
pub mod splitter;
