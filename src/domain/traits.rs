// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against concrete loaders or models:
//   - TextCorpusLoader implements CorpusSource
//   - ml::inferencer::NeuralTranslator implements Translator
//
// Evaluation only needs "something that translates", so tests
// can hand it a stub instead of a trained network.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sentence_pair::SentencePair;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can load an aligned parallel corpus.
pub trait CorpusSource {
    /// Load every sentence pair, in file order.
    fn load_all(&self) -> Result<Vec<SentencePair>>;
}

// ─── Translator ───────────────────────────────────────────────────────────────
/// Any component that turns a source sentence into a target sentence.
pub trait Translator {
    fn translate(&self, text: &str) -> Result<String>;
}
