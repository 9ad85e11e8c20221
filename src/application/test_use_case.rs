// ============================================================
// Layer 2 — TestUseCase
// ============================================================
// Scores the trained model on the head of the held-out set:
//
//   Step 1: Resolve config (saved architecture wins)
//   Step 2: Load context + weights        (Layer 2 / Layer 5)
//   Step 3: Read the first 20 pairs of tst2013.{en,vi}
//   Step 4: Translate each English line
//   Step 5: BLEU against the cleaned Vietnamese reference
//   Step 6: Arithmetic mean
//
// Evaluation only depends on the Translator trait, so the
// scoring arithmetic is tested with a stub.

use anyhow::{bail, Result};

use crate::application::context::NmtContext;
use crate::application::train_use_case::TrainConfig;
use crate::data::{loader::TextCorpusLoader, preprocessor::Preprocessor};
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::{CorpusSource, Translator};
use crate::domain::translation::Translation;
use crate::infra::bleu::{average, sentence_bleu_str};
use crate::ml::{inferencer::NeuralTranslator, InferBackend};

/// Number of test pairs scored.
pub const TEST_SENTENCES: usize = 20;

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub translations: Vec<Translation>,
    pub scores:       Vec<f64>,
    pub average:      f64,
}

impl EvaluationReport {
    pub fn percentage(&self) -> f64 {
        self.average * 100.0
    }
}

pub struct TestUseCase {
    config: TrainConfig,
}

impl TestUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// The first TEST_SENTENCES pairs of the test files.
    pub fn load_pairs(&self) -> Result<Vec<SentencePair>> {
        let cfg = &self.config;
        let mut pairs = TextCorpusLoader::new(
            &cfg.data_dir,
            &cfg.test_prefix,
            &cfg.source_lang,
            &cfg.target_lang,
        )
        .load_all()?;

        if pairs.len() < TEST_SENTENCES {
            bail!(
                "Test set '{}' has {} pairs, need at least {}",
                cfg.test_prefix,
                pairs.len(),
                TEST_SENTENCES,
            );
        }
        pairs.truncate(TEST_SENTENCES);
        Ok(pairs)
    }

    /// Translate and score every pair.
    pub fn evaluate<T: Translator>(&self, translator: &T, pairs: &[SentencePair]) -> Result<EvaluationReport> {
        let preprocessor = Preprocessor::new(&self.config.start_marker, &self.config.end_marker);

        let mut translations = Vec::with_capacity(pairs.len());
        let mut scores       = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let output    = translator.translate(&pair.source)?;
            let reference = preprocessor.clean_reference(&pair.target);
            let score     = sentence_bleu_str(&reference, &output);

            tracing::debug!("BLEU {:.4} | {} → {}", score, pair.source, output);
            scores.push(score);
            translations.push(Translation::new(pair.source.clone(), output).with_reference(reference));
        }

        let average = average(&scores);
        Ok(EvaluationReport { translations, scores, average })
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let pairs = self.load_pairs()?;

        let config     = self.config.clone().resolve_saved()?;
        let context    = NmtContext::load(config)?;
        let device     = burn::backend::wgpu::WgpuDevice::default();
        let translator = NeuralTranslator::<InferBackend>::from_context(context, device)?;

        let report = self.evaluate(&translator, &pairs)?;
        tracing::info!("Average BLEU over {} sentences: {:.4}", report.scores.len(), report.average);
        Ok(report)
    }
}
