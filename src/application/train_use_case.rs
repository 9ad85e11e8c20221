// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load train.en / train.vi      (Layer 4 - data)
//   Step 2: Fit context: clean, mark,
//           vocabularies, widths, pad     (Layer 2 - NmtContext)
//   Step 3: Build shifted samples         (Layer 4 - data)
//   Step 4: Split train/validation        (Layer 4 - data)
//   Step 5: Save config                   (Layer 6 - infra)
//   Step 6: Run training loop             (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::context::NmtContext;
use crate::data::{
    dataset::{build_samples, TranslationDataset},
    loader::TextCorpusLoader,
    splitter::split_train_val,
};
use crate::domain::traits::CorpusSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::Seq2SeqConfig;
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// Paths, languages and hyperparameters for a run.
// Saved next to the weights as train_config.json so `test` and
// `translate` rebuild exactly the architecture that was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub data_dir:       String,
    pub model_dir:      String,
    pub source_lang:    String,
    pub target_lang:    String,
    pub train_prefix:   String,
    pub test_prefix:    String,
    pub num_words:      usize,
    pub embedding_size: usize,
    pub state_size:     usize,
    pub num_layers:     usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub val_size:       usize,
    pub patience:       usize,
    pub seed:           u64,
    pub start_marker:   String,
    pub end_marker:     String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data".to_string(),
            model_dir:      "model".to_string(),
            source_lang:    "en".to_string(),
            target_lang:    "vi".to_string(),
            train_prefix:   "train".to_string(),
            test_prefix:    "tst2013".to_string(),
            num_words:      10_000,
            embedding_size: 128,
            state_size:     512,
            num_layers:     3,
            batch_size:     512,
            epochs:         10,
            lr:             1e-3,
            val_size:       10_000,
            patience:       3,
            seed:           42,
            start_marker:   "starttt".to_string(),
            end_marker:     "enddd".to_string(),
        }
    }
}

impl TrainConfig {
    /// Both vocabularies are capped at `num_words`.
    pub fn model_config(&self) -> Seq2SeqConfig {
        Seq2SeqConfig::new(
            self.num_words,
            self.num_words,
            self.embedding_size,
            self.state_size,
            self.num_layers,
        )
    }

    fn architecture(&self) -> (usize, usize, usize, usize) {
        (self.num_words, self.embedding_size, self.state_size, self.num_layers)
    }

    /// Prefer the config saved by `train` in `model_dir`; fall back to `self`.
    pub fn resolve_saved(self) -> Result<Self> {
        let ckpt = CheckpointManager::new(&self.model_dir);
        if !ckpt.has_config() {
            tracing::warn!("No train_config.json in '{}', using command-line values", self.model_dir);
            return Ok(self);
        }
        let saved = ckpt.load_config()?;
        if saved.architecture() != self.architecture() {
            tracing::info!("Using architecture saved in '{}'", self.model_dir);
        }
        Ok(Self {
            // the files to read come from this invocation
            data_dir:    self.data_dir,
            model_dir:   self.model_dir,
            test_prefix: self.test_prefix,
            ..saved
        })
    }
}

/// Everything the training loop consumes, ready to go.
pub struct PreparedRun {
    pub context:       NmtContext,
    pub train_dataset: TranslationDataset,
    pub val_dataset:   TranslationDataset,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Steps 1–4: corpus → fitted context → split datasets.
    pub fn prepare(&self) -> Result<PreparedRun> {
        let cfg = &self.config;

        // ── Step 1: Load the parallel corpus ──────────────────────────────────
        let loader = TextCorpusLoader::new(
            &cfg.data_dir,
            &cfg.train_prefix,
            &cfg.source_lang,
            &cfg.target_lang,
        );
        tracing::info!(
            "Loading '{}' and '{}'",
            loader.source_path().display(),
            loader.target_path().display(),
        );
        let pairs = loader.load_all()?;
        tracing::info!("Loaded {} sentence pairs", pairs.len());

        // ── Step 2: Vocabularies, widths, padded rows ─────────────────────────
        let (context, padded) = NmtContext::from_corpus(cfg.clone(), &pairs)?;

        // ── Step 3: (encoder_input, decoder_input, decoder_target) ────────────
        let samples = build_samples(padded.source_rows, &padded.target_rows);

        // ── Step 4: Seeded train / validation split ───────────────────────────
        let (train, val)  = split_train_val(samples, cfg.val_size, cfg.seed);
        let train_dataset = TranslationDataset::new(train);
        let val_dataset   = TranslationDataset::new(val);
        tracing::info!(
            "Split: {} train, {} validation",
            train_dataset.sample_count(),
            val_dataset.sample_count(),
        );

        Ok(PreparedRun { context, train_dataset, val_dataset })
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<TrainingSummary> {
        let run = self.prepare()?;

        // ── Step 5: Save config for inference ─────────────────────────────────
        let ckpt = CheckpointManager::new(&self.config.model_dir);
        ckpt.save_config(&self.config)?;

        // ── Step 6: Training loop (Layer 5) ───────────────────────────────────
        run_training(
            &self.config,
            &run.context.model_config(),
            run.train_dataset,
            run.val_dataset,
            &ckpt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::TokenizerStore;
    use burn::data::dataset::Dataset;
    use std::fs;

    fn write_corpus(dir: &std::path::Path, n: usize) {
        let en: Vec<String> = (0..n).map(|i| format!("sentence number {i} is here .")).collect();
        let vi: Vec<String> = (0..n).map(|i| format!("câu số {i} ở đây .")).collect();
        fs::write(dir.join("train.en"), en.join("\n")).unwrap();
        fs::write(dir.join("train.vi"), vi.join("\n")).unwrap();
    }

    fn config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            data_dir:  dir.to_string_lossy().into_owned(),
            model_dir: dir.join("model").to_string_lossy().into_owned(),
            num_words: 100,
            val_size:  3,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_prepare_splits_and_persists_vocabularies() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path(), 12);
        let cfg = config(tmp.path());

        let run = TrainUseCase::new(cfg.clone()).prepare().unwrap();
        assert_eq!(run.train_dataset.len(), 9);
        assert_eq!(run.val_dataset.len(), 3);

        let store = TokenizerStore::new(&cfg.model_dir);
        assert!(store.exists("en"));
        assert!(store.exists("vi"));
        assert!(CheckpointManager::new(&cfg.model_dir).has_stats());

        // decoder rows are one shorter than the padded target width
        let sample = run.train_dataset.get(0).unwrap();
        assert_eq!(sample.decoder_input.len(), run.context.target.max_tokens() - 1);
        assert_eq!(sample.encoder_input.len(), run.context.source.max_tokens());
    }

    #[test]
    fn test_prepare_fails_without_corpus() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(TrainUseCase::new(config(tmp.path())).prepare().is_err());
    }

    #[test]
    fn test_saved_architecture_wins_over_cli() {
        let tmp = tempfile::tempdir().unwrap();
        let saved = TrainConfig { state_size: 64, ..config(tmp.path()) };
        CheckpointManager::new(&saved.model_dir).save_config(&saved).unwrap();

        let cli = TrainConfig { test_prefix: "tst2012".into(), ..config(tmp.path()) };
        let resolved = cli.resolve_saved().unwrap();
        assert_eq!(resolved.state_size, 64);
        assert_eq!(resolved.test_prefix, "tst2012");
    }

    #[test]
    fn test_missing_saved_config_keeps_cli_values() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = config(tmp.path());
        assert_eq!(cli.clone().resolve_saved().unwrap(), cli);
    }

    #[test]
    fn test_default_markers_match_the_preprocessor() {
        use crate::data::preprocessor::Preprocessor;
        let cfg = TrainConfig::default();
        let p   = Preprocessor::default();
        assert_eq!((cfg.start_marker.as_str(), cfg.end_marker.as_str()), ("starttt", "enddd"));
        assert_eq!((p.start_marker(), p.end_marker()), ("starttt", "enddd"));
    }
}
