// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder,
// plus the JSON side files needed to rebuild the model.
//
// File layout:
//   model/
//     training_model.mpk.gz  ← weights after the last epoch
//     checkpoint.mpk.gz      ← weights with the best val_loss
//     train_config.json      ← hyperparameters (architecture)
//     corpus_stats.json      ← padded sequence widths
//
// Why save the config separately?
//   The recorder stores parameters only. To load them we first
//   need a model of the exact same shape, and the shape comes
//   from the config (num_words, state_size, num_layers, ...).
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::sequence::CorpusStats;
use crate::ml::model::Seq2SeqModel;

/// Final weights of a completed training run.
pub const TRAINED_MODEL: &str = "training_model";

/// Best-validation weights written during training.
pub const BEST_CHECKPOINT: &str = "checkpoint";

const CONFIG_FILE: &str = "train_config.json";
const STATS_FILE:  &str = "corpus_stats.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when `{dir}/{name}.mpk.gz` exists.
    pub fn has_model(&self, name: &str) -> bool {
        self.dir.join(format!("{name}.mpk.gz")).exists()
    }

    /// Save model weights under `name` (the recorder adds `.mpk.gz`).
    pub fn save_model<B: Backend>(&self, model: &Seq2SeqModel<B>, name: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(name);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::debug!("Saved weights '{}'", path.display());
        Ok(())
    }

    /// Load weights saved under `name` into `model`.
    /// The model must have the architecture the weights were saved with.
    pub fn load_model<B: Backend>(
        &self,
        model:  Seq2SeqModel<B>,
        name:   &str,
        device: &B::Device,
    ) -> Result<Seq2SeqModel<B>> {
        let path = self.dir.join(name);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load weights '{}'", path.display()))?;

        tracing::info!("Loaded weights from '{}'", path.display());
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn has_config(&self) -> bool {
        self.dir.join(CONFIG_FILE).exists()
    }

    pub fn save_stats(&self, stats: &CorpusStats) -> Result<()> {
        self.write_json(STATS_FILE, stats)
    }

    pub fn load_stats(&self) -> Result<CorpusStats> {
        self.read_json(STATS_FILE)
    }

    pub fn has_stats(&self) -> bool {
        self.dir.join(STATS_FILE).exists()
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'. Has 'train' been run?", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::Seq2SeqConfig;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_config_and_stats_round_trip() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path().join("model"));
        assert!(!ckpt.has_config());
        assert!(ckpt.load_config().is_err());

        let cfg = TrainConfig { state_size: 32, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config().unwrap().state_size, 32);

        let stats = CorpusStats { source_max_tokens: 9, target_max_tokens: 12 };
        ckpt.save_stats(&stats).unwrap();
        assert_eq!(ckpt.load_stats().unwrap(), stats);
    }

    #[test]
    fn test_weights_round_trip() {
        let tmp    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path());
        let device = Default::default();
        let cfg    = Seq2SeqConfig::new(7, 9, 4, 5, 1);

        let model: Seq2SeqModel<TestBackend> = cfg.init(&device);
        assert!(!ckpt.has_model(TRAINED_MODEL));
        ckpt.save_model(&model, TRAINED_MODEL).unwrap();
        assert!(ckpt.has_model(TRAINED_MODEL));

        let fresh: Seq2SeqModel<TestBackend> = cfg.init(&device);
        let loaded = ckpt.load_model(fresh, TRAINED_MODEL, &device).unwrap();
        let a: Vec<f32> = model.decoder.output.weight.val().into_data().to_vec().unwrap();
        let b: Vec<f32> = loaded.decoder.output.weight.val().into_data().to_vec().unwrap();
        // CompactRecorder stores half precision
        assert!(a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-2));
    }
}
