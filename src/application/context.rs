// ============================================================
// Layer 2 — NmtContext
// ============================================================
// Everything the three commands share, built once and passed
// explicitly instead of living in module-level globals:
//
//   config        → paths, languages, hyperparameters
//   preprocessor  → cleaning + start/end marking
//   source        → English SequenceEncoder (reversed, pre-padded)
//   target        → Vietnamese SequenceEncoder (post-padded)
//   start / end   → ids of the target markers
//
// Two ways to build it:
//   from_corpus — fit vocabularies and widths on the training
//                 pairs (used by `train`, and as a fallback)
//   load        — reuse tokenizers + widths saved by `train`

use anyhow::{bail, Context, Result};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    loader::TextCorpusLoader,
    padding::Side,
    preprocessor::Preprocessor,
    sequence::{CorpusStats, SequenceEncoder},
    vocabulary::Vocabulary,
};
use crate::domain::sentence_pair::{unzip_pairs, SentencePair};
use crate::domain::traits::CorpusSource;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::{decoder::GreedyDecoder, model::Seq2SeqConfig};

pub struct NmtContext {
    pub config:       TrainConfig,
    pub preprocessor: Preprocessor,
    pub source:       SequenceEncoder,
    pub target:       SequenceEncoder,
    pub start_token:  u32,
    pub end_token:    u32,
}

/// Padded training rows produced alongside a freshly fitted context.
pub struct PaddedCorpus {
    pub source_rows: Vec<Vec<u32>>,
    pub target_rows: Vec<Vec<u32>>,
}

impl NmtContext {
    /// Fit vocabularies and row widths on `pairs` and save the
    /// tokenizers to the model directory, replacing any left there
    /// by an earlier run.
    pub fn from_corpus(config: TrainConfig, pairs: &[SentencePair]) -> Result<(Self, PaddedCorpus)> {
        if pairs.is_empty() {
            bail!("Training corpus is empty");
        }
        let preprocessor = Preprocessor::new(&config.start_marker, &config.end_marker);

        let (raw_sources, raw_targets) = unzip_pairs(pairs);
        let sources: Vec<String> = raw_sources.iter().map(|s| preprocessor.clean(s)).collect();
        let targets: Vec<String> = raw_targets.iter().map(|t| preprocessor.mark_target(t)).collect();

        let store = TokenizerStore::new(&config.model_dir);
        let source_vocab = Vocabulary::new(
            store.build_and_save(&config.source_lang, &sources, config.num_words)?,
            config.num_words,
        );
        let target_vocab = Vocabulary::new(
            store.build_and_save(&config.target_lang, &targets, config.num_words)?,
            config.num_words,
        );

        let (source, source_tokens) = SequenceEncoder::fit(source_vocab, &sources, true, Side::Pre)?;
        let (target, target_tokens) = SequenceEncoder::fit(target_vocab, &targets, false, Side::Post)?;

        if source.max_tokens() == 0 || target.max_tokens() < 2 {
            bail!(
                "Corpus too small to train on: source width {}, target width {}",
                source.max_tokens(),
                target.max_tokens(),
            );
        }
        tracing::info!(
            "Sequence widths: source={} target={}",
            source.max_tokens(),
            target.max_tokens(),
        );

        let padded = PaddedCorpus {
            source_rows: source.pad_batch(&source_tokens),
            target_rows: target.pad_batch(&target_tokens),
        };

        let context = Self::assemble(config, preprocessor, source, target)?;
        CheckpointManager::new(&context.config.model_dir).save_stats(&context.stats())?;
        Ok((context, padded))
    }

    /// Reuse the tokenizers and widths saved by a previous `train`,
    /// or rebuild them from the training corpus when they are absent.
    pub fn load(config: TrainConfig) -> Result<Self> {
        let store = TokenizerStore::new(&config.model_dir);
        let ckpt  = CheckpointManager::new(&config.model_dir);

        let saved = store.exists(&config.source_lang)
            && store.exists(&config.target_lang)
            && ckpt.has_stats();

        if !saved {
            tracing::warn!(
                "No saved tokenizers in '{}'; rebuilding from the training corpus",
                config.model_dir,
            );
            let pairs = TextCorpusLoader::new(
                &config.data_dir,
                &config.train_prefix,
                &config.source_lang,
                &config.target_lang,
            )
            .load_all()?;
            let (context, _) = Self::from_corpus(config, &pairs)?;
            return Ok(context);
        }

        let stats = ckpt.load_stats()?;
        let preprocessor = Preprocessor::new(&config.start_marker, &config.end_marker);
        let source = SequenceEncoder::new(
            Vocabulary::new(store.load(&config.source_lang)?, config.num_words),
            true,
            Side::Pre,
            stats.source_max_tokens,
        );
        let target = SequenceEncoder::new(
            Vocabulary::new(store.load(&config.target_lang)?, config.num_words),
            false,
            Side::Post,
            stats.target_max_tokens,
        );
        Self::assemble(config, preprocessor, source, target)
    }

    /// Look up the marker ids; a vocabulary without them cannot decode.
    fn assemble(
        config:       TrainConfig,
        preprocessor: Preprocessor,
        source:       SequenceEncoder,
        target:       SequenceEncoder,
    ) -> Result<Self> {
        let start_token = target
            .vocab()
            .token_id(preprocessor.start_marker())
            .with_context(|| format!("Start marker '{}' missing from target vocabulary", preprocessor.start_marker()))?;
        let end_token = target
            .vocab()
            .token_id(preprocessor.end_marker())
            .with_context(|| format!("End marker '{}' missing from target vocabulary", preprocessor.end_marker()))?;

        Ok(Self { config, preprocessor, source, target, start_token, end_token })
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            source_max_tokens: self.source.max_tokens(),
            target_max_tokens: self.target.max_tokens(),
        }
    }

    pub fn model_config(&self) -> Seq2SeqConfig {
        self.config.model_config()
    }

    pub fn greedy_decoder(&self) -> GreedyDecoder {
        GreedyDecoder::new(self.start_token, self.end_token, self.target.max_tokens())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn toy_pairs() -> Vec<SentencePair> {
        vec![
            SentencePair::new("I love you .", "Tôi yêu bạn ."),
            SentencePair::new("Thank you very much .", "Cảm ơn rất nhiều ."),
            SentencePair::new("You are here .", "Bạn ở đây ."),
            SentencePair::new("I am here .", "Tôi ở đây ."),
        ]
    }

    pub(crate) fn toy_config(model_dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            model_dir:      model_dir.to_string_lossy().into_owned(),
            num_words:      50,
            embedding_size: 4,
            state_size:     8,
            num_layers:     1,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_from_corpus_pads_every_row() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, padded) = NmtContext::from_corpus(toy_config(tmp.path()), &toy_pairs()).unwrap();

        assert_eq!(padded.source_rows.len(), 4);
        assert!(padded.source_rows.iter().all(|r| r.len() == ctx.source.max_tokens()));
        assert!(padded.target_rows.iter().all(|r| r.len() == ctx.target.max_tokens()));
        // post-padded targets begin with the start marker
        assert!(padded.target_rows.iter().all(|r| r[0] == ctx.start_token));
        assert_ne!(ctx.start_token, ctx.end_token);
    }

    #[test]
    fn test_load_reuses_saved_state() {
        let tmp = tempfile::tempdir().unwrap();
        let (fitted, _) = NmtContext::from_corpus(toy_config(tmp.path()), &toy_pairs()).unwrap();
        let loaded = NmtContext::load(toy_config(tmp.path())).unwrap();

        assert_eq!(loaded.stats(), fitted.stats());
        assert_eq!(loaded.start_token, fitted.start_token);
        assert_eq!(loaded.end_token, fitted.end_token);
    }

    #[test]
    fn test_load_without_saved_state_or_corpus_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_dir: tmp.path().join("missing").to_string_lossy().into_owned(),
            ..toy_config(tmp.path())
        };
        assert!(NmtContext::load(cfg).is_err());
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(NmtContext::from_corpus(toy_config(tmp.path()), &[]).is_err());
    }

    #[test]
    fn test_refit_replaces_a_smaller_vocabulary() {
        let tmp = tempfile::tempdir().unwrap();

        // two word slots: "you" and "i" win, "here" is out of vocabulary
        let small = TrainConfig { num_words: 3, ..toy_config(tmp.path()) };
        let (ctx, _) = NmtContext::from_corpus(small, &toy_pairs()).unwrap();
        assert!(ctx.source.vocab().token_id("here").is_none());

        let (ctx, _) = NmtContext::from_corpus(toy_config(tmp.path()), &toy_pairs()).unwrap();
        assert!(ctx.source.vocab().token_id("you").is_some());
        assert!(ctx.source.vocab().token_id("here").is_some());
    }

    #[test]
    fn test_missing_marker_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, _) = NmtContext::from_corpus(toy_config(tmp.path()), &toy_pairs()).unwrap();

        let err = NmtContext::assemble(
            ctx.config.clone(),
            Preprocessor::new("starttt", "neverseen"),
            ctx.source.clone(),
            ctx.target.clone(),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("neverseen"));
    }

    #[test]
    fn test_vocabulary_too_small_for_markers_fails() {
        let tmp = tempfile::tempdir().unwrap();
        // one word slot holds the start marker only
        let cfg = TrainConfig { num_words: 2, ..toy_config(tmp.path()) };
        assert!(NmtContext::from_corpus(cfg, &toy_pairs()).is_err());
    }

    #[test]
    fn test_load_rebuilds_from_training_corpus() {
        let tmp  = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        let (en, vi): (Vec<String>, Vec<String>) =
            toy_pairs().into_iter().map(|p| (p.source, p.target)).unzip();
        std::fs::write(data.join("train.en"), en.join("\n")).unwrap();
        std::fs::write(data.join("train.vi"), vi.join("\n")).unwrap();

        let cfg = TrainConfig {
            data_dir: data.to_string_lossy().into_owned(),
            ..toy_config(&tmp.path().join("model"))
        };
        let loaded = NmtContext::load(cfg.clone()).unwrap();
        assert!(TokenizerStore::new(&cfg.model_dir).exists("en"));
        assert!(CheckpointManager::new(&cfg.model_dir).has_stats());

        let (fitted, _) =
            NmtContext::from_corpus(toy_config(&tmp.path().join("fresh")), &toy_pairs()).unwrap();
        assert_eq!(loaded.stats(), fitted.stats());
        assert_eq!(loaded.start_token, fitted.start_token);
        assert_eq!(loaded.end_token, fitted.end_token);
    }
}
