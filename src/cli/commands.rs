// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands `train`, `test` and `translate`
// and their flags. Every flag has a default, so running a bare
// subcommand uses data/ and model/ in the working directory.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the encoder-decoder on {data_dir}/train.{en,vi}
    Train(TrainArgs),

    /// Translate the first 20 test sentences and report BLEU
    Test(RunArgs),

    /// Translate sentences typed on stdin
    Translate(RunArgs),
}

/// Paths shared by every command.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Directory holding the parallel text files
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for weights, tokenizers and training metadata
    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Vocabulary size per language, padding included
    #[arg(long, default_value_t = 10_000)]
    pub num_words: usize,

    /// Width of the word embeddings
    #[arg(long, default_value_t = 128)]
    pub embedding_size: usize,

    /// Hidden size of every GRU layer
    #[arg(long, default_value_t = 512)]
    pub state_size: usize,

    /// GRU layers in the encoder and again in the decoder
    #[arg(long, default_value_t = 3)]
    pub num_layers: usize,

    #[arg(long, default_value_t = 512)]
    pub batch_size: usize,

    /// Upper bound; early stopping may end sooner
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// RMSProp learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Sentence pairs held out for validation
    #[arg(long, default_value_t = 10_000)]
    pub val_size: usize,

    /// Epochs without val_loss improvement before stopping
    #[arg(long, default_value_t = 3)]
    pub patience: usize,

    /// Seed for the train/validation shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// `test` and `translate` read the architecture from model_dir.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub paths: PathArgs,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            num_words:      a.num_words,
            embedding_size: a.embedding_size,
            state_size:     a.state_size,
            num_layers:     a.num_layers,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            val_size:       a.val_size,
            patience:       a.patience,
            seed:           a.seed,
            ..TrainConfig::from(a.paths)
        }
    }
}

impl From<PathArgs> for TrainConfig {
    fn from(p: PathArgs) -> Self {
        TrainConfig {
            data_dir:  p.data_dir,
            model_dir: p.model_dir,
            ..TrainConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_bare_train_uses_defaults() {
        let cli = Cli::try_parse_from(["rnn-nmt", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_flags_reach_the_config() {
        let cli = Cli::try_parse_from([
            "rnn-nmt", "train", "--model-dir", "out", "--epochs", "3", "--state-size", "64",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.model_dir, "out");
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.state_size, 64);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["rnn-nmt"]).is_err());
        assert!(Cli::try_parse_from(["rnn-nmt", "evaluate"]).is_err());
    }
}
