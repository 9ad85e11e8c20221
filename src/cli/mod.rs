// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, dispatches to Layer 2 and prints
// results. Three commands:
//   1. `train`     — fit the model on the training corpus
//   2. `test`      — BLEU on the first 20 test sentences
//   3. `translate` — interactive English → Vietnamese prompt
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, RunArgs, TrainArgs};

use crate::application::train_use_case::TrainConfig;

#[derive(Parser, Debug)]
#[command(
    name = "rnn-nmt",
    version = "0.1.0",
    about = "Train a GRU encoder-decoder to translate English to Vietnamese, then test or translate with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case; no computation here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => run_train(args),
            Commands::Test(args)      => run_test(args),
            Commands::Translate(args) => run_translate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus in: {}", args.paths.data_dir);
    let summary = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epoch(s){}. Best val_loss={:.4}",
        summary.epochs_run,
        if summary.stopped_early { " (early stop)" } else { "" },
        summary.best_val_loss,
    );
    Ok(())
}

fn run_test(args: RunArgs) -> Result<()> {
    use crate::application::test_use_case::TestUseCase;

    let report = TestUseCase::new(TrainConfig::from(args.paths)).execute()?;

    for (t, score) in report.translations.iter().zip(&report.scores) {
        println!("Input     : {}", t.input);
        println!("Output    : {}", t.output);
        println!("Reference : {}", t.reference.as_deref().unwrap_or(""));
        println!("BLEU      : {:.4}", score);
        println!();
    }
    println!("Average BLEU score: {:.4}", report.average);
    println!("Average BLEU score (%): {:.2}%", report.percentage());
    Ok(())
}

fn run_translate(args: RunArgs) -> Result<()> {
    use crate::application::translate_use_case::TranslateUseCase;

    let use_case = TranslateUseCase::load(TrainConfig::from(args.paths))?;
    println!("Type an English sentence; an empty line quits.");

    let stdin = std::io::stdin();
    use_case.run(stdin.lock(), std::io::stdout())?;
    Ok(())
}
