// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Teacher-forced training with RMSProp, per-epoch validation,
// best-weights checkpointing and early stopping.
//
//   - Training runs on B (an autodiff backend) for gradients
//   - model.valid() returns the model on B::InnerBackend, so the
//     validation batcher is built for the inner backend too
//   - Best val_loss so far → weights saved as "checkpoint"
//   - `patience` epochs without improvement → stop early
//   - Whatever the model is at the end → "training_model"
//
// Reference: Burn Book §5, Hinton (2012) RMSProp lecture notes

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, RmsPropConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::TranslationBatcher, dataset::TranslationDataset};
use crate::infra::checkpoint::{CheckpointManager, BEST_CHECKPOINT, TRAINED_MODEL};
use crate::infra::metrics::{EarlyStopping, EpochMetrics, MetricsLogger, Progress};
use crate::ml::model::{sequence_loss, Seq2SeqConfig, Seq2SeqModel};
use crate::ml::TrainBackend;

/// How a training run ended.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs_run:    usize,
    pub best_val_loss: f64,
    pub stopped_early: bool,
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &Seq2SeqConfig,
    train_dataset: TranslationDataset,
    val_dataset:   TranslationDataset,
    ckpt_manager:  &CheckpointManager,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<TrainBackend>(cfg, model_cfg, train_dataset, val_dataset, ckpt_manager, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &Seq2SeqConfig,
    train_dataset: TranslationDataset,
    val_dataset:   TranslationDataset,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<TrainingSummary> {
    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Seq2SeqModel<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} GRU layers per side, state_size={}, vocab={}/{}",
        model_cfg.num_layers,
        model_cfg.state_size,
        model_cfg.source_vocab,
        model_cfg.target_vocab,
    );

    // ── RMSProp optimiser ─────────────────────────────────────────────────────
    // v = α*v + (1-α)*g²
    // θ = θ - lr * g / (√v + ε)
    let mut optim = RmsPropConfig::new()
        .with_alpha(0.9)
        .with_epsilon(1e-7)
        .init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_batcher = TranslationBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let val_batcher = TranslationBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics     = MetricsLogger::new(ckpt_manager.dir())?;
    tracing::info!("Logging epoch metrics to '{}'", metrics.csv_path().display());
    let mut stopper = EarlyStopping::new(cfg.patience);
    let mut summary = TrainingSummary {
        epochs_run:    0,
        best_val_loss: f64::INFINITY,
        stopped_early: false,
    };

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(
                batch.encoder_input,
                batch.decoder_input,
                batch.decoder_target,
            );

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum  = 0.0f64;
        let mut val_batches   = 0usize;
        let mut correct       = 0i64;
        let mut counted       = 0i64;

        for batch in val_loader.iter() {
            let logits = model_valid.forward(batch.encoder_input, batch.decoder_input);
            let [b, t, _] = logits.dims();

            val_loss_sum += sequence_loss(logits.clone(), batch.decoder_target.clone())
                .into_scalar()
                .elem::<f64>();
            val_batches += 1;

            // argmax(2) keeps the vocab axis as size 1 → reshape to [b, t]
            let predicted = logits.argmax(2).reshape([b, t]);
            let real      = batch.decoder_target.clone().greater_elem(0).int();

            correct += predicted
                .equal(batch.decoder_target)
                .int()
                .mul(real.clone())
                .sum()
                .into_scalar()
                .elem::<i64>();
            counted += real.sum().into_scalar().elem::<i64>();
        }

        let avg_val_loss = if val_batches > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let accuracy     = if counted > 0 { correct as f64 / counted as f64 } else { 0.0 };

        let m = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, accuracy);
        metrics.log(&m)?;
        summary.epochs_run = epoch;

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss, accuracy * 100.0,
        );

        match stopper.update(&m) {
            Progress::Improved => {
                ckpt_manager.save_model(&model, BEST_CHECKPOINT)?;
                tracing::info!("val_loss improved to {:.4}, checkpoint saved", avg_val_loss);
            }
            Progress::Stalled => {
                tracing::info!("val_loss did not improve from {:.4}", stopper.best());
            }
            Progress::Stop => {
                tracing::info!("Early stopping after epoch {} (patience {})", epoch, cfg.patience);
                summary.stopped_early = true;
                break;
            }
        }
    }

    summary.best_val_loss = stopper.best();
    ckpt_manager.save_model(&model, TRAINED_MODEL)?;
    tracing::info!("Training complete!");
    Ok(summary)
}
