// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn network code lives here. The data layer only touches
// Burn through its Dataset/Batcher traits.
//
//   model.rs      — GRU encoder-decoder
//                   • embedding → stacked GRUs → last state (encoder)
//                   • embedding → stacked GRUs seeded with that
//                     state → linear projection (decoder)
//                   • masked cross-entropy over the target vocab
//
//   trainer.rs    — the training loop
//                   RMSProp, per-epoch validation, early stopping,
//                   best-checkpoint and final-weight saving
//
//   decoder.rs    — greedy decoding state machine, model-agnostic
//                   behind the DecoderNetwork trait
//
//   inferencer.rs — NeuralTranslator: loads weights, plugs the
//                   model into the greedy decoder
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Sutskever et al. (2014) Sequence to Sequence Learning
//            Cho et al. (2014) GRU Encoder-Decoder

/// Backend used for training: WGPU with automatic differentiation.
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Backend used for test and translate.
pub type InferBackend = burn::backend::Wgpu;

/// GRU encoder-decoder architecture
pub mod model;

/// Training loop with validation, early stopping and checkpointing
pub mod trainer;

/// Greedy decoding loop
pub mod decoder;

/// Inference engine: weights + vocabularies + greedy decoder
pub mod inferencer;
