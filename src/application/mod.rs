// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to accomplish one command.
//
// Rules for this layer:
//   - No tensor math here (that's Layer 5)
//   - No argument parsing or report printing (that's Layer 1)
//   - Only workflow coordination
//
// NmtContext is the shared state every use case receives
// explicitly: vocabularies, widths, marker ids, config.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Vocabularies + widths + markers, built or loaded once
pub mod context;

// The training workflow
pub mod train_use_case;

// BLEU evaluation on the test set
pub mod test_use_case;

// Interactive translation loop
pub mod translate_use_case;
