// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits describing what the translator
// works with: sentence pairs, finished translations, and the
// two seams other layers plug into.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// An aligned English/Vietnamese sentence pair
pub mod sentence_pair;

// A finished translation with its optional reference
pub mod translation;

// Core abstractions (traits) that other layers implement
pub mod traits;
