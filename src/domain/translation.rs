// ============================================================
// Layer 3 — Translation Domain Type
// ============================================================
// The result of translating one input sentence. During
// evaluation the reference translation rides along so the
// caller can score and print all three together.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// The text the user (or test file) supplied
    pub input: String,

    /// The model's greedy-decoded output
    pub output: String,

    /// The human reference, when one is known
    pub reference: Option<String>,
}

impl Translation {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input:     input.into(),
            output:    output.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
