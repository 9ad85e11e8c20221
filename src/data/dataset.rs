use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One padded training example for teacher-forced decoding.
///
/// Target row: [starttt, w1, w2, w3, enddd, 0, 0]
///   decoder_input  = [starttt, w1, w2, w3, enddd, 0]
///   decoder_target = [w1, w2, w3, enddd, 0, 0]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSample {
    pub encoder_input:  Vec<u32>,
    pub decoder_input:  Vec<u32>,
    pub decoder_target: Vec<u32>,
}

impl TranslationSample {
    /// Split a padded target row into its shifted input/target halves.
    pub fn new(source_row: Vec<u32>, target_row: &[u32]) -> Self {
        let n = target_row.len();
        let (decoder_input, decoder_target) = if n == 0 {
            (Vec::new(), Vec::new())
        } else {
            (target_row[..n - 1].to_vec(), target_row[1..].to_vec())
        };
        Self { encoder_input: source_row, decoder_input, decoder_target }
    }
}

/// Pair padded source and target rows line by line.
pub fn build_samples(source_rows: Vec<Vec<u32>>, target_rows: &[Vec<u32>]) -> Vec<TranslationSample> {
    source_rows
        .into_iter()
        .zip(target_rows)
        .map(|(src, tgt)| TranslationSample::new(src, tgt))
        .collect()
}

pub struct TranslationDataset {
    samples: Vec<TranslationSample>,
}

impl TranslationDataset {
    pub fn new(samples: Vec<TranslationSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<TranslationSample> for TranslationDataset {
    fn get(&self, index: usize) -> Option<TranslationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
