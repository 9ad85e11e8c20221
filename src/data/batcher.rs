// ============================================================
// Layer 4 — Translation Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of
// TranslationSamples into tensors for one training step.
//
//   Input:  N samples, source rows of width S, target rows of width T
//   Output: encoder_input  [N, S]
//           decoder_input  [N, T]
//           decoder_target [N, T]
//
// All rows are already padded, so batching is flatten + reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TranslationSample;

#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Reversed, pre-padded English ids: [batch, source_len]
    pub encoder_input: Tensor<B, 2, Int>,

    /// Target ids starting with the start marker: [batch, target_len]
    pub decoder_input: Tensor<B, 2, Int>,

    /// decoder_input shifted left by one: [batch, target_len]
    pub decoder_target: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Stack equal-length rows into a [rows, width] Int tensor.
pub fn rows_to_tensor<B: Backend>(rows: &[&[u32]], device: &B::Device) -> Tensor<B, 2, Int> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let flat: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&x| x as i32))
        .collect();
    Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([rows.len(), width])
}

impl<B: Backend> Batcher<TranslationSample, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<TranslationSample>) -> TranslationBatch<B> {
        let encoder: Vec<&[u32]> = items.iter().map(|s| s.encoder_input.as_slice()).collect();
        let dec_in:  Vec<&[u32]> = items.iter().map(|s| s.decoder_input.as_slice()).collect();
        let dec_out: Vec<&[u32]> = items.iter().map(|s| s.decoder_target.as_slice()).collect();

        TranslationBatch {
            encoder_input:  rows_to_tensor(&encoder, &self.device),
            decoder_input:  rows_to_tensor(&dec_in,  &self.device),
            decoder_target: rows_to_tensor(&dec_out, &self.device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes() {
        let device  = Default::default();
        let batcher = TranslationBatcher::<TestBackend>::new(device);
        let items = vec![
            TranslationSample::new(vec![0, 4, 5], &[1, 6, 2, 0]),
            TranslationSample::new(vec![4, 5, 7], &[1, 6, 7, 2]),
        ];
        let batch = batcher.batch(items);
        assert_eq!(batch.encoder_input.dims(),  [2, 3]);
        assert_eq!(batch.decoder_input.dims(),  [2, 3]);
        assert_eq!(batch.decoder_target.dims(), [2, 3]);

        let targets: Vec<i64> = batch.decoder_target.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(targets, vec![6, 2, 0, 6, 7, 2]);
    }
}
