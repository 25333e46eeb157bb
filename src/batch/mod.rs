//! Variable-length batch collation
//!
//! Waveforms of differing lengths are packed into one dense, right-zero-padded
//! `(batch_size, max_length)` tensor together with each item's true length.
//! Row `i` of a batch always corresponds to item `i` of the collated input;
//! callers rely on this to send outputs back to the right destination.

use crate::error::{EnhanceError, EnhanceResult};

/// Dense padded batch of mono waveforms
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Row-major samples, `lengths.len() * max_len` values
    data: Vec<f32>,
    /// True length of each row
    lengths: Vec<usize>,
    /// Row stride
    max_len: usize,
}

impl Batch {
    /// Build a batch from raw parts, checking the shape contract
    pub fn from_parts(data: Vec<f32>, lengths: Vec<usize>, max_len: usize) -> EnhanceResult<Self> {
        if lengths.is_empty() {
            return Err(EnhanceError::ShapeError("batch has no items".to_string()));
        }
        if data.len() != lengths.len() * max_len {
            return Err(EnhanceError::ShapeError(format!(
                "expected {} x {} = {} samples, got {}",
                lengths.len(),
                max_len,
                lengths.len() * max_len,
                data.len()
            )));
        }
        if let Some((i, &len)) = lengths
            .iter()
            .enumerate()
            .find(|&(_, &len)| len == 0 || len > max_len)
        {
            return Err(EnhanceError::ShapeError(format!(
                "item {} has length {} outside 1..={}",
                i, len, max_len
            )));
        }
        if lengths.iter().max() != Some(&max_len) {
            return Err(EnhanceError::ShapeError(format!(
                "row stride {} is not the longest item length",
                max_len
            )));
        }

        Ok(Batch {
            data,
            lengths,
            max_len,
        })
    }

    /// Same lengths, new tensor contents of the same shape
    pub fn with_data(&self, data: Vec<f32>) -> EnhanceResult<Self> {
        Batch::from_parts(data, self.lengths.clone(), self.max_len)
    }

    /// `(batch_size, max_length)`
    pub fn shape(&self) -> (usize, usize) {
        (self.lengths.len(), self.max_len)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Always false for a constructed batch
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Per-item true lengths
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Longest item length, also the row stride
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Whole tensor, row-major
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Padded row `i`
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.max_len..(i + 1) * self.max_len]
    }

    /// First `lengths[i]` samples of row `i`
    pub fn valid(&self, i: usize) -> &[f32] {
        &self.row(i)[..self.lengths[i]]
    }

    /// Iterate over padded rows
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.max_len)
    }

    /// Zero every sample past each row's true length
    pub fn zero_padding(&mut self) {
        let max_len = self.max_len;
        for (row, &len) in self.data.chunks_exact_mut(max_len).zip(&self.lengths) {
            row[len..].fill(0.0);
        }
    }

    /// Split into owned `(padded_row, length)` pairs in batch order
    pub fn into_rows(self) -> Vec<(Vec<f32>, usize)> {
        self.data
            .chunks_exact(self.max_len)
            .map(<[f32]>::to_vec)
            .zip(self.lengths)
            .collect()
    }
}

/// Pack waveforms into a right-zero-padded batch, preserving order
pub fn collate<S: AsRef<[f32]>>(items: &[S]) -> EnhanceResult<Batch> {
    if items.is_empty() {
        return Err(EnhanceError::ShapeError(
            "cannot collate an empty set of waveforms".to_string(),
        ));
    }

    let lengths: Vec<usize> = items.iter().map(|w| w.as_ref().len()).collect();
    if let Some(i) = lengths.iter().position(|&len| len == 0) {
        return Err(EnhanceError::ShapeError(format!(
            "item {} is an empty waveform",
            i
        )));
    }
    let max_len = lengths.iter().copied().max().unwrap_or(0);

    let mut data = vec![0.0f32; items.len() * max_len];
    for (row, item) in data.chunks_exact_mut(max_len).zip(items) {
        let samples = item.as_ref();
        row[..samples.len()].copy_from_slice(samples);
    }

    Batch::from_parts(data, lengths, max_len)
}
