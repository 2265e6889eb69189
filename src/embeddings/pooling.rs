// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence pooling and L2 normalization

use ndarray::ArrayView2;

/// Strategy for reducing `[seq_len, hidden_dim]` token states to one vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pooling {
    /// Average over real (non-padding) tokens, weighted by the attention mask
    Mean,
    /// Hidden state of the first token ([CLS] / <s>)
    Cls,
}

impl Pooling {
    /// Pools one sequence of token embeddings
    ///
    /// `attention_mask` has one entry per row of `tokens`; padded rows are 0.
    pub fn pool(self, tokens: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
        let seq_len = tokens.shape()[0];
        let hidden_dim = tokens.shape()[1];

        match self {
            Pooling::Cls => {
                if seq_len == 0 {
                    return vec![0.0; hidden_dim];
                }
                tokens.row(0).to_vec()
            }
            Pooling::Mean => {
                let mut pooled = vec![0.0f32; hidden_dim];
                let mut sum_mask = 0.0f32;

                for i in 0..seq_len {
                    let mask_value = attention_mask.get(i).copied().unwrap_or(0) as f32;
                    if mask_value == 0.0 {
                        continue;
                    }
                    sum_mask += mask_value;
                    for (j, value) in pooled.iter_mut().enumerate() {
                        *value += tokens[[i, j]] * mask_value;
                    }
                }

                // Avoid division by zero
                let denom = sum_mask.max(1e-9);
                for value in &mut pooled {
                    *value /= denom;
                }
                pooled
            }
        }
    }
}

/// Scales `vector` to unit Euclidean length in place. Zero vectors are left as is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Euclidean norm
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}
