//! Bidirectional codec between structured layers and the flat parameter vector.
//!
//! Layout: every weight matrix in layer order (row-major, `out × in`),
//! followed by every bias vector in layer order. Decoding never truncates or
//! pads; any length disagreement is a [`NeuroError::ShapeMismatch`].

use super::{Architecture, Layer};
use crate::error::{NeuroError, Result};
use ndarray::{Array1, Array2};

pub struct ParameterCodec;

impl ParameterCodec {
    /// Flattens layers into a parameter vector.
    pub fn encode(layers: &[Layer]) -> Vec<f32> {
        let total: usize = layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum();
        let mut params = Vec::with_capacity(total);
        for layer in layers {
            params.extend(layer.weights.iter().copied());
        }
        for layer in layers {
            params.extend(layer.biases.iter().copied());
        }
        params
    }

    /// Rebuilds layers for `architecture` from a parameter vector.
    pub fn decode(architecture: &Architecture, params: &[f32]) -> Result<Vec<Layer>> {
        let expected = architecture.parameter_count();
        if params.len() != expected {
            return Err(NeuroError::ShapeMismatch {
                expected,
                actual: params.len(),
            });
        }

        let (weight_section, bias_section) = params.split_at(architecture.weight_count());
        let mut weight_cursor = 0;
        let mut bias_cursor = 0;
        let mut layers = Vec::with_capacity(architecture.layer_count());

        for (n_in, n_out) in architecture.layer_shapes() {
            let w = &weight_section[weight_cursor..weight_cursor + n_in * n_out];
            let b = &bias_section[bias_cursor..bias_cursor + n_out];
            weight_cursor += n_in * n_out;
            bias_cursor += n_out;

            let weights = Array2::from_shape_vec((n_out, n_in), w.to_vec()).map_err(|_| {
                NeuroError::ShapeMismatch {
                    expected: n_in * n_out,
                    actual: w.len(),
                }
            })?;
            layers.push(Layer {
                weights,
                biases: Array1::from_vec(b.to_vec()),
            });
        }
        Ok(layers)
    }
}
