//! Fully connected feed-forward network used as the evolvable model.
//!
//! The network is a stateless numeric transform. All learnable state lives
//! in its [`Layer`]s and is exposed to the optimizer through
//! [`ParameterizedModel`] via the [`ParameterCodec`].

pub mod codec;

pub use codec::ParameterCodec;

use crate::ParameterizedModel;
use crate::error::{NeuroError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered layer sizes shared by every model in a run.
///
/// Immutable once constructed. `[2, 4, 4, 1]` describes two inputs, two
/// hidden layers of four units and a single output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Architecture {
    sizes: Vec<usize>,
}

impl Architecture {
    /// # Errors
    ///
    /// Returns [`NeuroError::InvalidArchitecture`] when fewer than two layers
    /// are given or any layer has zero width.
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(NeuroError::InvalidArchitecture(format!(
                "need at least an input and an output layer, got {} layer(s)",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(NeuroError::InvalidArchitecture(format!(
                "layer {pos} has zero width"
            )));
        }
        Ok(Self { sizes })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Number of weight layers (one less than the number of layer sizes).
    pub fn layer_count(&self) -> usize {
        self.sizes.len() - 1
    }

    /// `(inputs, outputs)` of each weight layer, in order.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn weight_count(&self) -> usize {
        self.layer_shapes().map(|(i, o)| i * o).sum()
    }

    pub fn bias_count(&self) -> usize {
        self.sizes[1..].iter().sum()
    }

    /// Length of the parameter vector of every model with this architecture.
    pub fn parameter_count(&self) -> usize {
        self.weight_count() + self.bias_count()
    }
}

impl TryFrom<Vec<usize>> for Architecture {
    type Error = NeuroError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        Self::new(sizes)
    }
}

impl From<Architecture> for Vec<usize> {
    fn from(arch: Architecture) -> Self {
        arch.sizes
    }
}

/// Nonlinearity applied after every layer, the output layer included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    Sigmoid,
    Tanh,
    Relu,
    Identity,
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::Identity => x,
        }
    }
}

/// One dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    fn forward(&self, inputs: ArrayView1<f32>, activation: Activation) -> Array1<f32> {
        let mut output = self.weights.dot(&inputs);
        output += &self.biases;
        output.mapv_inplace(|x| activation.apply(x));
        output
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedForwardNetwork {
    architecture: Architecture,
    activation: Activation,
    layers: Vec<Layer>,
}

impl<'de> Deserialize<'de> for FeedForwardNetwork {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct NetworkData {
            architecture: Architecture,
            activation: Activation,
            layers: Vec<Layer>,
        }

        // Layer shapes must match the architecture.
        let data = NetworkData::deserialize(deserializer)?;
        Self::from_layers(data.architecture, data.activation, data.layers)
            .map_err(serde::de::Error::custom)
    }
}

impl FeedForwardNetwork {
    /// Creates a network with weights and biases drawn uniformly from `[-1, 1)`.
    pub fn random<R: Rng>(architecture: Architecture, activation: Activation, rng: &mut R) -> Self {
        let layers = architecture
            .layer_shapes()
            .map(|(n_in, n_out)| Layer {
                weights: Array2::from_shape_fn((n_out, n_in), |_| rng.random_range(-1.0..1.0)),
                biases: Array1::from_shape_fn(n_out, |_| rng.random_range(-1.0..1.0)),
            })
            .collect();
        Self {
            architecture,
            activation,
            layers,
        }
    }

    /// Creates a network with every parameter set to zero.
    pub fn zeros(architecture: Architecture, activation: Activation) -> Self {
        let layers = architecture
            .layer_shapes()
            .map(|(n_in, n_out)| Layer {
                weights: Array2::zeros((n_out, n_in)),
                biases: Array1::zeros(n_out),
            })
            .collect();
        Self {
            architecture,
            activation,
            layers,
        }
    }

    /// Assembles a network from explicit layers, checking every shape
    /// against `architecture`.
    pub fn from_layers(
        architecture: Architecture,
        activation: Activation,
        layers: Vec<Layer>,
    ) -> Result<Self> {
        if layers.len() != architecture.layer_count() {
            return Err(NeuroError::InvalidArchitecture(format!(
                "expected {} layers, got {}",
                architecture.layer_count(),
                layers.len()
            )));
        }
        for (idx, (layer, (n_in, n_out))) in
            layers.iter().zip(architecture.layer_shapes()).enumerate()
        {
            if layer.weights.dim() != (n_out, n_in) || layer.biases.len() != n_out {
                return Err(NeuroError::InvalidArchitecture(format!(
                    "layer {idx} has weights {:?} and {} biases, \
                     expected ({n_out}, {n_in}) and {n_out}",
                    layer.weights.dim(),
                    layer.biases.len()
                )));
            }
        }
        Ok(Self {
            architecture,
            activation,
            layers,
        })
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Runs the forward pass.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the architecture's input width.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(
            input.len(),
            self.architecture.input_size(),
            "input width does not match the network's input layer"
        );
        let mut activations = Array1::from_vec(input.to_vec());
        for layer in &self.layers {
            activations = layer.forward(activations.view(), self.activation);
        }
        activations.to_vec()
    }
}

impl ParameterizedModel for FeedForwardNetwork {
    fn parameter_count(&self) -> usize {
        self.architecture.parameter_count()
    }

    fn parameters(&self) -> Vec<f32> {
        ParameterCodec::encode(&self.layers)
    }

    fn set_parameters(&mut self, params: &[f32]) -> Result<()> {
        // Decode fully before touching self so a mismatch leaves us intact.
        self.layers = ParameterCodec::decode(&self.architecture, params)?;
        Ok(())
    }

    fn evaluate(&self, input: &[f32]) -> Vec<f32> {
        self.forward(input)
    }
}
