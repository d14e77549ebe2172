//! Error types for network construction, propagation and persistence.

/// Errors raised by the network engine.
///
/// Dimension and configuration errors are raised at the boundary where they
/// are first detectable, before any propagation work begins. Weight
/// divergence during training is not an error: `train` reports it by
/// returning `Ok(false)`.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    /// Input vector length does not match the layer's input size.
    #[error("input dimension mismatch at {layer}: expected {expected}, got {actual}")]
    InputDimensionMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// Target vector length does not match the network output size.
    #[error("output dimension mismatch: dim(target)={actual}, dim(network output)={expected}")]
    OutputDimensionMismatch { expected: usize, actual: usize },

    /// Class label is not a valid output index.
    #[error(
        "label {label} out of range for dim(network output)={out_dim}; \
         dim(network output) must be greater than max class id"
    )]
    LabelOutOfRange { label: usize, out_dim: usize },

    /// Coordinate of a partial target is not a valid output index.
    #[error("partial target updates coordinate {index}, dim(network output)={out_dim}")]
    PartialIndexOutOfRange { index: usize, out_dim: usize },

    /// A training or evaluation sample failed validation.
    #[error("sample {index}: {source}")]
    InvalidSample {
        index: usize,
        #[source]
        source: Box<NetworkError>,
    },

    /// Number of inputs and number of training signals differ.
    #[error("number of training data ({inputs}) must be equal to label data ({targets})")]
    DataMismatch { inputs: usize, targets: usize },

    /// A layer was appended whose input size differs from the tail's output size.
    #[error("cannot connect {layer}: previous layer outputs {expected} values, layer takes {actual}")]
    ConnectionMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// A workspace was built for a different chain, or without gradient
    /// slots for a backward pass.
    #[error("workspace does not fit the network: {0}")]
    WorkspaceMismatch(&'static str),

    /// The network has no layer past the input layer.
    #[error("network has no layers")]
    EmptyNetwork,

    #[error("unknown grad-check mode: {0}")]
    UnknownGradCheckMode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The weight stream ended before every layer was filled.
    #[error("weight stream ended while loading layer {layer}")]
    WeightStreamTruncated { layer: usize },

    #[error("invalid weight value: {0}")]
    ParseWeight(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl NetworkError {
    /// Attaches the index of the offending sample.
    pub fn at_sample(self, index: usize) -> NetworkError {
        match self {
            NetworkError::InvalidSample { .. } => self,
            other => NetworkError::InvalidSample { index, source: Box::new(other) },
        }
    }
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
