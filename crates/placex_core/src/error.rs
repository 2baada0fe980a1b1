use crate::{dims::Dims, dtype::DType, place::Place};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // storage
    #[error("Tensor holds no memory. Call Tensor::mutable_data first.")]
    NotInitialized,

    #[error("Tensor's numel must be larger than zero to call Tensor::mutable_data, got dims {dims}. Call Tensor::resize first.")]
    EmptyTensor { dims: Dims },

    #[error(
        "Tensor's dims are out of bound: {required} bytes are required as {dtype} at offset {offset}, \
         but the buffer holds {available} bytes. Call Tensor::mutable_data first to re-allocate memory, \
         or maybe the requested element type mismatches the data already stored."
    )]
    OutOfBounds {
        required: usize,
        offset: usize,
        available: usize,
        dtype: DType,
    },

    #[error("Byte size of dims {dims} as {dtype} overflows usize")]
    SizeOverflow { dims: Dims, dtype: DType },

    #[error("Out of memory: failed to allocate {size} bytes on {place}")]
    OutOfMemory { place: Place, size: usize },

    // views
    #[error("Cannot slice a tensor with dims {dims}: it has no leading dimension")]
    NotSliceable { dims: Dims },

    #[error("Slice begin index {begin} is less than zero")]
    SliceBegin { begin: isize },

    #[error("Slice end index {end} is out of bound for leading extent {extent}")]
    SliceEnd { end: isize, extent: usize },

    #[error("Slice begin index {begin} must be less than end index {end}")]
    SliceRange { begin: isize, end: isize },

    #[error("Cannot flatten dims {dims} to a matrix at column split {num_col_dims}")]
    InvalidSplit { dims: Dims, num_col_dims: usize },

    #[error("Length mismatch: dims {dims} describe {expected} elements, got {got}")]
    LengthMismatch { dims: Dims, expected: usize, got: usize },

    // places
    #[error("{place} is not supported in this build")]
    UnsupportedPlace { place: Place },

    #[error("Device context must be bound to a device for this copy, got {place}")]
    ContextNotDevice { place: Place },

    #[error("Place mismatch: device context is bound to {expected}, copy endpoint is {got}")]
    PlaceMismatch { expected: Place, got: Place },

    #[error("Device context for {place} exposes no stream")]
    MissingStream { place: Place },

    #[cfg(feature = "cuda")]
    #[error("CUDA error: {0}")]
    Cuda(String),

    // serde
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },

    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[cfg(feature = "serde")]
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    #[cfg(feature = "cuda")]
    pub fn from_cuda_error(error_code: i32) -> Self {
        Self::Cuda(placex_cuda::cuda_error(error_code))
    }
}
