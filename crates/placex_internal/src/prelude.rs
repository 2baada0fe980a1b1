#[cfg(feature = "cuda")]
pub use crate::core::context::CudaContext;
pub use crate::core::{
    context::{context_pool, DeviceContext, HostContext},
    dims::Dims,
    dtype::{DType, Element},
    error::{Error, Result},
    place::Place,
};
pub use crate::tensor::{reshape_to_matrix, Tensor};
