#![allow(dead_code)]

use placex_core::{
    context::{DeviceContext, HostContext, StreamHandle},
    dims::Dims,
    dtype::Element,
    error::Result,
    place::Place,
};
use placex_tensor::Tensor;

pub fn setup_tensor<T: Element>(data: &[T], dims: impl Into<Dims>) -> Result<Tensor> {
    let mut tensor = Tensor::with_dims(dims);
    tensor.copy_from_vec(data, &HostContext)?;
    Ok(tensor)
}

pub fn setup_sequence(dims: impl Into<Dims>) -> Result<Tensor> {
    let dims = dims.into();
    let data: Vec<f32> = (0..dims.product()).map(|i| i as f32).collect();
    setup_tensor(&data, dims)
}

/// Writes `values` through the raw host pointer of `tensor`.
pub fn write_host<T: Element>(tensor: &mut Tensor, values: &[T]) -> Result<()> {
    let ptr = tensor.data_mut::<T>()?;
    assert!(values.len() <= tensor.numel());
    unsafe { std::ptr::copy_nonoverlapping(values.as_ptr(), ptr, values.len()) };
    Ok(())
}

/// A context claiming a device place, for exercising the checks that run
/// before any device memory is touched.
pub struct BoundContext(pub Place);

impl DeviceContext for BoundContext {
    fn place(&self) -> Place {
        self.0
    }

    fn stream(&self) -> Option<StreamHandle> {
        Some(StreamHandle::from_raw(std::ptr::null_mut()))
    }
}
