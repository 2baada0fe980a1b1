//! Shared fixtures for the criterion benches.

use placex_core::{context::HostContext, error::Result};
use placex_tensor::Tensor;

/// Element counts for each benchmark size class.
pub const SIZES: [(usize, &str); 3] = [(1 << 10, "small"), (1 << 16, "medium"), (1 << 22, "large")];

/// A host tensor of shape `[rows, size / rows]` filled with a ramp.
pub fn host_matrix(size: usize, rows: usize) -> Result<Tensor> {
    let data: Vec<f32> = (0..size).map(|i| (i % 10) as f32 / 10.0).collect();
    let mut tensor = Tensor::with_dims([rows, size / rows]);
    tensor.copy_from_vec(&data, &HostContext)?;
    Ok(tensor)
}
