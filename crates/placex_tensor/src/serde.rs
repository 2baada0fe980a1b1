use crate::Tensor;
use ::serde::{Deserialize, Serialize};
use placex_core::{
    context::DeviceContext,
    dims::Dims,
    dtype::{DType, Element},
    error::{Error, Result},
};

/// Wire form: dims, element type, and the native-endian bytes of the
/// `numel` elements the view covers.
#[derive(Serialize, Deserialize)]
struct SerializedTensor {
    dims: Dims,
    dtype: DType,
    data: Vec<u8>,
}

impl SerializedTensor {
    fn capture<T: Element>(tensor: &Tensor) -> Result<Self> {
        let values = tensor.to_vec::<T>()?;
        Ok(Self {
            dims: tensor.dims().clone(),
            dtype: T::DTYPE,
            data: bytemuck::cast_slice(&values).to_vec(),
        })
    }

    fn restore<T: Element>(self, ctx: &dyn DeviceContext) -> Result<Tensor> {
        if self.dtype != T::DTYPE {
            return Err(Error::DTypeMismatch {
                expected: T::DTYPE,
                got: self.dtype,
            });
        }
        let width = std::mem::size_of::<T>();
        if self.data.len() % width != 0 {
            return Err(Error::Deserialization(format!(
                "{} bytes do not form whole {} elements",
                self.data.len(),
                T::DTYPE
            )));
        }

        // the byte vector carries no alignment guarantee for T
        let values: Vec<T> = self.data.chunks_exact(width).map(bytemuck::pod_read_unaligned).collect();

        let mut tensor = Tensor::with_dims(self.dims);
        tensor.copy_from_vec(&values, ctx)?;
        // `values` is dropped on return, so the copy must have landed
        ctx.wait()?;
        Ok(tensor)
    }
}

impl Tensor {
    pub fn to_bytes<T: Element>(&self) -> Result<Vec<u8>> {
        let serialized = SerializedTensor::capture::<T>(self)?;
        let config = bincode::config::legacy();
        bincode::serde::encode_to_vec(&serialized, config)
            .map_err(|e| Error::Serialization(format!("Failed to serialize tensor: {}", e)))
    }

    pub fn from_bytes<T: Element>(bytes: &[u8], ctx: &dyn DeviceContext) -> Result<Self> {
        let config = bincode::config::legacy();
        let (serialized, _): (SerializedTensor, usize) = bincode::serde::decode_from_slice(bytes, config)
            .map_err(|e| Error::Deserialization(format!("Failed to deserialize tensor: {}", e)))?;
        serialized.restore::<T>(ctx)
    }

    pub fn to_json<T: Element>(&self) -> Result<String> {
        let serialized = SerializedTensor::capture::<T>(self)?;
        serde_json::to_string(&serialized)
            .map_err(|e| Error::Serialization(format!("Failed to serialize tensor to JSON: {}", e)))
    }

    pub fn from_json<T: Element>(json: &str, ctx: &dyn DeviceContext) -> Result<Self> {
        let serialized: SerializedTensor = serde_json::from_str(json)
            .map_err(|e| Error::Deserialization(format!("Failed to deserialize tensor from JSON: {}", e)))?;
        serialized.restore::<T>(ctx)
    }
}
