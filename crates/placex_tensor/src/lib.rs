mod access;
mod copy;
#[cfg(feature = "serde")]
mod serde;
mod view;

pub use copy::CopyRoute;
pub use view::reshape_to_matrix;

use placex_core::{
    dims::Dims,
    holder::{BufferId, RawBuffer},
    place::Place,
};
use std::{fmt, sync::Arc};

/// A shaped view over a shared, untyped [`RawBuffer`].
///
/// The tensor owns its `dims` and byte `offset`; the buffer is shared with
/// every tensor derived from it by `clone`, `share_data_with`, `slice` or
/// `reshape_to_matrix`. Writes through one alias are visible through all of
/// them, and nothing here serializes such writes.
///
/// Storage is allocated lazily by the first [`mutable_data`](Self::mutable_data)
/// call. Element types are supplied per call and never stored.
#[derive(Clone, Default)]
pub struct Tensor {
    dims: Dims,
    offset: usize,
    holder: Option<Arc<RawBuffer>>,
}

impl Tensor {
    /// A rank-0 tensor with no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tensor with the given dims and no storage.
    pub fn with_dims(dims: impl Into<Dims>) -> Self {
        Self {
            dims: dims.into(),
            ..Self::default()
        }
    }

    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    pub fn numel(&self) -> usize {
        self.dims.product()
    }

    /// Byte offset of this view into its buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn place(&self) -> Option<Place> {
        self.holder.as_ref().map(|holder| holder.place())
    }

    pub fn is_initialized(&self) -> bool {
        self.holder.is_some()
    }

    /// Bytes of the buffer from this view's offset to its end.
    pub fn memory_size(&self) -> usize {
        self.holder
            .as_ref()
            .map_or(0, |holder| holder.size().saturating_sub(self.offset))
    }

    pub fn holder(&self) -> Option<&Arc<RawBuffer>> {
        self.holder.as_ref()
    }

    pub fn buffer_id(&self) -> Option<BufferId> {
        self.holder.as_ref().map(|holder| holder.id())
    }

    pub fn shares_buffer_with(&self, other: &Tensor) -> bool {
        match (&self.holder, &other.holder) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Replaces the dims. The buffer and offset are untouched; a later typed
    /// access decides whether the storage still fits.
    pub fn resize(&mut self, dims: impl Into<Dims>) -> &mut Self {
        self.dims = dims.into();
        self
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("dims", &self.dims)
            .field("offset", &self.offset)
            .field("holder", &self.holder)
            .finish()
    }
}
