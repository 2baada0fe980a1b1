use crate::Tensor;
use placex_core::{
    dtype::Element,
    error::{Error, Result},
};
use std::mem;

/// ## Zero-copy views
///
/// Every view shares the source buffer; none of them copies or allocates.
impl Tensor {
    /// Makes `self` a full alias of `src`: same buffer, dims and offset.
    ///
    /// `src` must already hold enough storage to be read as `T`.
    pub fn share_data_with<T: Element>(&mut self, src: &Tensor) -> Result<&mut Self> {
        src.check_memory_size::<T>()?;
        *self = src.clone();
        Ok(self)
    }

    /// Rows `begin..end` along the leading dimension.
    ///
    /// The bounds are checked first; after that, a tensor whose leading
    /// extent is 1 is returned as-is.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` / `OutOfBounds` when the storage does not fit `T`
    /// * `NotSliceable` for a rank-0 tensor
    /// * `SliceBegin` when `begin < 0`
    /// * `SliceEnd` when `end` exceeds the leading extent
    /// * `SliceRange` when `begin >= end`
    pub fn slice<T: Element>(&self, begin: isize, end: isize) -> Result<Tensor> {
        self.check_memory_size::<T>()?;

        let extent = self
            .dims
            .first()
            .ok_or_else(|| Error::NotSliceable { dims: self.dims.clone() })?;
        if begin < 0 {
            return Err(Error::SliceBegin { begin });
        }
        if end > 0 && end as usize > extent {
            return Err(Error::SliceEnd { end, extent });
        }
        if begin >= end {
            return Err(Error::SliceRange { begin, end });
        }

        if extent == 1 {
            return Ok(self.clone());
        }

        let (begin, end) = (begin as usize, end as usize);
        let stride = self.numel() / extent;

        let mut dims = self.dims.clone();
        dims.set_first(end - begin);

        Ok(Tensor {
            dims,
            offset: self.offset + begin * stride * mem::size_of::<T>(),
            holder: self.holder.clone(),
        })
    }
}

/// A two-dimensional alias of `src`: the leading `num_col_dims` extents become
/// the rows, the rest become the columns.
pub fn reshape_to_matrix<T: Element>(src: &Tensor, num_col_dims: usize) -> Result<Tensor> {
    let mut dst = Tensor::new();
    dst.share_data_with::<T>(src)?;
    dst.resize(src.dims().flatten_to_2d(num_col_dims)?);
    Ok(dst)
}
