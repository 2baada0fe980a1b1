use crate::Tensor;
use placex_core::{
    dims::Dims,
    dtype::Element,
    error::{Error, Result},
    holder::RawBuffer,
    place::Place,
};
use std::{mem, sync::Arc};

/// ## Typed access and lazy allocation
///
/// Pointers returned here address memory in the tensor's place. Host
/// pointers may be dereferenced directly; device pointers are only meaningful
/// to device code and to the copy primitives.
///
/// * `mutable_data` is the only call that allocates.
/// * `data` and `data_mut` never allocate; they check that the existing
///   buffer covers `numel * size_of::<T>()` bytes past the offset.
impl Tensor {
    /// Fails with `NotInitialized` when there is no buffer, and with
    /// `OutOfBounds` when the buffer is too small for the dims read as `T`.
    pub fn check_memory_size<T: Element>(&self) -> Result<()> {
        let holder = self.holder.as_ref().ok_or(Error::NotInitialized)?;
        let required = self.required_bytes::<T>()?;

        let fits = required
            .checked_add(self.offset)
            .is_some_and(|total| holder.size() >= total);
        if !fits {
            return Err(Error::OutOfBounds {
                required,
                offset: self.offset,
                available: holder.size(),
                dtype: T::DTYPE,
            });
        }

        Ok(())
    }

    pub fn data<T: Element>(&self) -> Result<*const T> {
        self.check_memory_size::<T>()?;
        Ok(self.offset_ptr() as *const T)
    }

    pub fn data_mut<T: Element>(&mut self) -> Result<*mut T> {
        self.check_memory_size::<T>()?;
        Ok(self.offset_ptr() as *mut T)
    }

    /// Returns a writable pointer to `numel` elements of `T` in `place`,
    /// allocating if needed.
    ///
    /// The current buffer is kept when it lives in `place` and still holds
    /// `numel * size_of::<T>()` bytes past the offset. Otherwise a buffer of
    /// exactly that size replaces it and the offset resets to 0; the old
    /// buffer is released once no other tensor shares it.
    ///
    /// # Errors
    ///
    /// * `EmptyTensor` when the dims hold no elements
    /// * `UnsupportedPlace` for a device place in a build without device support
    /// * `OutOfMemory` when the allocator fails
    pub fn mutable_data<T: Element>(&mut self, place: Place) -> Result<*mut T> {
        if self.numel() == 0 {
            return Err(Error::EmptyTensor { dims: self.dims.clone() });
        }
        let required = self.required_bytes::<T>()?;

        let reusable = self.holder.as_ref().is_some_and(|holder| {
            holder.place() == place
                && required
                    .checked_add(self.offset)
                    .is_some_and(|total| holder.size() >= total)
        });

        if !reusable {
            tracing::debug!(
                dims = %self.dims,
                %place,
                required,
                previous = ?self.holder.as_ref().map(|holder| holder.id()),
                "reallocating tensor storage"
            );
            self.holder = Some(Arc::new(RawBuffer::new(place, required)?));
            self.offset = 0;
        }

        Ok(self.offset_ptr() as *mut T)
    }

    /// Runs [`resize`](Self::resize) and then [`mutable_data`](Self::mutable_data).
    pub fn mutable_data_with_dims<T: Element>(&mut self, dims: impl Into<Dims>, place: Place) -> Result<*mut T> {
        self.resize(dims);
        self.mutable_data::<T>(place)
    }

    pub(crate) fn required_bytes<T: Element>(&self) -> Result<usize> {
        self.numel()
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| Error::SizeOverflow {
                dims: self.dims.clone(),
                dtype: T::DTYPE,
            })
    }

    // only called after the holder has been checked or just created
    fn offset_ptr(&self) -> *mut u8 {
        match &self.holder {
            Some(holder) => holder.as_mut_ptr().wrapping_add(self.offset),
            None => std::ptr::null_mut(),
        }
    }
}
