use crate::Tensor;
use placex_core::{
    context::{context_pool, DeviceContext, StreamHandle},
    dtype::Element,
    error::{Error, Result},
    has_device_support, memory,
    place::Place,
};

/// Transfer path between two places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRoute {
    HostToHost,
    HostToDevice { dst: usize },
    DeviceToHost { src: usize },
    DeviceToDevice { src: usize, dst: usize },
}

impl CopyRoute {
    pub fn new(src: Place, dst: Place) -> Self {
        match (src, dst) {
            (Place::Host, Place::Host) => Self::HostToHost,
            (Place::Host, Place::Device(dst)) => Self::HostToDevice { dst },
            (Place::Device(src), Place::Host) => Self::DeviceToHost { src },
            (Place::Device(src), Place::Device(dst)) => Self::DeviceToDevice { src, dst },
        }
    }

    /// Whether the copy is stream-ordered rather than blocking.
    pub fn is_async(&self) -> bool {
        !matches!(self, Self::HostToHost)
    }

    /// Validates `ctx` against the device endpoints and returns the stream to
    /// order the copy on. Host to host copies need neither.
    ///
    /// Every device endpoint must be exactly the context's device. In a build
    /// without device support any device route is `UnsupportedPlace`, whatever
    /// the context.
    pub fn stream_for(&self, ctx: &dyn DeviceContext) -> Result<Option<StreamHandle>> {
        let (first, second) = match *self {
            Self::HostToHost => return Ok(None),
            Self::HostToDevice { dst } => (dst, None),
            Self::DeviceToHost { src } => (src, None),
            Self::DeviceToDevice { src, dst } => (src, Some(dst)),
        };

        if !has_device_support() {
            return Err(Error::UnsupportedPlace {
                place: Place::Device(first),
            });
        }

        let ctx_place = ctx.place();
        if !ctx_place.is_device() {
            return Err(Error::ContextNotDevice { place: ctx_place });
        }
        for endpoint in std::iter::once(first).chain(second).map(Place::Device) {
            if endpoint != ctx_place {
                return Err(Error::PlaceMismatch {
                    expected: ctx_place,
                    got: endpoint,
                });
            }
        }

        ctx.stream()
            .map(Some)
            .ok_or(Error::MissingStream { place: ctx_place })
    }

    /// # Safety
    ///
    /// Same contract as [`memory::copy`] and [`memory::copy_async`].
    unsafe fn dispatch(
        &self,
        dst_place: Place,
        dst: *mut u8,
        src_place: Place,
        src: *const u8,
        size: usize,
        stream: Option<StreamHandle>,
    ) -> Result<()> {
        tracing::trace!(route = ?self, size, "dispatching copy");
        match stream {
            Some(stream) if self.is_async() => memory::copy_async(dst_place, dst, src_place, src, size, stream),
            _ => memory::copy(dst_place, dst, src_place, src, size),
        }
    }
}

/// ## Cross-place copies
///
/// Host to host copies complete before returning. Any copy with a device
/// endpoint is enqueued on the context's stream and is only complete once
/// that stream has been waited on; readers of the destination must order
/// themselves after it.
impl Tensor {
    /// Copies `src` (read as `T`) into `self` in `dst_place`, taking over its dims.
    ///
    /// `self` is reallocated when its storage does not fit, as in
    /// [`mutable_data`](Self::mutable_data).
    ///
    /// # Errors
    ///
    /// * `NotInitialized` / `OutOfBounds` when `src` does not hold `T` data
    /// * `ContextNotDevice` when a device endpoint is involved and `ctx` is not a device
    /// * `PlaceMismatch` when a device endpoint is not `ctx`'s device
    /// * `UnsupportedPlace` for device endpoints in a build without device support
    pub fn copy_from<T: Element>(&mut self, src: &Tensor, dst_place: Place, ctx: &dyn DeviceContext) -> Result<()> {
        src.check_memory_size::<T>()?;
        let src_place = src.place().ok_or(Error::NotInitialized)?;

        let route = CopyRoute::new(src_place, dst_place);
        let stream = route.stream_for(ctx)?;

        self.resize(src.dims().clone());
        let dst_ptr = self.mutable_data::<T>(dst_place)? as *mut u8;
        let src_ptr = src.data::<T>()? as *const u8;
        let size = src.required_bytes::<T>()?;

        unsafe { route.dispatch(dst_place, dst_ptr, src_place, src_ptr, size, stream) }
    }

    /// Copies a host slice into `self`, placed where `ctx` executes.
    ///
    /// The dims must already describe `src.len()` elements. A device copy is
    /// enqueued on `ctx`'s stream.
    pub fn copy_from_vec<T: Element>(&mut self, src: &[T], ctx: &dyn DeviceContext) -> Result<()> {
        let expected = self.numel();
        if expected != src.len() {
            return Err(Error::LengthMismatch {
                dims: self.dims.clone(),
                expected,
                got: src.len(),
            });
        }

        let dst_place = ctx.place();
        let route = CopyRoute::new(Place::Host, dst_place);
        let stream = route.stream_for(ctx)?;

        let dst_ptr = self.mutable_data::<T>(dst_place)? as *mut u8;
        let bytes: &[u8] = bytemuck::cast_slice(src);

        unsafe { route.dispatch(dst_place, dst_ptr, Place::Host, bytes.as_ptr(), bytes.len(), stream) }
    }

    /// Reads the tensor back into host memory as `T`.
    ///
    /// Device sources are copied on `ctx`'s stream, which is waited on before
    /// returning.
    pub fn copy_to_vec<T: Element>(&self, ctx: &dyn DeviceContext) -> Result<Vec<T>> {
        self.check_memory_size::<T>()?;
        let src_place = self.place().ok_or(Error::NotInitialized)?;

        let route = CopyRoute::new(src_place, Place::Host);
        let stream = route.stream_for(ctx)?;

        let mut values = vec![<T as bytemuck::Zeroable>::zeroed(); self.numel()];
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut values);
        let src_ptr = self.data::<T>()? as *const u8;

        unsafe { route.dispatch(Place::Host, dst.as_mut_ptr(), src_place, src_ptr, dst.len(), stream)? };
        if route.is_async() {
            ctx.wait()?;
        }

        Ok(values)
    }

    /// [`copy_to_vec`](Self::copy_to_vec) through the pooled context of the tensor's place.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let place = self.place().ok_or(Error::NotInitialized)?;
        let ctx = context_pool().get(place)?;
        self.copy_to_vec::<T>(ctx.as_ref())
    }
}
