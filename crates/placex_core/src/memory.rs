//! Allocation and copy primitives, dispatched on [`Place`].
//!
//! These are the only functions that touch raw host or device memory. Host
//! paths go through `placex_cpu`; device paths go through `placex_cuda` and
//! exist only in builds with the `cuda` feature. Without it, every device path
//! returns [`Error::UnsupportedPlace`].

use crate::{
    context::StreamHandle,
    error::{Error, Result},
    place::Place,
};
use placex_cpu::{host_alloc, host_free, host_memcpy};
use std::ptr::NonNull;

/// Allocates `size` bytes in `place`. Host memory is zeroed.
pub fn allocate(place: Place, size: usize) -> Result<NonNull<u8>> {
    if size == 0 {
        return Ok(NonNull::dangling());
    }

    let ptr = match place {
        Place::Host => host_alloc(size),
        #[cfg(feature = "cuda")]
        Place::Device(id) => cuda::malloc(id, size)?,
        #[cfg(not(feature = "cuda"))]
        Place::Device(_) => return Err(Error::UnsupportedPlace { place }),
    };

    NonNull::new(ptr).ok_or(Error::OutOfMemory { place, size })
}

/// # Safety
///
/// `ptr` must have been returned by `allocate(place, size)` with the same
/// `place` and `size`, and must not be used afterwards.
pub unsafe fn deallocate(place: Place, ptr: NonNull<u8>, size: usize) {
    if size == 0 {
        return;
    }

    match place {
        Place::Host => host_free(ptr.as_ptr(), size),
        #[cfg(feature = "cuda")]
        Place::Device(id) => cuda::free(id, ptr.as_ptr()),
        #[cfg(not(feature = "cuda"))]
        Place::Device(_) => {},
    }
}

/// Blocking copy of `size` bytes. Returns once the bytes have landed.
///
/// # Safety
///
/// * `src` must be valid for reads of `size` bytes in `src_place`
/// * `dst` must be valid for writes of `size` bytes in `dst_place`
pub unsafe fn copy(dst_place: Place, dst: *mut u8, src_place: Place, src: *const u8, size: usize) -> Result<()> {
    tracing::trace!(%src_place, %dst_place, size, "blocking copy");

    if size == 0 {
        return Ok(());
    }

    match (src_place, dst_place) {
        (Place::Host, Place::Host) => {
            host_memcpy(dst, src, size);
            Ok(())
        },
        #[cfg(feature = "cuda")]
        _ => cuda::copy(dst_place, dst, src_place, src, size),
        #[cfg(not(feature = "cuda"))]
        _ => Err(unsupported(src_place, dst_place)),
    }
}

/// Stream-ordered copy of `size` bytes.
///
/// Device routes are only enqueued: the copy is complete once `stream` has
/// been synchronized, and both ranges must stay alive until then. A host to
/// host request is performed synchronously.
///
/// # Safety
///
/// * `src` must be valid for reads of `size` bytes in `src_place` until the copy executes
/// * `dst` must be valid for writes of `size` bytes in `dst_place` until the copy executes
/// * `stream` must belong to a live context
pub unsafe fn copy_async(
    dst_place: Place,
    dst: *mut u8,
    src_place: Place,
    src: *const u8,
    size: usize,
    stream: StreamHandle,
) -> Result<()> {
    if src_place.is_host() && dst_place.is_host() {
        return copy(dst_place, dst, src_place, src, size);
    }

    tracing::trace!(%src_place, %dst_place, size, ?stream, "stream-ordered copy");

    if size == 0 {
        return Ok(());
    }

    #[cfg(feature = "cuda")]
    {
        cuda::copy_async(dst_place, dst, src_place, src, size, stream)
    }
    #[cfg(not(feature = "cuda"))]
    {
        let _ = stream;
        Err(unsupported(src_place, dst_place))
    }
}

#[cfg(not(feature = "cuda"))]
fn unsupported(src_place: Place, dst_place: Place) -> Error {
    let place = if src_place.is_device() { src_place } else { dst_place };
    Error::UnsupportedPlace { place }
}

#[cfg(feature = "cuda")]
mod cuda {
    use super::*;
    use placex_cuda::{
        cuda_free, cuda_malloc, cuda_memcpy, cuda_memcpy_async, cuda_memcpy_peer_async, cuda_set_device,
        cuda_stream_synchronize, CUDA_ERROR_MEMORY_ALLOCATION, CUDA_SUCCESS, MEMCPY_DEVICE_TO_DEVICE,
        MEMCPY_DEVICE_TO_HOST, MEMCPY_HOST_TO_DEVICE,
    };
    use std::ffi::c_void;

    fn check(status: i32) -> Result<()> {
        if status == CUDA_SUCCESS {
            Ok(())
        } else {
            Err(Error::from_cuda_error(status))
        }
    }

    fn set_device(id: usize) -> Result<()> {
        check(unsafe { cuda_set_device(id as i32) })
    }

    pub(super) fn malloc(id: usize, size: usize) -> Result<*mut u8> {
        set_device(id)?;
        let mut ptr: *mut c_void = std::ptr::null_mut();
        let status = unsafe { cuda_malloc(&mut ptr, size) };
        if status == CUDA_ERROR_MEMORY_ALLOCATION {
            return Err(Error::OutOfMemory {
                place: Place::Device(id),
                size,
            });
        }
        check(status)?;
        Ok(ptr as *mut u8)
    }

    pub(super) unsafe fn free(id: usize, ptr: *mut u8) {
        if cuda_set_device(id as i32) == CUDA_SUCCESS {
            let status = cuda_free(ptr as *mut c_void);
            if status != CUDA_SUCCESS {
                tracing::warn!(device_id = id, status, "cudaFree failed");
            }
        }
    }

    pub(super) unsafe fn copy(dst_place: Place, dst: *mut u8, src_place: Place, src: *const u8, size: usize) -> Result<()> {
        let (dst, src) = (dst as *mut c_void, src as *const c_void);
        match (src_place, dst_place) {
            (Place::Host, Place::Device(d)) => {
                set_device(d)?;
                check(cuda_memcpy(dst, src, size, MEMCPY_HOST_TO_DEVICE))
            },
            (Place::Device(s), Place::Host) => {
                set_device(s)?;
                check(cuda_memcpy(dst, src, size, MEMCPY_DEVICE_TO_HOST))
            },
            (Place::Device(s), Place::Device(d)) if s == d => {
                set_device(d)?;
                check(cuda_memcpy(dst, src, size, MEMCPY_DEVICE_TO_DEVICE))
            },
            (Place::Device(s), Place::Device(d)) => {
                // the legacy default stream, then wait on it
                set_device(d)?;
                let default_stream = std::ptr::null_mut();
                check(cuda_memcpy_peer_async(dst, d as i32, src, s as i32, size, default_stream))?;
                check(cuda_stream_synchronize(default_stream))
            },
            (Place::Host, Place::Host) => {
                host_memcpy(dst as *mut u8, src as *const u8, size);
                Ok(())
            },
        }
    }

    pub(super) unsafe fn copy_async(
        dst_place: Place,
        dst: *mut u8,
        src_place: Place,
        src: *const u8,
        size: usize,
        stream: StreamHandle,
    ) -> Result<()> {
        let (dst, src, stream) = (dst as *mut c_void, src as *const c_void, stream.as_raw());
        match (src_place, dst_place) {
            (Place::Host, Place::Device(d)) => {
                set_device(d)?;
                check(cuda_memcpy_async(dst, src, size, MEMCPY_HOST_TO_DEVICE, stream))
            },
            (Place::Device(s), Place::Host) => {
                set_device(s)?;
                check(cuda_memcpy_async(dst, src, size, MEMCPY_DEVICE_TO_HOST, stream))
            },
            (Place::Device(s), Place::Device(d)) if s == d => {
                set_device(d)?;
                check(cuda_memcpy_async(dst, src, size, MEMCPY_DEVICE_TO_DEVICE, stream))
            },
            (Place::Device(s), Place::Device(d)) => {
                set_device(d)?;
                check(cuda_memcpy_peer_async(dst, d as i32, src, s as i32, size, stream))
            },
            (Place::Host, Place::Host) => {
                host_memcpy(dst as *mut u8, src as *const u8, size);
                Ok(())
            },
        }
    }
}
