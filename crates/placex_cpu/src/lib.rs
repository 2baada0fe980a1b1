use rayon::prelude::*;
use std::alloc::{alloc_zeroed, dealloc, Layout};

/// Alignment of every host allocation. Wide enough for any element type and for AVX-512 loads.
pub const HOST_ALIGNMENT: usize = 64;

/// Copies at or above this many bytes are split across the rayon pool.
pub const PARALLEL_COPY_THRESHOLD: usize = 1 << 20;

const COPY_CHUNK: usize = 1 << 18;

fn host_layout(size: usize) -> Option<Layout> {
    Layout::from_size_align(size, HOST_ALIGNMENT).ok()
}

/// Allocates `size` zeroed bytes on the host.
///
/// Returns a null pointer when `size` is zero, when the layout is invalid,
/// or when the system allocator fails.
pub fn host_alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return std::ptr::null_mut();
    }
    match host_layout(size) {
        Some(layout) => unsafe { alloc_zeroed(layout) },
        None => std::ptr::null_mut(),
    }
}

/// # Safety
///
/// * `ptr` must have been returned by `host_alloc(size)` with the same `size`
/// * The pointer must not be used after being freed
pub unsafe fn host_free(ptr: *mut u8, size: usize) {
    if ptr.is_null() || size == 0 {
        return;
    }
    if let Some(layout) = host_layout(size) {
        dealloc(ptr, layout);
    }
}

/// Blocking host to host copy of `size` bytes.
///
/// Overlapping ranges fall back to a plain `memmove`. Large disjoint ranges
/// are copied in chunks on the rayon pool; the call returns once every chunk
/// has landed.
///
/// # Safety
///
/// * `src` must be valid for reads of `size` bytes
/// * `dst` must be valid for writes of `size` bytes
pub unsafe fn host_memcpy(dst: *mut u8, src: *const u8, size: usize) {
    if size == 0 || dst as *const u8 == src {
        return;
    }

    let dst_addr = dst as usize;
    let src_addr = src as usize;
    let overlapping = dst_addr < src_addr + size && src_addr < dst_addr + size;

    if overlapping {
        std::ptr::copy(src, dst, size);
    } else if size < PARALLEL_COPY_THRESHOLD {
        std::ptr::copy_nonoverlapping(src, dst, size);
    } else {
        // raw pointers are not Send, so the chunks carry plain addresses
        (0..size.div_ceil(COPY_CHUNK)).into_par_iter().for_each(|chunk| {
            let start = chunk * COPY_CHUNK;
            let len = COPY_CHUNK.min(size - start);
            std::ptr::copy_nonoverlapping((src_addr + start) as *const u8, (dst_addr + start) as *mut u8, len);
        });
    }
}
