#![allow(non_snake_case)]

use std::ffi::{c_char, c_void, CStr};

pub const CUDA_SUCCESS: i32 = 0;
pub const CUDA_ERROR_MEMORY_ALLOCATION: i32 = 2;

pub const MEMCPY_HOST_TO_DEVICE: i32 = 1;
pub const MEMCPY_DEVICE_TO_HOST: i32 = 2;
pub const MEMCPY_DEVICE_TO_DEVICE: i32 = 3;

#[link(name = "cudart")]
extern "C" {
    fn cudaMalloc(ptr: *mut *mut c_void, size: usize) -> i32;
    fn cudaFree(ptr: *mut c_void) -> i32;
    fn cudaMemcpy(dst: *mut c_void, src: *const c_void, count: usize, kind: i32) -> i32;
    fn cudaMemcpyAsync(dst: *mut c_void, src: *const c_void, count: usize, kind: i32, stream: *mut c_void) -> i32;
    fn cudaMemcpyPeerAsync(
        dst: *mut c_void,
        dst_device: i32,
        src: *const c_void,
        src_device: i32,
        count: usize,
        stream: *mut c_void,
    ) -> i32;
    fn cudaGetErrorString(error: i32) -> *const c_char;
    fn cudaSetDevice(device: i32) -> i32;
    fn cudaGetDeviceCount(count: *mut i32) -> i32;
    fn cudaStreamCreate(stream: *mut *mut c_void) -> i32;
    fn cudaStreamDestroy(stream: *mut c_void) -> i32;
    fn cudaStreamSynchronize(stream: *mut c_void) -> i32;
}

/// # Safety
///
/// * `ptr` must be valid for writes
/// * The allocated memory must be released with `cuda_free`
/// * The size must not be zero
#[no_mangle]
pub unsafe extern "C" fn cuda_malloc(ptr: *mut *mut c_void, size: usize) -> i32 {
    cudaMalloc(ptr, size)
}

/// # Safety
///
/// * `ptr` must have been allocated by `cuda_malloc`
/// * The pointer must not be used after being freed
#[no_mangle]
pub unsafe extern "C" fn cuda_free(ptr: *mut c_void) -> i32 {
    cudaFree(ptr)
}

/// Blocking copy. `kind` is one of the `MEMCPY_*` constants.
///
/// # Safety
///
/// * `dst` and `src` must be valid for `size` bytes in the memory spaces named by `kind`
/// * The memory regions must not overlap
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy(dst: *mut c_void, src: *const c_void, size: usize, kind: i32) -> i32 {
    cudaMemcpy(dst, src, size, kind)
}

/// Stream-ordered copy. Returns as soon as the copy is enqueued.
///
/// # Safety
///
/// * `dst` and `src` must stay valid until the copy has executed on `stream`
/// * `stream` must have been created by `cuda_stream_create`
/// * The memory regions must not overlap
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy_async(
    dst: *mut c_void,
    src: *const c_void,
    size: usize,
    kind: i32,
    stream: *mut c_void,
) -> i32 {
    cudaMemcpyAsync(dst, src, size, kind, stream)
}

/// Stream-ordered copy between two devices.
///
/// # Safety
///
/// * `dst` must be a device pointer on `dst_device`, `src` a device pointer on `src_device`
/// * Both must stay valid until the copy has executed on `stream`
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy_peer_async(
    dst: *mut c_void,
    dst_device: i32,
    src: *const c_void,
    src_device: i32,
    size: usize,
    stream: *mut c_void,
) -> i32 {
    cudaMemcpyPeerAsync(dst, dst_device, src, src_device, size, stream)
}

/// Converts a CUDA error code into a human-readable string.
pub fn cuda_error(error_code: i32) -> String {
    unsafe {
        let c_str = cudaGetErrorString(error_code);
        if c_str.is_null() {
            format!("Unknown CUDA error: {}", error_code)
        } else {
            CStr::from_ptr(c_str).to_string_lossy().into_owned()
        }
    }
}

/// # Safety
///
/// `device_id` must be a valid device index.
#[no_mangle]
pub unsafe extern "C" fn cuda_set_device(device_id: i32) -> i32 {
    cudaSetDevice(device_id)
}

/// Number of visible devices, or 0 when the runtime reports an error.
pub fn cuda_device_count() -> usize {
    let mut count = 0;
    let status = unsafe { cudaGetDeviceCount(&mut count) };
    if status != CUDA_SUCCESS {
        return 0;
    }
    count.max(0) as usize
}

/// # Safety
///
/// * `stream` must be valid for writes
/// * The stream must be destroyed using `cuda_stream_destroy`
#[no_mangle]
pub unsafe extern "C" fn cuda_stream_create(stream: *mut *mut c_void) -> i32 {
    cudaStreamCreate(stream)
}

/// # Safety
///
/// * `stream` must have been created by `cuda_stream_create`
/// * The stream must not be used after being destroyed
#[no_mangle]
pub unsafe extern "C" fn cuda_stream_destroy(stream: *mut c_void) -> i32 {
    cudaStreamDestroy(stream)
}

/// # Safety
///
/// `stream` must be a valid CUDA stream created by `cuda_stream_create`.
#[no_mangle]
pub unsafe extern "C" fn cuda_stream_synchronize(stream: *mut c_void) -> i32 {
    cudaStreamSynchronize(stream)
}
