pub mod context;
pub mod dims;
pub mod dtype;
pub mod error;
pub mod holder;
pub mod memory;
pub mod place;

pub use placex_cpu as cpu;
#[cfg(feature = "cuda")]
pub use placex_cuda as cuda;

/// Whether this build can allocate and copy on `Place::Device`.
pub const fn has_device_support() -> bool {
    cfg!(feature = "cuda")
}
