use crate::{error::Result, memory, place::Place};
use std::{
    fmt,
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(usize);

static BUFFER_COUNTER: AtomicUsize = AtomicUsize::new(1);

#[inline]
fn next_buffer_id() -> BufferId {
    BufferId(BUFFER_COUNTER.fetch_add(1, Ordering::Relaxed))
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An untyped allocation of `size` bytes in one [`Place`].
///
/// Tensors share a `RawBuffer` through an `Arc`; the memory is returned to
/// the allocator of its place when the last reference is dropped. Every
/// buffer gets a fresh [`BufferId`], so two handles observing the same id
/// observe the same allocation.
pub struct RawBuffer {
    id: BufferId,
    place: Place,
    size: usize,
    ptr: NonNull<u8>,
}

unsafe impl Send for RawBuffer {}
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    pub fn new(place: Place, size: usize) -> Result<Self> {
        let ptr = memory::allocate(place, size)?;
        let id = next_buffer_id();
        tracing::debug!(%id, %place, size, "allocated buffer");

        Ok(Self { id, place, size, ptr })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn place(&self) -> Place {
        self.place
    }

    /// Capacity in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Writable base pointer.
    ///
    /// Takes `&self` because the buffer is shared between aliasing tensors;
    /// callers serialize writes through aliases themselves.
    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        tracing::debug!(id = %self.id, place = %self.place, size = self.size, "released buffer");
        unsafe { memory::deallocate(self.place, self.ptr, self.size) };
    }
}

impl fmt::Debug for RawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("id", &self.id)
            .field("place", &self.place)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
