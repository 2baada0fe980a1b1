use crate::{
    error::{Error, Result},
    place::Place,
};
use dashmap::DashMap;
use std::{
    ffi::c_void,
    sync::{Arc, LazyLock},
};

// ────────────────────────────────────────────────────────────────────────────
//  Stream
// ────────────────────────────────────────────────────────────────────────────

/// Ordering token for asynchronous work on one device.
///
/// Work enqueued on the same stream executes in submission order. The handle
/// does not own the stream; the context that created it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHandle(*mut c_void);

unsafe impl Send for StreamHandle {}
unsafe impl Sync for StreamHandle {}

impl StreamHandle {
    pub fn from_raw(raw: *mut c_void) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> *mut c_void {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Device contexts
// ────────────────────────────────────────────────────────────────────────────

/// Where work executes, and how asynchronous work on it is ordered.
pub trait DeviceContext: Send + Sync {
    fn place(&self) -> Place;

    /// The ordering token for asynchronous copies. Host contexts have none.
    fn stream(&self) -> Option<StreamHandle> {
        None
    }

    /// Blocks until every operation enqueued on this context has completed.
    fn wait(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostContext;

impl HostContext {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceContext for HostContext {
    fn place(&self) -> Place {
        Place::Host
    }
}

/// A CUDA device with one owned stream.
#[cfg(feature = "cuda")]
#[derive(Debug)]
pub struct CudaContext {
    device_id: usize,
    stream: StreamHandle,
}

#[cfg(feature = "cuda")]
impl CudaContext {
    pub fn new(device_id: usize) -> Result<Self> {
        use placex_cuda::{cuda_set_device, cuda_stream_create, CUDA_SUCCESS};

        let mut raw = std::ptr::null_mut();
        unsafe {
            let status = cuda_set_device(device_id as i32);
            if status != CUDA_SUCCESS {
                return Err(Error::from_cuda_error(status));
            }
            let status = cuda_stream_create(&mut raw);
            if status != CUDA_SUCCESS {
                return Err(Error::from_cuda_error(status));
            }
        }
        tracing::debug!(device_id, "created CUDA stream");

        Ok(Self {
            device_id,
            stream: StreamHandle::from_raw(raw),
        })
    }

    pub fn device_id(&self) -> usize {
        self.device_id
    }
}

#[cfg(feature = "cuda")]
impl DeviceContext for CudaContext {
    fn place(&self) -> Place {
        Place::Device(self.device_id)
    }

    fn stream(&self) -> Option<StreamHandle> {
        Some(self.stream)
    }

    fn wait(&self) -> Result<()> {
        use placex_cuda::{cuda_set_device, cuda_stream_synchronize, CUDA_SUCCESS};

        unsafe {
            let status = cuda_set_device(self.device_id as i32);
            if status != CUDA_SUCCESS {
                return Err(Error::from_cuda_error(status));
            }
            let status = cuda_stream_synchronize(self.stream.as_raw());
            if status != CUDA_SUCCESS {
                return Err(Error::from_cuda_error(status));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "cuda")]
impl Drop for CudaContext {
    fn drop(&mut self) {
        use placex_cuda::{cuda_set_device, cuda_stream_destroy, CUDA_SUCCESS};

        unsafe {
            if cuda_set_device(self.device_id as i32) == CUDA_SUCCESS {
                cuda_stream_destroy(self.stream.as_raw());
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
//  Pool
// ────────────────────────────────────────────────────────────────────────────

/// One shared context per place, created on first request.
pub struct ContextPool {
    contexts: DashMap<Place, Arc<dyn DeviceContext>>,
}

impl ContextPool {
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
        }
    }

    pub fn get(&self, place: Place) -> Result<Arc<dyn DeviceContext>> {
        if let Some(ctx) = self.contexts.get(&place) {
            return Ok(Arc::clone(ctx.value()));
        }

        let ctx = create_context(place)?;
        // a concurrent caller may have won the race; keep whichever landed first
        let entry = self.contexts.entry(place).or_insert(ctx);
        Ok(Arc::clone(entry.value()))
    }

    pub fn contains(&self, place: Place) -> bool {
        self.contexts.contains_key(&place)
    }
}

impl Default for ContextPool {
    fn default() -> Self {
        Self::new()
    }
}

static CONTEXT_POOL: LazyLock<ContextPool> = LazyLock::new(ContextPool::new);

pub fn context_pool() -> &'static ContextPool {
    &CONTEXT_POOL
}

fn create_context(place: Place) -> Result<Arc<dyn DeviceContext>> {
    match place {
        Place::Host => Ok(Arc::new(HostContext)),
        #[cfg(feature = "cuda")]
        Place::Device(id) => Ok(Arc::new(CudaContext::new(id)?)),
        #[cfg(not(feature = "cuda"))]
        Place::Device(_) => Err(Error::UnsupportedPlace { place }),
    }
}
