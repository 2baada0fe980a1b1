mod utils;

use placex_core::{
    context::{context_pool, HostContext},
    error::{Error, Result},
    place::Place,
};
use placex_tensor::Tensor;
use utils::{setup_sequence, setup_tensor, write_host, BoundContext};

#[test]
fn copy_from_host() -> Result<()> {
    let src = setup_sequence([3, 4])?;
    let mut dst = Tensor::new();
    dst.copy_from::<f32>(&src, Place::Host, &HostContext)?;

    assert_eq!(dst.dims(), src.dims());
    assert_eq!(dst.place(), Some(Place::Host));
    assert_eq!(dst.offset(), 0);
    assert!(!dst.shares_buffer_with(&src));
    assert_eq!(dst.to_vec::<f32>()?, src.to_vec::<f32>()?);
    Ok(())
}

#[test]
fn copy_from_is_independent() -> Result<()> {
    let mut src = setup_tensor(&[1i32, 2, 3], [3])?;
    let mut dst = Tensor::new();
    dst.copy_from::<i32>(&src, Place::Host, &HostContext)?;

    write_host(&mut src, &[10i32])?;
    assert_eq!(dst.to_vec::<i32>()?, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn copy_from_reuses_destination() -> Result<()> {
    let src = setup_sequence([2, 2])?;
    let mut dst = Tensor::with_dims([8]);
    dst.mutable_data::<f32>(Place::Host)?;
    let id = dst.buffer_id();

    dst.copy_from::<f32>(&src, Place::Host, &HostContext)?;
    assert_eq!(dst.buffer_id(), id);
    assert_eq!(dst.dims().as_slice(), &[2, 2]);
    assert_eq!(dst.to_vec::<f32>()?, vec![0.0, 1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn copy_from_grows_destination() -> Result<()> {
    let src = setup_sequence([4, 4])?;
    let mut dst = setup_sequence([2])?;
    let id = dst.buffer_id();

    dst.copy_from::<f32>(&src, Place::Host, &HostContext)?;
    assert_ne!(dst.buffer_id(), id);
    assert_eq!(dst.memory_size(), 16 * 4);
    Ok(())
}

#[test]
fn copy_from_slice_copies_only_view() -> Result<()> {
    let src = setup_sequence([4, 2])?;
    let rows = src.slice::<f32>(1, 3)?;
    let mut dst = Tensor::new();
    dst.copy_from::<f32>(&rows, Place::Host, &HostContext)?;

    assert_eq!(dst.dims().as_slice(), &[2, 2]);
    assert_eq!(dst.memory_size(), 4 * 4);
    assert_eq!(dst.to_vec::<f32>()?, vec![2.0, 3.0, 4.0, 5.0]);
    Ok(())
}

#[test]
fn copy_from_self_alias() -> Result<()> {
    let src = setup_sequence([2, 3])?;
    let mut alias = src.clone();
    alias.copy_from::<f32>(&src, Place::Host, &HostContext)?;

    assert!(alias.shares_buffer_with(&src));
    assert_eq!(alias.to_vec::<f32>()?, src.to_vec::<f32>()?);
    Ok(())
}

#[test]
fn copy_from_unready_source() {
    let mut dst = Tensor::new();
    assert!(matches!(
        dst.copy_from::<f32>(&Tensor::with_dims([2]), Place::Host, &HostContext),
        Err(Error::NotInitialized)
    ));
    assert!(!dst.is_initialized());
}

#[test]
fn copy_from_vec_length() -> Result<()> {
    let mut tensor = Tensor::with_dims([2, 2]);
    assert!(matches!(
        tensor.copy_from_vec(&[1.0f32, 2.0, 3.0], &HostContext),
        Err(Error::LengthMismatch { expected: 4, got: 3, .. })
    ));
    assert!(!tensor.is_initialized());

    tensor.copy_from_vec(&[1.0f32, 2.0, 3.0, 4.0], &HostContext)?;
    assert_eq!(tensor.copy_to_vec::<f32>(&HostContext)?, vec![1.0, 2.0, 3.0, 4.0]);
    Ok(())
}

#[cfg(feature = "cuda")]
#[test]
fn device_copy_needs_device_context() -> Result<()> {
    let src = setup_sequence([2])?;
    let mut dst = Tensor::new();
    assert!(matches!(
        dst.copy_from::<f32>(&src, Place::Device(0), &HostContext),
        Err(Error::ContextNotDevice { place: Place::Host })
    ));
    assert!(!dst.is_initialized());
    Ok(())
}

#[cfg(feature = "cuda")]
#[test]
fn device_copy_checks_context_place() -> Result<()> {
    let src = setup_sequence([2])?;
    let mut dst = Tensor::new();
    assert!(matches!(
        dst.copy_from::<f32>(&src, Place::Device(1), &BoundContext(Place::Device(0))),
        Err(Error::PlaceMismatch { expected: Place::Device(0), got: Place::Device(1) })
    ));
    assert!(!dst.is_initialized());
    Ok(())
}

#[test]
fn host_copy_ignores_context_place() -> Result<()> {
    let src = setup_sequence([3])?;
    let mut dst = Tensor::new();
    dst.copy_from::<f32>(&src, Place::Host, &BoundContext(Place::Device(0)))?;
    assert_eq!(dst.to_vec::<f32>()?, vec![0.0, 1.0, 2.0]);
    Ok(())
}

#[cfg(not(feature = "cuda"))]
#[test]
fn device_copy_unsupported() -> Result<()> {
    let src = setup_sequence([2])?;
    let mut dst = Tensor::new();
    assert!(matches!(
        dst.copy_from::<f32>(&src, Place::Device(0), &BoundContext(Place::Device(0))),
        Err(Error::UnsupportedPlace { place: Place::Device(0) })
    ));
    assert!(matches!(context_pool().get(Place::Device(0)), Err(Error::UnsupportedPlace { .. })));
    Ok(())
}

#[cfg(not(feature = "cuda"))]
#[test]
fn device_copy_unsupported_for_any_context() -> Result<()> {
    let src = setup_sequence([2])?;
    let mut dst = Tensor::new();
    assert!(matches!(
        dst.copy_from::<f32>(&src, Place::Device(0), &HostContext),
        Err(Error::UnsupportedPlace { place: Place::Device(0) })
    ));
    assert!(matches!(
        dst.copy_from::<f32>(&src, Place::Device(1), &BoundContext(Place::Device(0))),
        Err(Error::UnsupportedPlace { place: Place::Device(1) })
    ));
    assert!(!dst.is_initialized());

    let mut vec_dst = Tensor::with_dims([2]);
    assert!(matches!(
        vec_dst.copy_from_vec(&[1.0f32, 2.0], &BoundContext(Place::Device(3))),
        Err(Error::UnsupportedPlace { place: Place::Device(3) })
    ));
    assert!(!vec_dst.is_initialized());
    Ok(())
}

#[cfg(feature = "cuda")]
#[test]
fn device_round_trip() -> Result<()> {
    if placex_core::cuda::cuda_device_count() == 0 {
        return Ok(());
    }

    let place = Place::Device(0);
    let ctx = context_pool().get(place)?;
    let src = setup_sequence([4, 3])?;

    let mut on_device = Tensor::new();
    on_device.copy_from::<f32>(&src, place, ctx.as_ref())?;
    assert_eq!(on_device.place(), Some(place));

    let rows = on_device.slice::<f32>(1, 3)?;
    let mut back = Tensor::new();
    back.copy_from::<f32>(&rows, Place::Host, ctx.as_ref())?;
    ctx.wait()?;

    assert_eq!(back.to_vec::<f32>()?, (3..9).map(|i| i as f32).collect::<Vec<_>>());
    assert_eq!(on_device.to_vec::<f32>()?, src.to_vec::<f32>()?);
    Ok(())
}

#[test]
fn copy_to_vec_host() -> Result<()> {
    let tensor = setup_tensor(&[7u16, 8, 9], [3])?;
    assert_eq!(tensor.copy_to_vec::<u16>(&HostContext)?, vec![7, 8, 9]);
    assert!(matches!(Tensor::new().copy_to_vec::<u16>(&HostContext), Err(Error::NotInitialized)));
    Ok(())
}
