use placex::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    let host = HostContext::new();
    let device = context_pool().get(Place::Device(0))?;

    let mut src = Tensor::with_dims([2, 4]);
    src.copy_from_vec(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &host)?;

    // enqueued on the device stream
    let mut on_device = Tensor::new();
    on_device.copy_from::<f32>(&src, Place::Device(0), device.as_ref())?;

    let mut back = Tensor::new();
    back.copy_from::<f32>(&on_device, Place::Host, device.as_ref())?;
    device.wait()?;

    println!("round trip through {}: {:?}", Place::Device(0), back.to_vec::<f32>()?);

    Ok(())
}
