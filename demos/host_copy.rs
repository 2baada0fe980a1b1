use placex::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let ctx = HostContext::new();

    let mut batch = Tensor::with_dims([4, 3]);
    batch.copy_from_vec(&(0..12).map(|i| i as f32).collect::<Vec<_>>(), &ctx)?;

    // rows 1 and 2, without copying
    let rows = batch.slice::<f32>(1, 3)?;
    println!("rows {} at byte offset {}: {:?}", rows.dims(), rows.offset(), rows.to_vec::<f32>()?);

    let mut copy = Tensor::new();
    copy.copy_from::<f32>(&rows, Place::Host, &ctx)?;
    println!("copy {} shares storage with rows: {}", copy.dims(), copy.shares_buffer_with(&rows));

    let mut volume = Tensor::with_dims([2, 3, 2]);
    volume.mutable_data::<f32>(Place::Host)?;
    let matrix = reshape_to_matrix::<f32>(&volume, 2)?;
    println!("matrix view {} aliases volume: {}", matrix.dims(), matrix.shares_buffer_with(&volume));

    Ok(())
}
