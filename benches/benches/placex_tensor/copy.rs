use benches::{host_matrix, SIZES};
use criterion::{black_box, Criterion, Throughput};
use placex_core::{context::HostContext, place::Place};
use placex_tensor::Tensor;

pub fn basic(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("copy/basic");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);

    for &(size, size_name) in &SIZES {
        let src = host_matrix(size, 1).unwrap();
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let mut dst = Tensor::new();
        group.bench_function(format!("host_to_host/{}", size_name), |b| {
            b.iter(|| {
                dst.copy_from::<f32>(&src, Place::Host, &HostContext).unwrap();
                black_box(&dst);
            })
        });

        #[cfg(feature = "cuda")]
        {
            use placex_core::context::context_pool;

            let place = Place::Device(0);
            let ctx = context_pool().get(place).unwrap();
            let mut on_device = Tensor::new();
            group.bench_function(format!("host_to_device/{}", size_name), |b| {
                b.iter(|| {
                    on_device.copy_from::<f32>(&src, place, ctx.as_ref()).unwrap();
                    ctx.wait().unwrap();
                })
            });

            let mut back = Tensor::new();
            group.bench_function(format!("device_to_host/{}", size_name), |b| {
                b.iter(|| {
                    back.copy_from::<f32>(&on_device, Place::Host, ctx.as_ref()).unwrap();
                    ctx.wait().unwrap();
                })
            });
        }
    }

    group.finish();
}
