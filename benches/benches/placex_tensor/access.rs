use benches::SIZES;
use criterion::{black_box, Criterion};
use placex_core::place::Place;
use placex_tensor::Tensor;

pub fn basic(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("access/basic");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);

    for &(size, size_name) in &SIZES {
        group.bench_function(format!("allocate/host/{}", size_name), |b| {
            b.iter(|| {
                let mut tensor = Tensor::with_dims([size]);
                black_box(tensor.mutable_data::<f32>(Place::Host).unwrap());
                tensor
            })
        });

        // the buffer already fits, so every call takes the reuse path
        let mut tensor = Tensor::with_dims([size]);
        tensor.mutable_data::<f32>(Place::Host).unwrap();
        group.bench_function(format!("reuse/host/{}", size_name), |b| {
            b.iter(|| black_box(tensor.mutable_data::<f32>(Place::Host).unwrap()))
        });
    }

    group.finish();
}
