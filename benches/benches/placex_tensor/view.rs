use benches::{host_matrix, SIZES};
use criterion::{black_box, Criterion};
use placex_tensor::{reshape_to_matrix, Tensor};

pub fn basic(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("view/basic");
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(2));
    group.sample_size(100);

    for &(size, size_name) in &SIZES {
        let tensor = host_matrix(size, 16).unwrap();

        group.bench_function(format!("slice/{}", size_name), |b| {
            b.iter(|| black_box(tensor.slice::<f32>(4, 12).unwrap()))
        });
        group.bench_function(format!("share_data_with/{}", size_name), |b| {
            b.iter(|| {
                let mut alias = Tensor::new();
                alias.share_data_with::<f32>(&tensor).unwrap();
                black_box(alias)
            })
        });
        group.bench_function(format!("reshape_to_matrix/{}", size_name), |b| {
            b.iter(|| black_box(reshape_to_matrix::<f32>(&tensor, 1).unwrap()))
        });
    }

    group.finish();
}
