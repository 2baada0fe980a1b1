mod access;
mod copy;
mod view;

use criterion::{criterion_group, criterion_main};

criterion_group!(benches, access::basic, view::basic, copy::basic);
criterion_main!(benches);
