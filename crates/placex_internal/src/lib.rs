pub mod prelude;

pub use placex_core as core;
pub use placex_tensor as tensor;
