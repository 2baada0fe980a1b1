pub use placex_internal::*;
