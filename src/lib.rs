//! A tensor shape, layout and einops metadata engine: computes, validates
//! and transforms shape/stride/dtype descriptors ahead of execution. This
//! crate never allocates or touches a data buffer -- it is the planning
//! layer a separate execution backend consumes.
//!
//! Module order mirrors the dependency order of the algebra itself: `dtype`
//! -> `shape` -> `layout` -> `storage` -> `ops` -> `einops`; `symbolic` is a side
//! module depending only on `shape`.

pub mod broadcast_exec;
pub mod dtype;
pub mod einops;
pub mod error;
pub mod layout;
pub mod ops;
pub mod prelude;
pub mod shape;
pub mod static_rank;
pub mod storage;
pub mod symbolic;

/// Emits a `tracing::debug!` event when the `trace` feature is enabled, and
/// compiles to nothing otherwise. Every call site in this crate that wants
/// diagnostic breadcrumbs (einops scan/parse/resolve, op validation) goes
/// through this so the optional `tracing` dependency never appears in a
/// non-`trace` build.
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace")]
        tracing::debug!($($arg)*);
    };
}
pub(crate) use trace_debug;
