//! Weft Foundation
//!
//! The graph engine's representation-neutral value model: compact scalars,
//! dense buffers tagged with a runtime element type, and type-erased typed
//! arrays and opaque values. Backends translate these into the native types
//! their kernels are written against; nothing in this crate knows about any
//! particular numeric library.

pub mod arg;
pub mod buffer;
pub mod erased;
pub mod error;
pub mod scalar;

pub use arg::{Arg, ArgKind, OutArg};
pub use buffer::{Buffer, BufferData, DType, Element};
pub use erased::{ArrayRef, ElemType, OpaqueRef};
pub use error::ValueError;
pub use scalar::Scalar;
