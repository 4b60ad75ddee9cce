//! Typed operation signatures
//!
//! This crate defines the vocabulary shared by operation declarations,
//! backends and the registration macro:
//!
//! - **Category markers** ([`GMat`], [`GScalar`], [`GArray`], [`GOpaque`]) name
//!   what an operation expects at each argument position.
//! - **[`GraphOp`]** binds an operation id to an input list and an output list
//!   of markers. Declare one with [`graph_op!`].
//! - **[`Signature`]** is the runtime description of those lists, used when an
//!   executable's argument list has to be checked against a kernel.
//! - **[`Backend`]** is the identity tag a kernel is registered under.
//!
//! # Examples
//!
//! ```rust
//! use weft_kernel_types::{graph_op, GArray, GMat, GraphOp, ValueCategory};
//!
//! graph_op! {
//!     /// Coordinates of non-zero elements.
//!     pub struct FindNonZero = "core.find_non_zero": (GMat<u8>) -> (GArray<(usize, usize)>);
//! }
//!
//! let sig = FindNonZero::signature();
//! assert_eq!(sig.ins[0].category, ValueCategory::Buffer);
//! assert_eq!(sig.outs[0].category, ValueCategory::Array);
//! ```

pub mod backend;
pub mod category;
pub mod signature;

pub use backend::Backend;
pub use category::{GArray, GMat, GOpaque, GScalar, ValueCategory, ValueKind};
pub use signature::{ArgList, ArgSpec, GraphOp, Signature};
