//! Tagged kernel arguments.
//!
//! An executable hands a kernel its inputs as [`Arg`]s and its outputs as
//! [`OutArg`]s. Both borrow storage the executable owns; the tag says which
//! value category the storage belongs to.

use std::fmt;

use crate::buffer::{Buffer, DType};
use crate::erased::{ArrayRef, ElemType, OpaqueRef};
use crate::scalar::Scalar;

/// Category tag of an argument, including its element type where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Buffer(DType),
    Scalar,
    Array(ElemType),
    Opaque(ElemType),
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Buffer(dtype) => write!(f, "buffer<{dtype}>"),
            ArgKind::Scalar => f.write_str("scalar"),
            ArgKind::Array(elem) => write!(f, "array<{elem}>"),
            ArgKind::Opaque(elem) => write!(f, "opaque<{elem}>"),
        }
    }
}

/// Borrowed input value.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Buffer(&'a Buffer),
    Scalar(&'a Scalar),
    Array(&'a ArrayRef),
    Opaque(&'a OpaqueRef),
}

impl Arg<'_> {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Buffer(b) => ArgKind::Buffer(b.dtype()),
            Arg::Scalar(_) => ArgKind::Scalar,
            Arg::Array(a) => ArgKind::Array(a.elem_type()),
            Arg::Opaque(o) => ArgKind::Opaque(o.elem_type()),
        }
    }
}

impl<'a> From<&'a Buffer> for Arg<'a> {
    fn from(b: &'a Buffer) -> Self {
        Arg::Buffer(b)
    }
}

impl<'a> From<&'a Scalar> for Arg<'a> {
    fn from(s: &'a Scalar) -> Self {
        Arg::Scalar(s)
    }
}

impl<'a> From<&'a ArrayRef> for Arg<'a> {
    fn from(a: &'a ArrayRef) -> Self {
        Arg::Array(a)
    }
}

impl<'a> From<&'a OpaqueRef> for Arg<'a> {
    fn from(o: &'a OpaqueRef) -> Self {
        Arg::Opaque(o)
    }
}

/// Mutably borrowed output storage.
#[derive(Debug)]
pub enum OutArg<'a> {
    Buffer(&'a mut Buffer),
    Scalar(&'a mut Scalar),
    Array(&'a mut ArrayRef),
    Opaque(&'a mut OpaqueRef),
}

impl OutArg<'_> {
    pub fn kind(&self) -> ArgKind {
        match self {
            OutArg::Buffer(b) => ArgKind::Buffer(b.dtype()),
            OutArg::Scalar(_) => ArgKind::Scalar,
            OutArg::Array(a) => ArgKind::Array(a.elem_type()),
            OutArg::Opaque(o) => ArgKind::Opaque(o.elem_type()),
        }
    }
}

impl<'a> From<&'a mut Buffer> for OutArg<'a> {
    fn from(b: &'a mut Buffer) -> Self {
        OutArg::Buffer(b)
    }
}

impl<'a> From<&'a mut Scalar> for OutArg<'a> {
    fn from(s: &'a mut Scalar) -> Self {
        OutArg::Scalar(s)
    }
}

impl<'a> From<&'a mut ArrayRef> for OutArg<'a> {
    fn from(a: &'a mut ArrayRef) -> Self {
        OutArg::Array(a)
    }
}

impl<'a> From<&'a mut OpaqueRef> for OutArg<'a> {
    fn from(o: &'a mut OpaqueRef) -> Self {
        OutArg::Opaque(o)
    }
}
