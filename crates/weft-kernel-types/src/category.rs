//! Value category markers used in operation signatures.
//!
//! These are zero-sized types: they never hold data, they only name what an
//! operation expects at a given argument position. Backends implement their
//! adapter traits on them.

use std::fmt;
use std::marker::PhantomData;

use weft_foundation::{ArgKind, ElemType, Element};

/// Coarse value category of a signature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// Dense two-dimensional buffer.
    Buffer,
    /// Compact four-component scalar.
    Scalar,
    /// Homogeneous array of a declared element type.
    Array,
    /// Single value of a declared type.
    Opaque,
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueCategory::Buffer => "buffer",
            ValueCategory::Scalar => "scalar",
            ValueCategory::Array => "array",
            ValueCategory::Opaque => "opaque",
        })
    }
}

/// A signature slot type.
pub trait ValueKind: 'static {
    const CATEGORY: ValueCategory;

    /// Exact argument tag this slot accepts.
    fn arg_kind() -> ArgKind;
}

/// Dense buffer of `T` elements.
pub struct GMat<T>(PhantomData<fn() -> T>);

/// Graph scalar.
pub struct GScalar;

/// Typed array of `T`.
pub struct GArray<T>(PhantomData<fn() -> T>);

/// Opaque value of type `T`.
pub struct GOpaque<T>(PhantomData<fn() -> T>);

impl<T: Element> ValueKind for GMat<T> {
    const CATEGORY: ValueCategory = ValueCategory::Buffer;

    fn arg_kind() -> ArgKind {
        ArgKind::Buffer(T::DTYPE)
    }
}

impl ValueKind for GScalar {
    const CATEGORY: ValueCategory = ValueCategory::Scalar;

    fn arg_kind() -> ArgKind {
        ArgKind::Scalar
    }
}

impl<T: Send + 'static> ValueKind for GArray<T> {
    const CATEGORY: ValueCategory = ValueCategory::Array;

    fn arg_kind() -> ArgKind {
        ArgKind::Array(ElemType::of::<T>())
    }
}

impl<T: Send + 'static> ValueKind for GOpaque<T> {
    const CATEGORY: ValueCategory = ValueCategory::Opaque;

    fn arg_kind() -> ArgKind {
        ArgKind::Opaque(ElemType::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_foundation::DType;

    #[test]
    fn test_marker_kinds() {
        assert_eq!(<GMat<u8>>::arg_kind(), ArgKind::Buffer(DType::U8));
        assert_eq!(GScalar::arg_kind(), ArgKind::Scalar);
        assert_eq!(
            <GArray<(u32, u32)>>::arg_kind(),
            ArgKind::Array(ElemType::of::<(u32, u32)>())
        );
        assert_eq!(<GOpaque<f64>>::CATEGORY, ValueCategory::Opaque);
    }
}
