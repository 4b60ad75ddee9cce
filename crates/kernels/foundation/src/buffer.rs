//! Dense Buffers
//!
//! Row-major two-dimensional storage with a runtime element type. The graph
//! engine only ever sees the [`DType`] tag; backends recover the concrete
//! element type through [`Element`] when they hand the storage to a kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValueError;

/// Element type tag of a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    U8,
    I32,
    F32,
    F64,
}

impl DType {
    /// Size of one element in bytes.
    pub const fn size_of(self) -> usize {
        match self {
            DType::U8 => 1,
            DType::I32 | DType::F32 => 4,
            DType::F64 => 8,
        }
    }

    /// Rust name of the element type.
    pub const fn name(self) -> &'static str {
        match self {
            DType::U8 => "u8",
            DType::I32 => "i32",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed backing storage of a [`Buffer`].
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl BufferData {
    fn zeros(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::U8 => BufferData::U8(vec![0; len]),
            DType::I32 => BufferData::I32(vec![0; len]),
            DType::F32 => BufferData::F32(vec![0.0; len]),
            DType::F64 => BufferData::F64(vec![0.0; len]),
        }
    }

    /// Element type of the storage.
    pub fn dtype(&self) -> DType {
        match self {
            BufferData::U8(_) => DType::U8,
            BufferData::I32(_) => DType::I32,
            BufferData::F32(_) => DType::F32,
            BufferData::F64(_) => DType::F64,
        }
    }

    fn len(&self) -> usize {
        match self {
            BufferData::U8(v) => v.len(),
            BufferData::I32(v) => v.len(),
            BufferData::F32(v) => v.len(),
            BufferData::F64(v) => v.len(),
        }
    }

    fn as_ptr(&self) -> *const u8 {
        match self {
            BufferData::U8(v) => v.as_ptr(),
            BufferData::I32(v) => v.as_ptr().cast(),
            BufferData::F32(v) => v.as_ptr().cast(),
            BufferData::F64(v) => v.as_ptr().cast(),
        }
    }
}

/// Element types a [`Buffer`] can hold.
///
/// Every element type is also a valid `nalgebra` scalar, which is what lets
/// backends view buffer storage as native matrices without copying.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Tag stored in the buffer for this element type.
    const DTYPE: DType;

    /// Borrow the storage if it holds this element type.
    fn slice(data: &BufferData) -> Option<&[Self]>;

    /// Mutably borrow the storage if it holds this element type.
    fn slice_mut(data: &mut BufferData) -> Option<&mut [Self]>;

    /// Wrap a vector of this element type as storage.
    fn wrap(items: Vec<Self>) -> BufferData;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            fn slice(data: &BufferData) -> Option<&[Self]> {
                match data {
                    BufferData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut BufferData) -> Option<&mut [Self]> {
                match data {
                    BufferData::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }

            fn wrap(items: Vec<Self>) -> BufferData {
                BufferData::$variant(items)
            }
        }
    };
}

impl_element!(u8, U8);
impl_element!(i32, I32);
impl_element!(f32, F32);
impl_element!(f64, F64);

/// Dense two-dimensional buffer.
///
/// Storage is row-major: element `(row, col)` lives at `row * cols + col`.
/// The geometry is fixed at construction; kernels write through views and
/// never reallocate.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    rows: usize,
    cols: usize,
    data: BufferData,
}

impl Buffer {
    /// Create a zero-filled buffer.
    pub fn zeros(dtype: DType, rows: usize, cols: usize) -> Result<Self, ValueError> {
        let len = element_count(dtype, rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: BufferData::zeros(dtype, len),
        })
    }

    /// Create a buffer from a row-major vector (moves data).
    pub fn from_vec<T: Element>(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, ValueError> {
        if data.len() != element_count(T::DTYPE, rows, cols)? {
            return Err(ValueError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: T::wrap(data),
        })
    }

    /// Create a buffer from a row-major slice (copies data).
    pub fn from_slice<T: Element>(rows: usize, cols: usize, data: &[T]) -> Result<Self, ValueError> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Element type tag.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major elements, if the buffer holds `T`.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Mutable row-major elements, if the buffer holds `T`.
    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.data)
    }

    /// Element at (row, col), if in bounds and of type `T`.
    pub fn get<T: Element>(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.as_slice::<T>().map(|s| s[row * self.cols + col])
    }

    /// Address of the first element.
    ///
    /// Used as the storage identity when checking that a kernel did not
    /// swap an output out from under the executable.
    pub fn data_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Typed backing storage.
    pub fn data(&self) -> &BufferData {
        &self.data
    }
}

/// Number of elements in a `rows`×`cols` buffer, if its storage is addressable.
fn element_count(dtype: DType, rows: usize, cols: usize) -> Result<usize, ValueError> {
    rows.checked_mul(cols)
        .filter(|len| {
            len.checked_mul(dtype.size_of())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(ValueError::GeometryOverflow { rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let b = Buffer::zeros(DType::F32, 2, 3).unwrap();
        assert_eq!(b.shape(), (2, 3));
        assert_eq!(b.len(), 6);
        assert_eq!(b.dtype(), DType::F32);
        assert_eq!(b.get::<f32>(1, 2), Some(0.0));
    }

    #[test]
    fn test_from_vec_row_major() {
        let b = Buffer::from_vec(2, 3, vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(b.get::<f64>(0, 2), Some(3.0));
        assert_eq!(b.get::<f64>(1, 0), Some(4.0));
        assert_eq!(b.get::<f64>(2, 0), None);
    }

    #[test]
    fn test_from_vec_wrong_size() {
        let err = Buffer::from_vec(2, 3, vec![1u8, 2]).unwrap_err();
        assert_eq!(
            err,
            ValueError::ShapeMismatch {
                rows: 2,
                cols: 3,
                len: 2
            }
        );
    }

    #[test]
    fn test_typed_access_rejects_other_dtype() {
        let mut b = Buffer::zeros(DType::U8, 1, 4).unwrap();
        assert!(b.as_slice::<f32>().is_none());
        assert!(b.as_mut_slice::<i32>().is_none());
        assert_eq!(b.as_slice::<u8>().map(<[u8]>::len), Some(4));
    }

    #[test]
    fn test_data_ptr_stable_across_writes() {
        let mut b = Buffer::zeros(DType::F64, 2, 2).unwrap();
        let before = b.data_ptr();
        b.as_mut_slice::<f64>().unwrap()[3] = 9.0;
        assert_eq!(before, b.data_ptr());
    }

    #[test]
    fn test_dtype_serde_names() {
        assert_eq!(serde_json::to_string(&DType::F32).unwrap(), r#""f32""#);
        assert_eq!(serde_json::from_str::<DType>(r#""u8""#).unwrap(), DType::U8);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_from_vec_overflowing_geometry() {
        let err = Buffer::from_vec::<u8>(1 << 33, 1 << 31, vec![]).unwrap_err();
        assert_eq!(
            err,
            ValueError::GeometryOverflow {
                rows: 1 << 33,
                cols: 1 << 31
            }
        );

        // the wrapped product would be zero and match the empty vector
        let err = Buffer::from_vec::<f32>(usize::MAX, 2, vec![0.0; 0]).unwrap_err();
        assert!(matches!(err, ValueError::GeometryOverflow { .. }));
    }

    #[test]
    fn test_zeros_overflowing_geometry() {
        let err = Buffer::zeros(DType::U8, usize::MAX, 3).unwrap_err();
        assert_eq!(
            err,
            ValueError::GeometryOverflow {
                rows: usize::MAX,
                cols: 3
            }
        );

        // element count fits, byte size does not
        let rows = isize::MAX as usize / 4;
        let err = Buffer::zeros(DType::F64, rows, 1).unwrap_err();
        assert_eq!(err, ValueError::GeometryOverflow { rows, cols: 1 });
    }

    #[test]
    fn test_empty() {
        let b = Buffer::zeros(DType::I32, 0, 5).unwrap();
        assert!(b.is_empty());
    }
}
