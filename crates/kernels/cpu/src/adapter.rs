//! Conversion between graph values and the native types kernel bodies use.
//!
//! Each category marker from `weft_kernel_types` gets an input and an output
//! adapter here:
//!
//! | marker       | input (by value)        | output (`&mut` in the body) | after the body        |
//! |--------------|-------------------------|-----------------------------|-----------------------|
//! | `GMat<T>`    | [`NativeView<T>`]       | [`NativeViewMut<T>`]        | reallocation check    |
//! | `GScalar`    | `Vector4<f64>`          | `Vector4<f64>`              | write-back            |
//! | `GArray<T>`  | `&[T]`                  | `Vec<T>`                    | nothing               |
//! | `GOpaque<T>` | `&T`                    | `T`                         | nothing               |
//!
//! Buffer views alias the bound storage, so kernels write results in place.
//! Scalars are copied in and written back. Arrays and opaque values are the
//! live storage itself.

use nalgebra::{Dyn, MatrixView, MatrixViewMut, Vector4};
use tracing::trace;
use weft_foundation::{ArgKind, Buffer, Element, Scalar};
use weft_kernel_types::{GArray, GMat, GOpaque, GScalar, ValueKind};

use crate::config::{BufferValidation, CpuBackendConfig};
use crate::context::CpuContext;
use crate::error::{KernelError, Port};

/// Read-only native view over a row-major buffer.
pub type NativeView<'a, T> = MatrixView<'a, T, Dyn, Dyn, Dyn, Dyn>;

/// Writable native view over a row-major buffer.
pub type NativeViewMut<'a, T> = MatrixViewMut<'a, T, Dyn, Dyn, Dyn, Dyn>;

/// View a buffer as a native matrix without copying.
///
/// Returns `None` if the buffer does not hold `T` elements.
pub fn native_view<T: Element>(buffer: &Buffer) -> Option<NativeView<'_, T>> {
    let (rows, cols) = buffer.shape();
    buffer
        .as_slice::<T>()
        .map(|data| NativeView::from_slice_with_strides(data, rows, cols, cols, 1))
}

/// Writable counterpart of [`native_view`].
pub fn native_view_mut<T: Element>(buffer: &mut Buffer) -> Option<NativeViewMut<'_, T>> {
    let (rows, cols) = buffer.shape();
    buffer
        .as_mut_slice::<T>()
        .map(|data| NativeViewMut::from_slice_with_strides_mut(data, rows, cols, cols, 1))
}

pub fn scalar_to_native(scalar: &Scalar) -> Vector4<f64> {
    Vector4::new(scalar[0], scalar[1], scalar[2], scalar[3])
}

pub fn scalar_from_native(native: &Vector4<f64>) -> Scalar {
    Scalar::new(native[0], native[1], native[2], native[3])
}

/// Category marker that can be read from a [`CpuContext`] input.
pub trait CpuInput: ValueKind {
    /// Value the kernel body receives.
    type In<'a>;

    fn get_in<'a>(ctx: &CpuContext<'a>, index: usize) -> Result<Self::In<'a>, KernelError>;
}

/// Category marker that can be bound from a [`CpuContext`] output.
pub trait CpuOutput: ValueKind {
    /// Holder kept alive across the kernel body.
    type Out<'a>: OutputWrapper;

    /// Take output `index` out of the context.
    ///
    /// Must not fail for a context that passed
    /// [`CpuContext::check_signature`]: outputs acquired before a failing one
    /// have already left the context and are never postprocessed.
    fn get_out<'a>(ctx: &mut CpuContext<'a>, index: usize) -> Result<Self::Out<'a>, KernelError>;
}

/// Output holder: lends the native value to the body, then finishes the
/// output once the body has returned.
pub trait OutputWrapper {
    type Native: ?Sized;

    fn native(&mut self) -> &mut Self::Native;

    /// Runs exactly once per call, after the body, whether it succeeded or not.
    fn postprocess(self, config: &CpuBackendConfig) -> Result<(), KernelError>;
}

/// Buffer output: a native view plus what it looked like when it was bound.
pub struct TrackedBuffer<'a, T: Element> {
    index: usize,
    view: NativeViewMut<'a, T>,
    origin: Footprint<T>,
}

#[derive(Debug, PartialEq)]
struct Footprint<T> {
    ptr: *const T,
    shape: (usize, usize),
    strides: (usize, usize),
}

impl<T: Element> Footprint<T> {
    fn of(view: &NativeViewMut<'_, T>) -> Self {
        Self {
            ptr: view.as_ptr(),
            shape: view.shape(),
            strides: view.strides(),
        }
    }
}

impl<'a, T: Element> TrackedBuffer<'a, T> {
    pub fn new(index: usize, view: NativeViewMut<'a, T>) -> Self {
        let origin = Footprint::of(&view);
        Self {
            index,
            view,
            origin,
        }
    }

    /// Whether the view still covers the storage it was created over.
    pub fn is_intact(&self) -> bool {
        Footprint::of(&self.view) == self.origin
    }
}

impl<'a, T: Element> OutputWrapper for TrackedBuffer<'a, T> {
    type Native = NativeViewMut<'a, T>;

    fn native(&mut self) -> &mut Self::Native {
        &mut self.view
    }

    fn postprocess(self, config: &CpuBackendConfig) -> Result<(), KernelError> {
        match config.buffer_validation {
            BufferValidation::Permissive => {
                trace!(index = self.index, "buffer output check skipped");
                Ok(())
            }
            BufferValidation::Strict if self.is_intact() => Ok(()),
            BufferValidation::Strict => {
                trace!(index = self.index, "buffer output re-pointed by kernel body");
                Err(KernelError::BufferReallocated { index: self.index })
            }
        }
    }
}

/// Scalar output: a native copy written back to the slot afterwards.
pub struct ScalarWriteBack<'a> {
    native: Vector4<f64>,
    target: &'a mut Scalar,
}

impl<'a> ScalarWriteBack<'a> {
    pub fn new(target: &'a mut Scalar) -> Self {
        Self {
            native: scalar_to_native(target),
            target,
        }
    }
}

impl OutputWrapper for ScalarWriteBack<'_> {
    type Native = Vector4<f64>;

    fn native(&mut self) -> &mut Vector4<f64> {
        &mut self.native
    }

    fn postprocess(self, _config: &CpuBackendConfig) -> Result<(), KernelError> {
        *self.target = scalar_from_native(&self.native);
        Ok(())
    }
}

/// Arrays and opaque values are handed out as the live storage; there is
/// nothing left to do once the body returns.
impl<T: 'static> OutputWrapper for &mut T {
    type Native = T;

    fn native(&mut self) -> &mut T {
        self
    }

    fn postprocess(self, _config: &CpuBackendConfig) -> Result<(), KernelError> {
        Ok(())
    }
}

impl<T: Element> CpuInput for GMat<T> {
    type In<'a> = NativeView<'a, T>;

    fn get_in<'a>(ctx: &CpuContext<'a>, index: usize) -> Result<NativeView<'a, T>, KernelError> {
        let buffer = ctx.in_buffer(index)?;
        native_view::<T>(buffer).ok_or_else(|| {
            KernelError::type_mismatch(
                Port::Input(index),
                Self::arg_kind(),
                ArgKind::Buffer(buffer.dtype()),
            )
        })
    }
}

impl<T: Element> CpuOutput for GMat<T> {
    type Out<'a> = TrackedBuffer<'a, T>;

    fn get_out<'a>(
        ctx: &mut CpuContext<'a>,
        index: usize,
    ) -> Result<TrackedBuffer<'a, T>, KernelError> {
        let buffer = ctx.out_buffer(index)?;
        let found = ArgKind::Buffer(buffer.dtype());
        native_view_mut::<T>(buffer)
            .map(|view| TrackedBuffer::new(index, view))
            .ok_or_else(|| KernelError::type_mismatch(Port::Output(index), Self::arg_kind(), found))
    }
}

impl CpuInput for GScalar {
    type In<'a> = Vector4<f64>;

    fn get_in<'a>(ctx: &CpuContext<'a>, index: usize) -> Result<Vector4<f64>, KernelError> {
        ctx.in_scalar(index).map(scalar_to_native)
    }
}

impl CpuOutput for GScalar {
    type Out<'a> = ScalarWriteBack<'a>;

    fn get_out<'a>(
        ctx: &mut CpuContext<'a>,
        index: usize,
    ) -> Result<ScalarWriteBack<'a>, KernelError> {
        ctx.out_scalar(index).map(ScalarWriteBack::new)
    }
}

impl<T: Send + 'static> CpuInput for GArray<T> {
    type In<'a> = &'a [T];

    fn get_in<'a>(ctx: &CpuContext<'a>, index: usize) -> Result<&'a [T], KernelError> {
        ctx.in_array::<T>(index)
    }
}

impl<T: Send + 'static> CpuOutput for GArray<T> {
    type Out<'a> = &'a mut Vec<T>;

    fn get_out<'a>(ctx: &mut CpuContext<'a>, index: usize) -> Result<&'a mut Vec<T>, KernelError> {
        ctx.out_array::<T>(index)
    }
}

impl<T: Send + 'static> CpuInput for GOpaque<T> {
    type In<'a> = &'a T;

    fn get_in<'a>(ctx: &CpuContext<'a>, index: usize) -> Result<&'a T, KernelError> {
        ctx.in_arg::<T>(index)
    }
}

impl<T: Send + 'static> CpuOutput for GOpaque<T> {
    type Out<'a> = &'a mut T;

    fn get_out<'a>(ctx: &mut CpuContext<'a>, index: usize) -> Result<&'a mut T, KernelError> {
        ctx.out_opaque::<T>(index)
    }
}
