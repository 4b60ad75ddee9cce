//! Arithmetic and reduction kernels.

use weft_backend_cpu::nalgebra::Vector4;
use weft_backend_cpu::{KernelError, NativeView, NativeViewMut, cpu_kernel};

use crate::ops::{AddC, CopyBuffer, MeanStdDev, Scale, Sum};

pub(crate) fn same_shape(src: (usize, usize), dst: (usize, usize)) -> Result<(), KernelError> {
    if src == dst {
        Ok(())
    } else {
        Err(KernelError::body(format!(
            "output is {}x{}, input is {}x{}",
            dst.0, dst.1, src.0, src.1
        )))
    }
}

#[cpu_kernel(op = CopyBuffer)]
pub fn copy(src: NativeView<'_, f64>, dst: &mut NativeViewMut<'_, f64>) -> Result<(), KernelError> {
    same_shape(src.shape(), dst.shape())?;
    dst.copy_from(&src);
    Ok(())
}

#[cpu_kernel(op = AddC)]
pub fn add_c(
    src: NativeView<'_, f32>,
    c: Vector4<f64>,
    dst: &mut NativeViewMut<'_, f32>,
) -> Result<(), KernelError> {
    same_shape(src.shape(), dst.shape())?;
    let offset = c[0] as f32;
    dst.zip_apply(&src, |d, s| *d = s + offset);
    Ok(())
}

#[cpu_kernel(op = Sum)]
pub fn sum(src: NativeView<'_, f64>, dst: &mut Vector4<f64>) {
    *dst = Vector4::new(src.sum(), 0.0, 0.0, 0.0);
}

/// Population statistics; an empty buffer has no mean.
#[cpu_kernel(op = MeanStdDev)]
pub fn mean_std_dev(
    src: NativeView<'_, f64>,
    mean: &mut Vector4<f64>,
    std_dev: &mut Vector4<f64>,
) -> Result<(), KernelError> {
    if src.is_empty() {
        return Err(KernelError::body("mean of an empty buffer"));
    }
    let n = src.len() as f64;
    let m = src.sum() / n;
    let variance = src.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;

    *mean = Vector4::new(m, 0.0, 0.0, 0.0);
    *std_dev = Vector4::new(variance.sqrt(), 0.0, 0.0, 0.0);
    Ok(())
}

#[cpu_kernel(op = Scale)]
pub fn scale(c: Vector4<f64>, factor: &f64, dst: &mut Vector4<f64>) {
    *dst = c * *factor;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_shape_message() {
        let err = same_shape((2, 3), (3, 2)).unwrap_err();
        assert_eq!(err.to_string(), "kernel body failed: output is 3x2, input is 2x3");
    }

    #[test]
    fn test_bodies_on_native_values() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let src = NativeView::from_slice_with_strides(&data, 2, 2, 2, 1);

        let mut total = Vector4::zeros();
        sum(src, &mut total);
        assert_eq!(total, Vector4::new(10.0, 0.0, 0.0, 0.0));

        let mut mean = Vector4::zeros();
        let mut std_dev = Vector4::zeros();
        mean_std_dev(src, &mut mean, &mut std_dev).unwrap();
        assert_eq!(mean[0], 2.5);
        assert!((std_dev[0] - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_of_empty_fails() {
        let data: [f64; 0] = [];
        let src = NativeView::from_slice_with_strides(&data, 0, 3, 3, 1);
        let mut mean = Vector4::zeros();
        let mut std_dev = Vector4::zeros();
        assert!(mean_std_dev(src, &mut mean, &mut std_dev).is_err());
    }
}
