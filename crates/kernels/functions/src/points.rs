//! Kernels producing or consuming coordinate lists.

use weft_backend_cpu::{KernelError, NativeView, cpu_kernel};

use crate::ops::{FindNonZero, Sample};

#[cpu_kernel(op = FindNonZero)]
pub fn find_non_zero(src: NativeView<'_, u8>, points: &mut Vec<(usize, usize)>) {
    points.clear();
    for row in 0..src.nrows() {
        for col in 0..src.ncols() {
            if src[(row, col)] != 0 {
                points.push((row, col));
            }
        }
    }
}

/// On failure `values` holds the samples taken before the bad coordinate.
#[cpu_kernel(op = Sample)]
pub fn sample(
    src: NativeView<'_, f32>,
    points: &[(usize, usize)],
    values: &mut Vec<f32>,
) -> Result<(), KernelError> {
    values.clear();
    values.reserve(points.len());
    for &(row, col) in points {
        let value = src.get((row, col)).ok_or_else(|| {
            KernelError::body(format!(
                "point ({row}, {col}) outside {}x{} buffer",
                src.nrows(),
                src.ncols()
            ))
        })?;
        values.push(*value);
    }
    Ok(())
}
