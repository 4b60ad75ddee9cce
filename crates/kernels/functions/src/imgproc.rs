//! 8-bit image kernels.

use weft_backend_cpu::{KernelError, NativeView, NativeViewMut, cpu_kernel};

use crate::arithm::same_shape;
use crate::ops::{CalcHist, Histogram, Threshold, ThresholdParams};

#[cpu_kernel(op = Threshold)]
pub fn threshold(
    src: NativeView<'_, u8>,
    params: &ThresholdParams,
    dst: &mut NativeViewMut<'_, u8>,
) -> Result<(), KernelError> {
    same_shape(src.shape(), dst.shape())?;
    let ThresholdParams { thresh, max_value } = *params;
    dst.zip_apply(&src, |d, s| *d = if s > thresh { max_value } else { 0 });
    Ok(())
}

#[cpu_kernel(op = CalcHist)]
pub fn calc_hist(src: NativeView<'_, u8>, hist: &mut Histogram) {
    hist.fill(0);
    for &value in src.iter() {
        hist[usize::from(value)] += 1;
    }
}
