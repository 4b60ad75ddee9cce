//! Operation declarations.
//!
//! Each operation is a kind id plus a typed signature. Backends provide the
//! implementations; the CPU kernels live in the sibling modules.

use serde::{Deserialize, Serialize};
use weft_backend_cpu::{GArray, GMat, GOpaque, GScalar, graph_op};

/// Parameters of a binary threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Elements strictly above this value are set to `max_value`.
    pub thresh: u8,
    pub max_value: u8,
}

/// Per-value element counts of an 8-bit buffer.
pub type Histogram = [u64; 256];

graph_op! {
    /// Copy a buffer into an output of the same shape.
    pub struct CopyBuffer = "core.copy": (GMat<f64>) -> (GMat<f64>);

    /// Add channel 0 of a scalar to every element.
    pub struct AddC = "core.add_c": (GMat<f32>, GScalar) -> (GMat<f32>);

    /// Sum of all elements, in channel 0.
    pub struct Sum = "core.sum": (GMat<f64>) -> (GScalar);

    /// Mean and population standard deviation, each in channel 0.
    pub struct MeanStdDev = "core.mean_std_dev": (GMat<f64>) -> (GScalar, GScalar);

    /// Multiply every channel of a scalar by a factor.
    pub struct Scale = "core.scale": (GScalar, GOpaque<f64>) -> (GScalar);

    /// Coordinates `(row, col)` of non-zero elements in row-major order.
    pub struct FindNonZero = "core.find_non_zero": (GMat<u8>) -> (GArray<(usize, usize)>);

    /// Values at the given `(row, col)` coordinates.
    pub struct Sample = "core.sample": (GMat<f32>, GArray<(usize, usize)>) -> (GArray<f32>);

    /// Binary threshold.
    pub struct Threshold = "imgproc.threshold": (GMat<u8>, GOpaque<ThresholdParams>) -> (GMat<u8>);

    /// Value histogram of an 8-bit buffer.
    pub struct CalcHist = "imgproc.calc_hist": (GMat<u8>) -> (GOpaque<Histogram>);
}
