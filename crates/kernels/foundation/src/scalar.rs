use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Compact four-component scalar used by the graph value model.
///
/// This is the representation-neutral form stored in argument lists and
/// output slots. Backends convert it into whatever scalar type their numeric
/// library expects and back again after the kernel body runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scalar {
    /// Components in channel order.
    pub val: [f64; 4],
}

impl Scalar {
    /// Create a scalar from four components.
    pub const fn new(v0: f64, v1: f64, v2: f64, v3: f64) -> Self {
        Self {
            val: [v0, v1, v2, v3],
        }
    }

    /// Create a scalar with only the first channel set.
    pub const fn from_value(v0: f64) -> Self {
        Self::new(v0, 0.0, 0.0, 0.0)
    }

    /// Create a scalar with every channel set to `v`.
    pub const fn all(v: f64) -> Self {
        Self { val: [v; 4] }
    }

    /// Components as an array.
    pub const fn to_array(self) -> [f64; 4] {
        self.val
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::from_value(v)
    }
}

impl From<[f64; 4]> for Scalar {
    fn from(val: [f64; 4]) -> Self {
        Self { val }
    }
}

impl Index<usize> for Scalar {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.val[index]
    }
}

impl IndexMut<usize> for Scalar {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.val[index]
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.val;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}
