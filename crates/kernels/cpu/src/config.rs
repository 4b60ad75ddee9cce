//! CPU backend configuration.

use serde::{Deserialize, Serialize};

/// What happens to buffer outputs after the kernel body returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferValidation {
    /// No check. A body that re-points its output view leaves the bound
    /// storage untouched and nobody is told.
    #[default]
    Permissive,
    /// Fail the call with [`KernelError::BufferReallocated`](crate::KernelError::BufferReallocated)
    /// if an output view no longer covers the storage it was created over.
    Strict,
}

/// Settings carried by a [`CpuContext`](crate::CpuContext) into a kernel call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuBackendConfig {
    /// Post-call check applied to buffer outputs.
    pub buffer_validation: BufferValidation,
}

impl CpuBackendConfig {
    /// Configuration with strict buffer validation.
    pub fn strict() -> Self {
        Self {
            buffer_validation: BufferValidation::Strict,
        }
    }
}
