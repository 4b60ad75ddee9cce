//! Error types for kernel invocation.

use std::fmt;

use thiserror::Error;
use weft_foundation::ArgKind;

/// Position of an argument in a kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    Input(usize),
    Output(usize),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Input(index) => write!(f, "input {index}"),
            Port::Output(index) => write!(f, "output {index}"),
        }
    }
}

/// Errors that can occur while binding or running a kernel.
///
/// All of them are local to one node execution. Nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// An argument was accessed as a type other than the one it holds.
    #[error("type mismatch at {port}: expected {expected}, found {found}")]
    TypeMismatch {
        port: Port,
        expected: String,
        found: ArgKind,
    },

    /// A declared output has no storage bound to it.
    #[error("output {index} has no bound storage")]
    MissingOutputBinding { index: usize },

    /// The argument list does not have as many entries as the signature.
    #[error("expected {expected} {direction}, found {found}")]
    ArityMismatch {
        direction: &'static str,
        expected: usize,
        found: usize,
    },

    /// An input index past the end of the argument list.
    #[error("input {index} out of range ({len} inputs)")]
    InputIndexOutOfRange { index: usize, len: usize },

    /// A buffer output no longer refers to the storage it was bound to.
    #[error("output {index} was reallocated by the kernel body")]
    BufferReallocated { index: usize },

    /// The kernel body reported a failure.
    #[error("kernel body failed: {0}")]
    Body(String),
}

impl KernelError {
    /// Create a TypeMismatch error (DRY helper).
    pub fn type_mismatch(port: Port, expected: impl fmt::Display, found: ArgKind) -> Self {
        Self::TypeMismatch {
            port,
            expected: expected.to_string(),
            found,
        }
    }

    /// Failure raised from inside a kernel body.
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }
}
