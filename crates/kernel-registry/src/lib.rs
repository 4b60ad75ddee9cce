//! Backend Kernel Tables.
//!
//! A backend owns one [`KernelPackage`]: the table the graph compiler consults
//! to resolve "operation kind → kernel object" for that backend.
//!
//! # Architecture
//!
//! Backends collect their kernels at link time (each backend decides how; the
//! CPU backend uses a `linkme` distributed slice populated by its registration
//! macro) and build a package from them once:
//!
//! 1. Every kernel object reports its [`Backend`] and the id of the operation it
//!    implements through [`RegisteredKernel`]
//! 2. [`KernelPackage::from_kernels`] rejects kernels for another backend and a
//!    second kernel for an operation that already has one
//! 3. At runtime the package provides lookup by operation id
//!
//! # Example Lookup
//!
//! ```ignore
//! let package = weft_backend_cpu::kernels()?;
//! let kernel = package.get("core.add_c")?;
//! kernel.apply(&mut ctx)?;
//! ```

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;
use weft_kernel_types::Backend;

/// A kernel object that can live in a [`KernelPackage`].
pub trait RegisteredKernel {
    /// Backend the kernel executes on.
    fn backend(&self) -> Backend;

    /// Id of the operation the kernel implements.
    fn op_id(&self) -> &'static str;
}

/// Errors raised while building or querying a package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two kernels claim the same operation.
    #[error("duplicate kernel for `{op}` on backend `{backend}`")]
    DuplicateKernel { backend: Backend, op: &'static str },

    /// A kernel registered for a different backend was offered to this package.
    #[error("kernel for `{op}` belongs to backend `{found}`, not `{expected}`")]
    BackendMismatch {
        expected: Backend,
        found: Backend,
        op: &'static str,
    },

    /// No kernel implements the operation on this backend.
    #[error("no kernel for `{op}` on backend `{backend}`")]
    UnknownKernel { backend: Backend, op: String },
}

/// Kernel table of one backend, keyed by operation id.
#[derive(Debug, Clone)]
pub struct KernelPackage<K> {
    backend: Backend,
    kernels: IndexMap<&'static str, K>,
}

impl<K: RegisteredKernel> KernelPackage<K> {
    /// Create an empty package
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            kernels: IndexMap::new(),
        }
    }

    /// Build a package from a set of kernels
    pub fn from_kernels<I>(backend: Backend, kernels: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = K>,
    {
        let mut package = Self::new(backend);
        for kernel in kernels {
            package.include(kernel)?;
        }
        debug!(backend = %backend, count = package.len(), "kernel package built");
        Ok(package)
    }

    /// Add a kernel
    pub fn include(&mut self, kernel: K) -> Result<(), RegistryError> {
        let op = kernel.op_id();
        if kernel.backend() != self.backend {
            return Err(RegistryError::BackendMismatch {
                expected: self.backend,
                found: kernel.backend(),
                op,
            });
        }
        if self.kernels.contains_key(op) {
            return Err(RegistryError::DuplicateKernel {
                backend: self.backend,
                op,
            });
        }
        self.kernels.insert(op, kernel);
        Ok(())
    }

    /// Backend this package belongs to
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Look up the kernel for an operation
    pub fn lookup(&self, op: &str) -> Option<&K> {
        self.kernels.get(op)
    }

    /// Look up the kernel for an operation, failing if there is none
    pub fn get(&self, op: &str) -> Result<&K, RegistryError> {
        self.lookup(op).ok_or_else(|| RegistryError::UnknownKernel {
            backend: self.backend,
            op: op.to_string(),
        })
    }

    /// Check if an operation has a kernel
    pub fn includes(&self, op: &str) -> bool {
        self.kernels.contains_key(op)
    }

    /// Operation ids in registration order
    pub fn op_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kernels.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPU: Backend = Backend::new("cpu");
    const GPU: Backend = Backend::new("gpu");

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestKernel {
        backend: Backend,
        op: &'static str,
    }

    impl RegisteredKernel for TestKernel {
        fn backend(&self) -> Backend {
            self.backend
        }

        fn op_id(&self) -> &'static str {
            self.op
        }
    }

    fn kernel(op: &'static str) -> TestKernel {
        TestKernel { backend: CPU, op }
    }

    #[test]
    fn test_lookup() {
        let package =
            KernelPackage::from_kernels(CPU, [kernel("core.add"), kernel("core.sub")]).unwrap();
        assert!(package.includes("core.add"));
        assert!(!package.includes("core.mul"));
        assert_eq!(package.lookup("core.sub"), Some(&kernel("core.sub")));
        assert_eq!(package.len(), 2);
    }

    #[test]
    fn test_registration_order_preserved() {
        let package =
            KernelPackage::from_kernels(CPU, [kernel("b"), kernel("a"), kernel("c")]).unwrap();
        assert_eq!(package.op_ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = KernelPackage::from_kernels(CPU, [kernel("core.add"), kernel("core.add")])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateKernel {
                backend: CPU,
                op: "core.add"
            }
        );
    }

    #[test]
    fn test_foreign_backend_rejected() {
        let mut package = KernelPackage::new(CPU);
        let err = package
            .include(TestKernel {
                backend: GPU,
                op: "core.add",
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::BackendMismatch { found, .. } if found == GPU));
        assert!(package.is_empty());
    }

    #[test]
    fn test_get_unknown() {
        let package: KernelPackage<TestKernel> = KernelPackage::new(CPU);
        let err = package.get("core.nope").unwrap_err();
        assert_eq!(err.to_string(), "no kernel for `core.nope` on backend `cpu`");
    }
}
