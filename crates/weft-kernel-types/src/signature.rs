//! Operation signatures.

use std::fmt;

use weft_foundation::ArgKind;

use crate::category::{ValueCategory, ValueKind};

/// Runtime description of one signature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub category: ValueCategory,
    pub kind: ArgKind,
}

impl ArgSpec {
    pub fn of<K: ValueKind>() -> Self {
        Self {
            category: K::CATEGORY,
            kind: K::arg_kind(),
        }
    }
}

/// Ordered list of signature slots, implemented for tuples of [`ValueKind`]s.
pub trait ArgList: 'static {
    /// Number of slots.
    const LEN: usize;

    /// Slot descriptions in declaration order.
    fn specs() -> Vec<ArgSpec>;
}

macro_rules! impl_arg_list {
    ($len:expr; $($T:ident),*) => {
        impl<$($T: ValueKind),*> ArgList for ($($T,)*) {
            const LEN: usize = $len;

            fn specs() -> Vec<ArgSpec> {
                vec![$(ArgSpec::of::<$T>()),*]
            }
        }
    };
}

impl_arg_list!(0;);
impl_arg_list!(1; A);
impl_arg_list!(2; A, B);
impl_arg_list!(3; A, B, C);
impl_arg_list!(4; A, B, C, D);
impl_arg_list!(5; A, B, C, D, E);
impl_arg_list!(6; A, B, C, D, E, F);
impl_arg_list!(7; A, B, C, D, E, F, G);
impl_arg_list!(8; A, B, C, D, E, F, G, H);

/// Input and output slots of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ins: Vec<ArgSpec>,
    pub outs: Vec<ArgSpec>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, specs: &[ArgSpec]) -> fmt::Result {
            write!(f, "(")?;
            for (i, spec) in specs.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", spec.kind)?;
            }
            write!(f, ")")
        }
        list(f, &self.ins)?;
        write!(f, " -> ")?;
        list(f, &self.outs)
    }
}

/// A graph operation kind with a fixed typed signature.
///
/// Declared once per operation, usually through [`graph_op!`](crate::graph_op).
/// Backends bind implementations to it; the executable never sees the types,
/// only the [`Signature`].
pub trait GraphOp: 'static {
    /// Stable operation identifier (e.g. `"core.add_c"`).
    const ID: &'static str;

    type Ins: ArgList;
    type Outs: ArgList;

    fn signature() -> Signature {
        Signature {
            ins: Self::Ins::specs(),
            outs: Self::Outs::specs(),
        }
    }
}

/// Declare graph operations.
///
/// ```rust
/// use weft_kernel_types::{graph_op, GMat, GScalar, GraphOp};
///
/// graph_op! {
///     /// Add a scalar to every element.
///     pub struct AddC = "core.add_c": (GMat<f32>, GScalar) -> (GMat<f32>);
/// }
///
/// assert_eq!(AddC::ID, "core.add_c");
/// assert_eq!(AddC::signature().to_string(), "(buffer<f32>, scalar) -> (buffer<f32>)");
/// ```
#[macro_export]
macro_rules! graph_op {
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $name:ident = $id:literal : ($($in:ty),* $(,)?) -> ($($out:ty),* $(,)?);
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::GraphOp for $name {
            const ID: &'static str = $id;
            type Ins = ($($in,)*);
            type Outs = ($($out,)*);
        }
    )*};
}
