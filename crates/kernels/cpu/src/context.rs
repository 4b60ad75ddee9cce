//! Execution context handed to a CPU kernel.
//!
//! A [`CpuContext`] holds the argument list of one node execution: borrowed
//! inputs in declaration order and the output storage bound by index. Kernels
//! never touch it directly; the adapters in [`crate::adapter`] pull typed
//! values out of it on their behalf.

use std::collections::HashMap;

use weft_foundation::{Arg, ArgKind, ArrayRef, Buffer, ElemType, OutArg, Scalar};
use weft_kernel_types::{ArgSpec, Signature};

use crate::config::CpuBackendConfig;
use crate::error::{KernelError, Port};

/// Argument list and output bindings for one kernel call.
#[derive(Debug)]
pub struct CpuContext<'a> {
    inputs: Vec<Arg<'a>>,
    outputs: HashMap<usize, OutArg<'a>>,
    config: CpuBackendConfig,
}

impl<'a> CpuContext<'a> {
    pub fn new(inputs: Vec<Arg<'a>>) -> Self {
        Self {
            inputs,
            outputs: HashMap::new(),
            config: CpuBackendConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CpuBackendConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind storage to output `index`, builder style.
    pub fn with_output(mut self, index: usize, out: impl Into<OutArg<'a>>) -> Self {
        self.bind_output(index, out);
        self
    }

    /// Bind storage to output `index`, replacing any earlier binding.
    pub fn bind_output(&mut self, index: usize, out: impl Into<OutArg<'a>>) {
        self.outputs.insert(index, out.into());
    }

    pub fn config(&self) -> &CpuBackendConfig {
        &self.config
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output slots currently holding storage.
    pub fn bound_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_kind(&self, index: usize) -> Option<ArgKind> {
        self.inputs.get(index).map(Arg::kind)
    }

    pub fn output_kind(&self, index: usize) -> Option<ArgKind> {
        self.outputs.get(&index).map(OutArg::kind)
    }

    /// Check the argument list against a signature before anything is unpacked.
    ///
    /// Verifies the input count, the kind of every input, and that every
    /// declared output is bound to storage of the declared kind.
    pub fn check_signature(&self, signature: &Signature) -> Result<(), KernelError> {
        if self.inputs.len() != signature.ins.len() {
            return Err(KernelError::ArityMismatch {
                direction: "inputs",
                expected: signature.ins.len(),
                found: self.inputs.len(),
            });
        }
        for (index, (arg, spec)) in self.inputs.iter().zip(&signature.ins).enumerate() {
            check_kind(Port::Input(index), spec, arg.kind())?;
        }

        for (index, spec) in signature.outs.iter().enumerate() {
            let found = self
                .output_kind(index)
                .ok_or(KernelError::MissingOutputBinding { index })?;
            check_kind(Port::Output(index), spec, found)?;
        }
        if self.outputs.len() != signature.outs.len() {
            return Err(KernelError::ArityMismatch {
                direction: "outputs",
                expected: signature.outs.len(),
                found: self.outputs.len(),
            });
        }
        Ok(())
    }

    fn input(&self, index: usize) -> Result<Arg<'a>, KernelError> {
        self.inputs
            .get(index)
            .copied()
            .ok_or(KernelError::InputIndexOutOfRange {
                index,
                len: self.inputs.len(),
            })
    }

    pub fn in_buffer(&self, index: usize) -> Result<&'a Buffer, KernelError> {
        match self.input(index)? {
            Arg::Buffer(buffer) => Ok(buffer),
            other => Err(KernelError::type_mismatch(
                Port::Input(index),
                "buffer",
                other.kind(),
            )),
        }
    }

    pub fn in_scalar(&self, index: usize) -> Result<&'a Scalar, KernelError> {
        match self.input(index)? {
            Arg::Scalar(scalar) => Ok(scalar),
            other => Err(KernelError::type_mismatch(
                Port::Input(index),
                "scalar",
                other.kind(),
            )),
        }
    }

    /// Typed array input as a read-only slice.
    pub fn in_array<T: 'static>(&self, index: usize) -> Result<&'a [T], KernelError> {
        let arg = self.input(index)?;
        let items = match arg {
            Arg::Array(array) => array.rref::<T>(),
            _ => None,
        };
        items.ok_or_else(|| {
            KernelError::type_mismatch(
                Port::Input(index),
                ArgKind::Array(ElemType::of::<T>()),
                arg.kind(),
            )
        })
    }

    /// Opaque input as a reference to the concrete value.
    pub fn in_arg<T: 'static>(&self, index: usize) -> Result<&'a T, KernelError> {
        let arg = self.input(index)?;
        let value = match arg {
            Arg::Opaque(opaque) => opaque.get::<T>(),
            _ => None,
        };
        value.ok_or_else(|| {
            KernelError::type_mismatch(
                Port::Input(index),
                ArgKind::Opaque(ElemType::of::<T>()),
                arg.kind(),
            )
        })
    }

    /// Take the storage bound to output `index`.
    ///
    /// The binding is moved out of the context, so each output can be taken
    /// once per call. On a category mismatch the binding is left in place.
    pub fn out_buffer(&mut self, index: usize) -> Result<&'a mut Buffer, KernelError> {
        match self.take_output(index)? {
            OutArg::Buffer(buffer) => Ok(buffer),
            other => Err(self.restore(index, other, "buffer")),
        }
    }

    pub fn out_scalar(&mut self, index: usize) -> Result<&'a mut Scalar, KernelError> {
        match self.take_output(index)? {
            OutArg::Scalar(scalar) => Ok(scalar),
            other => Err(self.restore(index, other, "scalar")),
        }
    }

    /// Typed array output as the live vector inside the bound storage.
    pub fn out_array<T: 'static>(&mut self, index: usize) -> Result<&'a mut Vec<T>, KernelError> {
        let expected = ArgKind::Array(ElemType::of::<T>());
        match self.take_output(index)? {
            OutArg::Array(array) if array.elem_type().is::<T>() => {
                let found = ArgKind::Array(array.elem_type());
                ArrayRef::wref::<T>(array)
                    .ok_or_else(|| KernelError::type_mismatch(Port::Output(index), expected, found))
            }
            other => Err(self.restore(index, other, expected)),
        }
    }

    /// Opaque output as a mutable reference to the concrete value.
    pub fn out_opaque<T: 'static>(&mut self, index: usize) -> Result<&'a mut T, KernelError> {
        let expected = ArgKind::Opaque(ElemType::of::<T>());
        match self.take_output(index)? {
            OutArg::Opaque(opaque) if opaque.elem_type().is::<T>() => {
                let found = ArgKind::Opaque(opaque.elem_type());
                opaque
                    .get_mut::<T>()
                    .ok_or_else(|| KernelError::type_mismatch(Port::Output(index), expected, found))
            }
            other => Err(self.restore(index, other, expected)),
        }
    }

    fn take_output(&mut self, index: usize) -> Result<OutArg<'a>, KernelError> {
        self.outputs
            .remove(&index)
            .ok_or(KernelError::MissingOutputBinding { index })
    }

    fn restore(&mut self, index: usize, out: OutArg<'a>, expected: impl ToString) -> KernelError {
        let found = out.kind();
        self.outputs.insert(index, out);
        KernelError::TypeMismatch {
            port: Port::Output(index),
            expected: expected.to_string(),
            found,
        }
    }
}

fn check_kind(port: Port, spec: &ArgSpec, found: ArgKind) -> Result<(), KernelError> {
    if found == spec.kind {
        Ok(())
    } else {
        Err(KernelError::type_mismatch(port, spec.kind, found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_foundation::{DType, OpaqueRef};
    use weft_kernel_types::{graph_op, GArray, GMat, GOpaque, GScalar, GraphOp};

    graph_op! {
        struct AddC = "test.add_c": (GMat<f32>, GScalar) -> (GMat<f32>);
        struct Collect = "test.collect": (GOpaque<u32>) -> (GArray<u32>, GScalar);
    }

    fn buffer_f32() -> Buffer {
        Buffer::zeros(DType::F32, 2, 2).unwrap()
    }

    #[test]
    fn test_input_accessors() {
        let src = buffer_f32();
        let c = Scalar::from_value(3.0);
        let items = ArrayRef::new(vec![1u32, 2, 3]);
        let limit = OpaqueRef::new(7u32);
        let ctx = CpuContext::new(vec![
            Arg::from(&src),
            Arg::from(&c),
            Arg::from(&items),
            Arg::from(&limit),
        ]);

        assert_eq!(ctx.in_buffer(0).unwrap().shape(), (2, 2));
        assert_eq!(ctx.in_scalar(1).unwrap()[0], 3.0);
        assert_eq!(ctx.in_array::<u32>(2).unwrap(), &[1, 2, 3]);
        assert_eq!(*ctx.in_arg::<u32>(3).unwrap(), 7);
    }

    #[test]
    fn test_input_type_mismatch() {
        let c = Scalar::default();
        let items = ArrayRef::new(vec![1u32]);
        let ctx = CpuContext::new(vec![Arg::from(&c), Arg::from(&items)]);

        let err = ctx.in_buffer(0).unwrap_err();
        assert_eq!(
            err,
            KernelError::type_mismatch(Port::Input(0), "buffer", ArgKind::Scalar)
        );

        let err = ctx.in_array::<i64>(1).unwrap_err();
        assert!(matches!(err, KernelError::TypeMismatch { port: Port::Input(1), .. }));
        assert_eq!(
            err.to_string(),
            "type mismatch at input 1: expected array<i64>, found array<u32>"
        );
    }

    #[test]
    fn test_input_out_of_range() {
        let ctx = CpuContext::new(Vec::new());
        assert_eq!(
            ctx.in_scalar(2).unwrap_err(),
            KernelError::InputIndexOutOfRange { index: 2, len: 0 }
        );
    }

    #[test]
    fn test_output_taken_once() {
        let mut dst = Scalar::default();
        let mut ctx = CpuContext::new(Vec::new()).with_output(0, &mut dst);

        let out = ctx.out_scalar(0).unwrap();
        out[1] = 5.0;
        assert_eq!(
            ctx.out_scalar(0).unwrap_err(),
            KernelError::MissingOutputBinding { index: 0 }
        );
        drop(ctx);
        assert_eq!(dst[1], 5.0);
    }

    #[test]
    fn test_output_mismatch_keeps_binding() {
        let mut dst = ArrayRef::new(vec![0u32]);
        let mut ctx = CpuContext::new(Vec::new()).with_output(0, &mut dst);

        let err = ctx.out_array::<f32>(0).unwrap_err();
        assert!(matches!(err, KernelError::TypeMismatch { port: Port::Output(0), .. }));
        assert!(ctx.out_buffer(0).is_err());

        let items = ctx.out_array::<u32>(0).unwrap();
        items.push(9);
        drop(ctx);
        assert_eq!(dst.rref::<u32>(), Some(&[0u32, 9][..]));
    }

    #[test]
    fn test_out_opaque() {
        let mut state = OpaqueRef::new(String::from("a"));
        let mut ctx = CpuContext::new(Vec::new()).with_output(0, &mut state);
        ctx.out_opaque::<String>(0).unwrap().push('b');
        drop(ctx);
        assert_eq!(state.get::<String>().map(String::as_str), Some("ab"));
    }

    #[test]
    fn test_check_signature_ok() {
        let src = buffer_f32();
        let c = Scalar::default();
        let mut dst = buffer_f32();
        let ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&c)]).with_output(0, &mut dst);
        assert_eq!(ctx.check_signature(&AddC::signature()), Ok(()));
    }

    #[test]
    fn test_check_signature_input_arity() {
        let src = buffer_f32();
        let mut dst = buffer_f32();
        let ctx = CpuContext::new(vec![Arg::from(&src)]).with_output(0, &mut dst);
        assert_eq!(
            ctx.check_signature(&AddC::signature()),
            Err(KernelError::ArityMismatch {
                direction: "inputs",
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_check_signature_wrong_dtype() {
        let src = Buffer::zeros(DType::F64, 2, 2).unwrap();
        let c = Scalar::default();
        let mut dst = buffer_f32();
        let ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&c)]).with_output(0, &mut dst);
        let err = ctx.check_signature(&AddC::signature()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch at input 0: expected buffer<f32>, found buffer<f64>"
        );
    }

    #[test]
    fn test_check_signature_outputs() {
        let limit = OpaqueRef::new(1u32);
        let mut items = ArrayRef::empty::<u32>();
        let ctx = CpuContext::new(vec![Arg::from(&limit)]).with_output(0, &mut items);
        assert_eq!(
            ctx.check_signature(&Collect::signature()),
            Err(KernelError::MissingOutputBinding { index: 1 })
        );

        let mut items = ArrayRef::empty::<u32>();
        let mut count = Scalar::default();
        let mut extra = Scalar::default();
        let ctx = CpuContext::new(vec![Arg::from(&limit)])
            .with_output(0, &mut items)
            .with_output(1, &mut count)
            .with_output(2, &mut extra);
        assert!(matches!(
            ctx.check_signature(&Collect::signature()),
            Err(KernelError::ArityMismatch { direction: "outputs", .. })
        ));
    }
}
