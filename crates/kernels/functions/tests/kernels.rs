// Kernel package population and end-to-end runs of the core kernels

use weft_backend_cpu::{
    Arg, ArrayRef, Buffer, CpuContext, CpuKernel, DType, GraphOp, KernelError, KernelPackage,
    OpaqueRef, Scalar,
};
use weft_functions::ops::{
    AddC, CalcHist, CopyBuffer, FindNonZero, Histogram, MeanStdDev, Sample, Scale, Sum, Threshold,
    ThresholdParams,
};

fn package() -> KernelPackage<CpuKernel> {
    weft_functions::kernels().unwrap()
}

#[test]
fn test_all_ops_registered() {
    let package = package();
    for op in [
        CopyBuffer::ID,
        AddC::ID,
        Sum::ID,
        MeanStdDev::ID,
        Scale::ID,
        FindNonZero::ID,
        Sample::ID,
        Threshold::ID,
        CalcHist::ID,
    ] {
        assert!(package.includes(op), "no CPU kernel for {op}");
    }
    assert_eq!(package.backend().name(), "cpu");
}

#[test]
fn test_unknown_op() {
    let err = package().get("core.nope").unwrap_err();
    assert_eq!(err.to_string(), "no kernel for `core.nope` on backend `cpu`");
}

#[test]
fn test_add_c() {
    let src = Buffer::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let c = Scalar::new(0.5, 100.0, 100.0, 100.0);
    let mut dst = Buffer::zeros(DType::F32, 2, 2).unwrap();

    let mut ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&c)]).with_output(0, &mut dst);
    package().get(AddC::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    assert_eq!(dst.as_slice::<f32>(), Some(&[1.5, 2.5, 3.5, 4.5][..]));
}

#[test]
fn test_copy_shape_mismatch() {
    let src = Buffer::from_vec(1, 2, vec![1.0f64, 2.0]).unwrap();
    let mut dst = Buffer::zeros(DType::F64, 2, 1).unwrap();

    let mut ctx = CpuContext::new(vec![Arg::from(&src)]).with_output(0, &mut dst);
    let err = package().get(CopyBuffer::ID).unwrap().apply(&mut ctx).unwrap_err();

    assert_eq!(err, KernelError::body("output is 2x1, input is 1x2"));
}

#[test]
fn test_sum_and_stats() {
    let src = Buffer::from_vec(1, 4, vec![2.0f64, 4.0, 4.0, 6.0]).unwrap();
    let package = package();

    let mut total = Scalar::all(-1.0);
    let mut ctx = CpuContext::new(vec![Arg::from(&src)]).with_output(0, &mut total);
    package.get(Sum::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);
    assert_eq!(total, Scalar::from_value(16.0));

    let mut mean = Scalar::default();
    let mut std_dev = Scalar::default();
    let mut ctx = CpuContext::new(vec![Arg::from(&src)])
        .with_output(0, &mut mean)
        .with_output(1, &mut std_dev);
    package.get(MeanStdDev::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);
    assert_eq!(mean[0], 4.0);
    assert!((std_dev[0] - 2.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_scale() {
    let c = Scalar::new(1.0, 2.0, 3.0, 4.0);
    let factor = OpaqueRef::new(0.5f64);
    let mut dst = Scalar::default();

    let mut ctx = CpuContext::new(vec![Arg::from(&c), Arg::from(&factor)]).with_output(0, &mut dst);
    package().get(Scale::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    assert_eq!(dst, Scalar::new(0.5, 1.0, 1.5, 2.0));
}

#[test]
fn test_find_non_zero_replaces_contents() {
    let src = Buffer::from_vec(2, 3, vec![0u8, 5, 0, 7, 0, 1]).unwrap();
    let mut points = ArrayRef::new(vec![(9usize, 9usize)]);

    let mut ctx = CpuContext::new(vec![Arg::from(&src)]).with_output(0, &mut points);
    package().get(FindNonZero::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    assert_eq!(
        points.into_vec::<(usize, usize)>().unwrap(),
        vec![(0, 1), (1, 0), (1, 2)]
    );
}

#[test]
fn test_sample() {
    let src = Buffer::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let points = ArrayRef::new(vec![(1usize, 1usize), (0, 1)]);
    let mut values = ArrayRef::empty::<f32>();

    let mut ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&points)])
        .with_output(0, &mut values);
    package().get(Sample::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    assert_eq!(values.rref::<f32>(), Some(&[4.0f32, 2.0][..]));
}

#[test]
fn test_sample_out_of_bounds() {
    let src = Buffer::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let points = ArrayRef::new(vec![(0usize, 0usize), (2, 0)]);
    let mut values = ArrayRef::empty::<f32>();

    let mut ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&points)])
        .with_output(0, &mut values);
    let err = package().get(Sample::ID).unwrap().apply(&mut ctx).unwrap_err();
    drop(ctx);

    assert_eq!(err.to_string(), "kernel body failed: point (2, 0) outside 2x2 buffer");
    assert_eq!(values.rref::<f32>(), Some(&[1.0f32][..]));
}

#[test]
fn test_threshold() {
    let src = Buffer::from_vec(1, 4, vec![10u8, 128, 129, 255]).unwrap();
    let params = OpaqueRef::new(ThresholdParams {
        thresh: 128,
        max_value: 200,
    });
    let mut dst = Buffer::zeros(DType::U8, 1, 4).unwrap();

    let mut ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&params)]).with_output(0, &mut dst);
    package().get(Threshold::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    assert_eq!(dst.as_slice::<u8>(), Some(&[0u8, 0, 200, 200][..]));
}

#[test]
fn test_threshold_params_from_json() {
    let params: ThresholdParams =
        serde_json::from_str(r#"{"thresh": 40, "max_value": 255}"#).unwrap();
    assert_eq!(
        params,
        ThresholdParams {
            thresh: 40,
            max_value: 255
        }
    );
}

#[test]
fn test_calc_hist() {
    let src = Buffer::from_vec(2, 2, vec![0u8, 3, 3, 255]).unwrap();
    let stale: Histogram = [7; 256];
    let mut hist = OpaqueRef::new(stale);

    let mut ctx = CpuContext::new(vec![Arg::from(&src)]).with_output(0, &mut hist);
    package().get(CalcHist::ID).unwrap().apply(&mut ctx).unwrap();
    drop(ctx);

    let hist = hist.get::<Histogram>().unwrap();
    assert_eq!(hist[0], 1);
    assert_eq!(hist[3], 2);
    assert_eq!(hist[255], 1);
    assert_eq!(hist.iter().sum::<u64>(), 4);
}
