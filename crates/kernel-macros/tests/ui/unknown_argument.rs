// Arguments other than `op` and `name` are rejected

#[weft_kernel_macros::cpu_kernel(op = Double, backend = "gpu")]
fn double(c: f64, dst: &mut f64) {}

fn main() {}
