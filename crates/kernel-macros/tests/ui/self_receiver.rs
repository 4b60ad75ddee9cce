// A `self` parameter is rejected

#[weft_kernel_macros::cpu_kernel(op = Take)]
fn take(self, dst: &mut f64) {}

fn main() {}
