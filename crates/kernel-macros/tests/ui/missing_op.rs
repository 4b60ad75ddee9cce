// The `op` argument is required

#[weft_kernel_macros::cpu_kernel(name = "Lone")]
fn lone(dst: &mut f64) {}

fn main() {}
