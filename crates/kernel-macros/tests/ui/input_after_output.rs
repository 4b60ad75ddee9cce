// An input parameter after an output is rejected

#[weft_kernel_macros::cpu_kernel(op = Split)]
fn split(dst: &mut Vec<u8>, src: &[u8]) {}

fn main() {}
