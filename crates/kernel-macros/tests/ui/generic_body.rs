// Kernel bodies generic over a type are rejected

#[weft_kernel_macros::cpu_kernel(op = Gather)]
fn gather<T: Copy>(src: &[T], dst: &mut Vec<T>) {}

fn main() {}
