// Async kernel bodies are rejected

#[weft_kernel_macros::cpu_kernel(op = Double)]
async fn double(c: f64, dst: &mut f64) {}

fn main() {}
