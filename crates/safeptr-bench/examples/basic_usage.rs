//! Allocate, fill, print and free one buffer.
//!
//! Run with `cargo run --example basic_usage`. In a debug build, comment
//! out the `free()` call to see the leak warning on exit from `main`.

use safeptr::{SafePtr, PRINT_ALL_LABEL, PRINT_LABEL};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut p: SafePtr<i32> = SafePtr::new(10);
    for v in p.iter_mut() {
        *v = 3;
    }

    p.print_all(PRINT_ALL_LABEL)?;
    println!("{PRINT_LABEL}: first element is {}", p[0]);
    println!("p.at(10) -> {:?}", p.at(10));

    p.free()?;
    Ok(())
}
