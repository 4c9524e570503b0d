use cardinality_sketch::{Sketch, SketchError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SketchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut sketch1 = Sketch::new(16_384)?;
    for i in 0..10_000u32 {
        sketch1.add(&i.to_le_bytes());
    }
    println!("sketch1 count = {}", sketch1.count());

    let mut sketch2 = Sketch::new(16_384)?;
    for i in 5_000..15_000u32 {
        sketch2.add(&i.to_le_bytes());
    }
    println!("sketch2 count = {}", sketch2.count());

    sketch1.merge(&sketch2)?;
    println!("merged count = {} (actual 15000)", sketch1.count());

    match sketch1.merge(&Sketch::new(1024)?) {
        Ok(()) => println!("unexpected merge of mismatched sketches"),
        Err(e) => println!("merge rejected: {}", e),
    }

    Ok(())
}
