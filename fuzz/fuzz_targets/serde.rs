#![no_main]

use cardinality_sketch::Sketch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = serde_json::from_slice::<Sketch>(data) {
        sketch.add(b"element");
        assert!(sketch.count() > 0);
        assert!(sketch.registers().iter().all(|v| v <= 63));
    }
});
