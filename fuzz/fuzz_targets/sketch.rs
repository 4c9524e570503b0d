#![no_main]

use cardinality_sketch::Sketch;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let precision = (data[0] % 17) as u32;
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut sketch1 = Sketch::with_precision(precision).unwrap();
    for chunk in first_half.chunks(4) {
        sketch1.add(chunk);
        assert!(sketch1.count() > 0);
    }

    let mut sketch2 = Sketch::with_precision(precision).unwrap();
    for chunk in second_half.chunks(4) {
        sketch2.add(chunk);
        assert!(sketch2.count() > 0);
    }

    let union = sketch1.union(&sketch2).unwrap();
    for idx in 0..union.bucket_count() {
        assert_eq!(union.register(idx), sketch1.register(idx).max(sketch2.register(idx)));
    }
    sketch2.merge(&sketch1).unwrap();
    assert_eq!(union, sketch2);
});
