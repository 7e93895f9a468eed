#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rank_select::{similarity, simd};

#[derive(Arbitrary, Debug)]
struct VecPair {
    a: Vec<f32>,
    b: Vec<f32>,
}

fuzz_target!(|input: VecPair| {
    let _ = simd::dot(&input.a, &input.b);

    let c = simd::cosine(&input.a, &input.b);
    if !c.is_nan() {
        assert!((-1.0..=1.0).contains(&c), "cosine out of range: {c}");
    }

    match similarity::score(&input.a, &input.b) {
        Ok(s) => assert_eq!(input.a.len(), input.b.len(), "score {s} on unequal lengths"),
        Err(_) => assert_ne!(input.a.len(), input.b.len()),
    }
});
