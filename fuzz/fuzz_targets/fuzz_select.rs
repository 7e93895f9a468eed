#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rank_select::diversity::{select, MmrConfig};

#[derive(Arbitrary, Debug)]
struct Input {
    query: Vec<f32>,
    candidates: Vec<Vec<f32>>,
    lambda: f32,
    cap: u8,
}

fuzz_target!(|input: Input| {
    let config = MmrConfig::new(input.lambda, usize::from(input.cap));
    let Ok(selection) = select(&input.query, &input.candidates, config) else {
        return;
    };

    assert_eq!(selection.len(), config.cap.min(input.candidates.len()));
    let unique: HashSet<usize> = selection.iter().copied().collect();
    assert_eq!(unique.len(), selection.len());
    assert!(selection.iter().all(|&i| i < input.candidates.len()));

    // Same inputs, same picks.
    let again = select(&input.query, &input.candidates, config);
    assert_eq!(again.ok().as_ref(), Some(&selection));
});
