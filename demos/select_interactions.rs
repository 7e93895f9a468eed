//! Reduce a long recorded session to a short, diverse summary.
//!
//! Uses a toy hashed bag-of-words embedder in place of a real model.
//!
//! Run: `cargo run --example select_interactions`
//! Verbose: `RUST_LOG=rank_select=debug cargo run --example select_interactions`

use std::collections::hash_map::DefaultHasher;
use std::convert::Infallible;
use std::hash::{Hash, Hasher};

use rank_select::embedding::EmbeddedBatch;
use rank_select::explain::select_explained;
use rank_select::pipeline::{InteractionRanker, RankerConfig, SummaryOrder};
use rank_select::query::{ActivityQuery, FlowContext};
use tracing_subscriber::EnvFilter;

const DIM: usize = 256;

fn hashed_bag_of_words(texts: &[&str]) -> Result<Vec<Vec<f32>>, Infallible> {
    Ok(texts
        .iter()
        .map(|text| {
            let mut v = vec![0.0f32; DIM];
            for word in text.split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
                let mut h = DefaultHasher::new();
                word.hash(&mut h);
                let bucket = h.finish();
                let sign = if bucket & 1 == 0 { 1.0 } else { -1.0 };
                v[(bucket >> 1) as usize % DIM] += sign;
            }
            v
        })
        .collect())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let actions = [
        "User clicked the Sign up button",
        "User typed an email address",
        "User typed a password",
        "User clicked the Sign up button",
        "User dismissed the cookie banner",
        "User scrolled the pricing table",
        "User selected the Pro plan",
        "User entered card details",
        "User confirmed the payment",
        "User uploaded a profile photo",
        "User saved profile changes",
        "User hovered over the help icon",
        "User scrolled the pricing table",
        "User opened notification settings",
        "User published a first project",
    ];

    let context = FlowContext::new("Self-serve signup")
        .with_use_case("onboarding")
        .with_description("Signs up and upgrades to a paid plan. Then sets up a profile.");

    let config = RankerConfig::default()
        .with_cap(6)
        .with_order(SummaryOrder::Chronological);
    let ranker = InteractionRanker::with_config(hashed_bag_of_words, config);

    println!("=== Interaction Selection ===\n");
    println!("{} recorded actions, keeping {}\n", actions.len(), config.mmr.cap);

    let ranked = match ranker.rank_or_truncate(&actions, Some(&context)) {
        Ok(ranked) => ranked,
        Err(e) => {
            eprintln!("selection failed: {e}");
            return;
        }
    };

    println!("Summary ({:?}, chronological):", ranked.strategy);
    for (i, action) in ranked.indices.iter().zip(ranked.pick(&actions)) {
        println!("  [{i:>2}] {action}");
    }

    // Why those? Re-run the selection with provenance.
    let query = ActivityQuery::new().with_context(&context).text();
    let explained = EmbeddedBatch::embed(&hashed_bag_of_words, &query, &actions)
        .and_then(|batch| select_explained(&batch.query, &batch.candidates, config.mmr));
    match explained {
        Ok(trace) => println!("\nPick order:\n{}", trace.render(&actions)),
        Err(e) => eprintln!("explanation failed: {e}"),
    }
}
