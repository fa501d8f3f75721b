use ngram_matcher::FuzzyMatcher;

fn main() {
    // canonical list to match against
    let corpus = [
        "Apple Inc.",
        "Microsoft Corporation",
        "Alphabet Inc.",
        "Amazon.com, Inc.",
        "Meta Platforms, Inc.",
    ];

    // noisy lookups
    let queries = ["aple inc", "microsoft corp", "amazon com"];

    let mut matcher = FuzzyMatcher::default();
    matcher.add_corpus(&corpus).unwrap();

    let results = matcher
        .match_against_corpus(&queries, FuzzyMatcher::DEFAULT_TOP_N, 0.3)
        .unwrap();

    for matches in &results {
        println!("{:#?}", matches);
    }

    // state survives a save/load round trip
    let blob = matcher.to_bytes().unwrap();
    let restored = FuzzyMatcher::from_bytes(&blob).unwrap();
    println!(
        "restored matcher: {} corpus entries, {} bytes of state",
        restored.corpus().unwrap().strings.len(),
        blob.len()
    );
}
