//! Chunker invariants: size floor, sequential indices, overlap carry, and
//! in-order sentence coverage.

use docrag::{Chunker, SentenceChunker};
use proptest::prelude::*;

/// Twelve distinct sentences, each comfortably over the survival floor once
/// combined.
fn sample_sentences() -> Vec<String> {
    (0..12)
        .map(|i| format!("sentence number {i} talks about topic {i} in enough words to matter"))
        .collect()
}

#[test]
fn every_chunk_exceeds_the_minimum_length() {
    let chunker = SentenceChunker::new(120, 100);
    let text = sample_sentences().join(". ") + ".";
    let chunks = chunker.chunk(&text);

    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(chunk.text.trim().len() > 50, "chunk too short: {:?}", chunk.text);
    }
}

#[test]
fn chunk_indices_are_sequential_from_zero() {
    let chunker = SentenceChunker::new(120, 100);
    let text = sample_sentences().join(". ") + ".";
    let chunks = chunker.chunk(&text);

    for (expected, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, expected);
    }
}

#[test]
fn sentences_are_covered_in_original_order() {
    let chunker = SentenceChunker::new(120, 100);
    let sentences = sample_sentences();
    let text = sentences.join(". ") + ".";
    let chunks = chunker.chunk(&text);

    let concatenated: String =
        chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");

    let mut last_position = 0;
    for sentence in &sentences {
        let position = concatenated[last_position..]
            .find(sentence.as_str())
            .unwrap_or_else(|| panic!("sentence missing or out of order: {sentence}"));
        last_position += position;
    }
}

#[test]
fn consecutive_chunks_share_the_overlap_carry() {
    // overlap 100 carries the last 20 words of the emitted chunk.
    let chunker = SentenceChunker::new(120, 100);
    let text = sample_sentences().join(". ") + ".";
    let chunks = chunker.chunk(&text);
    assert!(chunks.len() >= 2);

    let words: Vec<&str> = chunks[0].text.split(' ').collect();
    let carry = words[words.len().saturating_sub(20)..].join(" ");
    assert!(
        chunks[1].text.starts_with(&carry),
        "expected chunk 1 to start with the tail of chunk 0: {carry:?}"
    );
}

#[test]
fn zero_overlap_carries_nothing() {
    let chunker = SentenceChunker::new(120, 0);
    let sentences = sample_sentences();
    let text = sentences.join(". ") + ".";
    let chunks = chunker.chunk(&text);
    assert!(chunks.len() >= 2);

    // With no carry, each chunk after the first starts at a fresh sentence.
    assert!(chunks[1].text.starts_with("sentence number"));
    assert!(!chunks[1].text.starts_with(&chunks[0].text));
}

#[test]
fn text_with_only_terminators_yields_nothing() {
    let chunker = SentenceChunker::default();
    assert!(chunker.chunk("...!!!???").is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any input, surviving chunks are longer than 50 bytes and carry
    /// sequential indices starting at zero.
    #[test]
    fn chunks_respect_floor_and_index_order(
        sentences in proptest::collection::vec("[a-z]{2,10}( [a-z]{2,10}){0,12}", 0..30),
        max_size in 60usize..400,
        overlap in 0usize..150,
    ) {
        let text = sentences.join(". ");
        let chunker = SentenceChunker::new(max_size, overlap);
        let chunks = chunker.chunk(&text);

        for (expected, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, expected);
            prop_assert!(chunk.text.trim().len() > 50);
        }
    }

    /// Text without any sentence terminator yields at most one chunk.
    #[test]
    fn terminator_free_text_yields_at_most_one_chunk(
        text in "[a-z ]{0,300}",
    ) {
        let chunker = SentenceChunker::default();
        let chunks = chunker.chunk(&text);
        prop_assert!(chunks.len() <= 1);
        if let Some(chunk) = chunks.first() {
            prop_assert_eq!(chunk.text.as_str(), text.trim());
        }
    }
}
