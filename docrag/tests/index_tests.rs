//! Contract tests for the in-memory vector index: validation, search
//! ordering, scroll pagination, and deletion semantics.

mod common;

use common::make_point;
use docrag::{InMemoryIndex, RagError, VectorIndex};
use proptest::prelude::*;
use uuid::Uuid;

#[tokio::test]
async fn upsert_rejects_wrong_dimensionality_and_persists_nothing() {
    let index = InMemoryIndex::new("documents", 1536);
    index.ensure_collection().await.unwrap();

    let err = index
        .upsert(make_point("report.pdf", 0, vec![0.1, 0.2, 0.3], "some chunk text"))
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::InvalidVector { expected: 1536, actual: 3 }));

    let page = index.scroll(10, None).await.unwrap();
    assert!(page.points.is_empty());
}

#[tokio::test]
async fn upsert_rejects_empty_text() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let err = index
        .upsert(make_point("report.pdf", 0, vec![1.0, 0.0, 0.0, 0.0], "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::InvalidPayload(_)));
}

#[tokio::test]
async fn search_on_empty_collection_returns_no_results() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_before_ensure_is_a_store_error() {
    let index = InMemoryIndex::new("documents", 4);
    let err = index.search(&[1.0, 0.0, 0.0, 0.0], 5).await.unwrap_err();
    assert!(matches!(err, RagError::Store { .. }));
}

#[tokio::test]
async fn search_rejects_query_of_wrong_dimensionality() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let err = index.search(&[1.0, 0.0], 5).await.unwrap_err();
    assert!(matches!(err, RagError::InvalidVector { expected: 4, actual: 2 }));
}

#[tokio::test]
async fn search_ranks_by_descending_similarity_with_payload_fields() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    index
        .upsert(make_point("notes.txt", 1, vec![0.0, 1.0, 0.0, 0.0], "orthogonal chunk"))
        .await
        .unwrap();
    index
        .upsert(make_point("report.pdf", 0, vec![1.0, 0.0, 0.0, 0.0], "aligned chunk"))
        .await
        .unwrap();

    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 5).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].filename, "report.pdf");
    assert_eq!(results[0].chunk_index, 0);
    assert_eq!(results[0].text, "aligned chunk");
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn upsert_replaces_an_existing_id() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let mut point = make_point("report.pdf", 0, vec![1.0, 0.0, 0.0, 0.0], "first version");
    let id = point.id;
    index.upsert(point.clone()).await.unwrap();

    point.payload.text = "second version".to_string();
    index.upsert(point).await.unwrap();

    let page = index.scroll(10, None).await.unwrap();
    assert_eq!(page.points.len(), 1);
    assert_eq!(page.points[0].id, id);
    assert_eq!(page.points[0].payload.text, "second version");
}

#[tokio::test]
async fn scroll_paginates_in_insertion_order() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    for i in 0..5u64 {
        index
            .upsert(make_point("report.pdf", i, vec![1.0, 0.0, 0.0, 0.0], &format!("chunk {i}")))
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    let mut pages = 0;
    loop {
        let page = index.scroll(2, cursor).await.unwrap();
        pages += 1;
        seen.extend(page.points.iter().map(|p| p.payload.chunk_index));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn delete_by_ids_rejects_an_empty_set() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let err = index.delete_by_ids(&[]).await.unwrap_err();
    assert!(matches!(err, RagError::InvalidInput(_)));
}

#[tokio::test]
async fn delete_by_ids_removes_points_and_ignores_absent_ids() {
    let index = InMemoryIndex::new("documents", 4);
    index.ensure_collection().await.unwrap();

    let keep = make_point("notes.txt", 0, vec![0.0, 1.0, 0.0, 0.0], "chunk to keep");
    let drop = make_point("report.pdf", 0, vec![1.0, 0.0, 0.0, 0.0], "chunk to drop");
    let drop_id = drop.id;
    index.upsert(keep.clone()).await.unwrap();
    index.upsert(drop).await.unwrap();

    index.delete_by_ids(&[drop_id, Uuid::new_v4()]).await.unwrap();

    let page = index.scroll(10, None).await.unwrap();
    assert_eq!(page.points.len(), 1);
    assert_eq!(page.points[0].id, keep.id);

    // Deleting the same id again is a no-op.
    index.delete_by_ids(&[drop_id]).await.unwrap();
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// For any set of stored points, search returns at most `limit` results in
/// descending score order. Equal-score ties are store-defined, so only the
/// ordering relation is asserted.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_limit(
            vectors in proptest::collection::vec(arb_normalized_embedding(DIM), 1..16),
            query in arb_normalized_embedding(DIM),
            limit in 1usize..20,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let index = InMemoryIndex::new("documents", DIM);
                index.ensure_collection().await.unwrap();
                let count = vectors.len();
                for (i, vector) in vectors.into_iter().enumerate() {
                    index
                        .upsert(make_point("doc.txt", i as u64, vector, &format!("chunk {i}")))
                        .await
                        .unwrap();
                }
                (index.search(&query, limit).await.unwrap(), count)
            });

            let (results, stored) = results;
            prop_assert!(results.len() <= limit);
            prop_assert!(results.len() <= stored);
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}
