//! Semantic search pipeline
//!
//! Embeds the query text, fetches post rows from the store, scores each
//! row by cosine similarity against the query embedding, and returns the
//! rows above the threshold ordered best-first.

use crate::similarity::cosine_similarity;
use bloglens_core::{
    BloglensError, EmbeddingModel, PostStore, Result, ScoredPost, SearchConfig, SearchRequest,
    SearchResults,
};
use std::cmp::Ordering;
use std::sync::Arc;

/// Validate raw search parameters, short-circuiting on the first violation
pub fn validate_search_request(request: &SearchRequest) -> Result<()> {
    if request.query.trim().is_empty() {
        return Err(BloglensError::InvalidParameter(
            "Query parameter is required and cannot be empty".to_string(),
        ));
    }

    if let Some(limit) = request.limit {
        if limit < 1 {
            return Err(BloglensError::InvalidParameter(
                "Limit must be a positive number".to_string(),
            ));
        }
    }

    if let Some(offset) = request.offset {
        if offset < 0 {
            return Err(BloglensError::InvalidParameter(
                "Offset must be a non-negative number".to_string(),
            ));
        }
    }

    if let Some(threshold) = request.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(BloglensError::InvalidParameter(
                "Threshold must be between 0 and 1".to_string(),
            ));
        }
    }

    Ok(())
}

/// Semantic post search over the store
pub struct SemanticSearch {
    embedder: Arc<dyn EmbeddingModel>,
    store: Arc<dyn PostStore>,
    config: SearchConfig,
}

impl SemanticSearch {
    /// Create a new search pipeline
    pub fn new(
        embedder: Arc<dyn EmbeddingModel>,
        store: Arc<dyn PostStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Run a search for the request
    ///
    /// Unlike summary generation there is no fallback here: any upstream
    /// failure propagates to the caller.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        tracing::info!("Starting semantic search for query: \"{}\"", request.query);

        // 1. Validate before touching any upstream service
        validate_search_request(request)?;

        let limit = request.limit.unwrap_or(self.config.default_limit);
        let offset = request.offset.unwrap_or(self.config.default_offset);
        let threshold = request.threshold.unwrap_or(self.config.default_threshold);

        // 2. Embed the query
        let query_embedding = self.embedder.embed(&request.query).await?;

        // 3. Fetch candidate rows
        let page = self.store.list_posts(limit, offset).await?;
        tracing::info!(
            "Processing {} posts for similarity calculation",
            page.rows.len()
        );

        // 4. Score, rank, and apply the threshold
        let mut rows = Vec::new();
        for post in page.rows {
            let Some(embedding) = post.embedding.as_ref() else {
                tracing::debug!("Skipping post {} without embedding", post.id);
                continue;
            };
            let vector = embedding.decode()?;

            match cosine_similarity(&query_embedding, &vector) {
                Some(similarity) => rows.push(ScoredPost { post, similarity }),
                None => {
                    tracing::debug!("Skipping post {} with incompatible embedding", post.id);
                }
            }
        }

        rows.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        rows.retain(|scored| scored.similarity >= threshold);

        tracing::info!(
            "Found {} relevant posts above threshold {}",
            rows.len(),
            threshold
        );

        Ok(SearchResults {
            length: rows.len(),
            rows,
            query: request.query.clone(),
            threshold,
            limit,
            offset,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bloglens_core::{EmbeddingData, PostPage, PostRow};
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    struct FixedEmbedder {
        vector: Vec<f64>,
        calls: AtomicU32,
    }

    impl FixedEmbedder {
        fn new(vector: Vec<f64>) -> Self {
            Self {
                vector,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingModel for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f64>> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.vector.clone())
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    struct FixedStore {
        rows: Vec<PostRow>,
        calls: AtomicU32,
    }

    impl FixedStore {
        fn new(rows: Vec<PostRow>) -> Self {
            Self {
                rows,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl PostStore for FixedStore {
        async fn list_posts(&self, _limit: i64, _offset: i64) -> Result<PostPage> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(PostPage {
                total: self.rows.len() as u64,
                rows: self.rows.clone(),
            })
        }
    }

    struct FailingStore;

    #[async_trait]
    impl PostStore for FailingStore {
        async fn list_posts(&self, _limit: i64, _offset: i64) -> Result<PostPage> {
            Err(BloglensError::StoreError("connection refused".to_string()))
        }
    }

    fn row(id: &str, embedding: EmbeddingData) -> PostRow {
        PostRow::new(id, format!("Post {id}"), "content").with_embedding(embedding)
    }

    fn search_with(
        embedder: Arc<FixedEmbedder>,
        store: Arc<FixedStore>,
    ) -> SemanticSearch {
        SemanticSearch::new(embedder, store, SearchConfig::default())
    }

    #[tokio::test]
    async fn test_results_sorted_and_thresholded() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0]));
        let store = Arc::new(FixedStore::new(vec![
            row("far", EmbeddingData::Vector(vec![0.0, 1.0])),
            row("exact", EmbeddingData::Vector(vec![1.0, 0.0])),
            row("close", EmbeddingData::Vector(vec![1.0, 0.2])),
        ]));
        let search = search_with(embedder, store);

        let results = search
            .search(&SearchRequest::new("query").with_threshold(0.5))
            .await
            .unwrap();

        let ids: Vec<&str> = results.rows.iter().map(|r| r.post.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "close"]);
        assert_eq!(results.length, 2);
        assert!(results.rows.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(results.rows.iter().all(|r| r.similarity >= 0.5));
    }

    #[tokio::test]
    async fn test_threshold_one_matches_only_exact() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0]));
        let store = Arc::new(FixedStore::new(vec![
            row("close", EmbeddingData::Vector(vec![1.0, 0.1])),
        ]));
        let search = search_with(embedder, store);

        let results = search
            .search(&SearchRequest::new("query").with_threshold(1.0))
            .await
            .unwrap();

        assert_eq!(results.length, 0);
        assert!(results.rows.is_empty());
    }

    #[tokio::test]
    async fn test_string_and_native_embeddings_score_identically() {
        let embedder = Arc::new(FixedEmbedder::new(vec![0.6, 0.8]));
        let store = Arc::new(FixedStore::new(vec![
            row("native", EmbeddingData::Vector(vec![0.8, 0.6])),
            row("encoded", EmbeddingData::Json("[0.8, 0.6]".to_string())),
        ]));
        let search = search_with(embedder, store);

        let results = search
            .search(&SearchRequest::new("query").with_threshold(0.0))
            .await
            .unwrap();

        assert_eq!(results.rows.len(), 2);
        assert_eq!(results.rows[0].similarity, results.rows[1].similarity);
    }

    #[tokio::test]
    async fn test_rows_with_unusable_embeddings_are_skipped() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0]));
        let store = Arc::new(FixedStore::new(vec![
            row("mismatched", EmbeddingData::Vector(vec![1.0, 0.0, 0.0])),
            PostRow::new("bare", "No embedding", "content"),
            row("good", EmbeddingData::Vector(vec![1.0, 0.0])),
        ]));
        let search = search_with(embedder, store);

        let results = search
            .search(&SearchRequest::new("query").with_threshold(0.0))
            .await
            .unwrap();

        let ids: Vec<&str> = results.rows.iter().map(|r| r.post.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
    }

    #[tokio::test]
    async fn test_malformed_embedding_string_is_fatal() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0]));
        let store = Arc::new(FixedStore::new(vec![
            row("broken", EmbeddingData::Json("not json".to_string())),
        ]));
        let search = search_with(embedder, store);

        let result = search.search(&SearchRequest::new("query")).await;
        assert!(matches!(result, Err(BloglensError::StoreError(_))));
    }

    #[tokio::test]
    async fn test_defaults_applied_when_unset() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0]));
        let store = Arc::new(FixedStore::new(vec![]));
        let search = search_with(embedder, store);

        let results = search.search(&SearchRequest::new("query")).await.unwrap();

        assert_eq!(results.limit, 1000);
        assert_eq!(results.offset, 0);
        assert_eq!(results.threshold, 0.5);
        assert_eq!(results.query, "query");
    }

    #[tokio::test]
    async fn test_invalid_params_stop_before_any_upstream_call() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0]));
        let store = Arc::new(FixedStore::new(vec![]));
        let search = SemanticSearch::new(embedder.clone(), store.clone(), SearchConfig::default());

        let invalid = [
            SearchRequest::new(""),
            SearchRequest::new("   "),
            SearchRequest::new("q").with_limit(0),
            SearchRequest::new("q").with_limit(-5),
            SearchRequest::new("q").with_offset(-1),
            SearchRequest::new("q").with_threshold(1.5),
            SearchRequest::new("q").with_threshold(-0.1),
        ];

        for request in invalid {
            let result = search.search(&request).await;
            assert!(matches!(result, Err(BloglensError::InvalidParameter(_))));
        }

        assert_eq!(embedder.calls.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(store.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let embedder = Arc::new(FixedEmbedder::new(vec![1.0]));
        let search =
            SemanticSearch::new(embedder, Arc::new(FailingStore), SearchConfig::default());

        let result = search.search(&SearchRequest::new("query")).await;
        assert!(matches!(result, Err(BloglensError::StoreError(_))));
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = validate_search_request(&SearchRequest::new("q").with_limit(0)).unwrap_err();
        assert_eq!(err.to_string(), "Limit must be a positive number");

        let err = validate_search_request(&SearchRequest::new("q").with_offset(-1)).unwrap_err();
        assert_eq!(err.to_string(), "Offset must be a non-negative number");

        let err =
            validate_search_request(&SearchRequest::new("q").with_threshold(2.0)).unwrap_err();
        assert_eq!(err.to_string(), "Threshold must be between 0 and 1");

        let err = validate_search_request(&SearchRequest::new(" ")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query parameter is required and cannot be empty"
        );
    }
}
