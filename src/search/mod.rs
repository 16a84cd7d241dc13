pub mod candidates;
pub mod extractor;
pub mod reconciler;
pub mod reranker;

pub use candidates::{build_candidates, Candidate, DEFAULT_DISTANCE_WEIGHT};
pub use extractor::{extract_json_array, parse_reranked_items, RerankedItem};
pub use reconciler::{reconcile, SearchOutcome, SearchResult};
pub use reranker::{build_rerank_prompt, rerank_candidates, CompletionBackend};

use crate::api_connection::connection::ApiConnectionError;
use crate::catalog::{Product, Vendor};
use crate::geo::Coordinate;

/// Run the full search pipeline: candidate building, AI re-ranking, JSON
/// extraction, reconciliation. Sequential, one completion call, no shared
/// state; the catalog slices are treated as an immutable snapshot.
///
/// Transport failures from the completion call are the only errors; every
/// other degradation (no candidates, unusable model output, dropped items)
/// is reported through the [`SearchOutcome`] fields.
pub async fn smart_search(
    backend: &impl CompletionBackend,
    products: &[Product],
    vendors: &[Vendor],
    origin: Coordinate,
    search_query: &str,
    distance_weight: f64,
) -> Result<SearchOutcome, ApiConnectionError> {
    let candidates = build_candidates(products, vendors, origin, distance_weight);
    if candidates.is_empty() {
        tracing::info!("no rankable candidates for query '{}'", search_query);
        return Ok(SearchOutcome::default());
    }

    let response = rerank_candidates(backend, &candidates, search_query).await?;
    let items = parse_reranked_items(&extract_json_array(&response));
    if items.is_empty() {
        tracing::warn!(
            "model reply yielded no usable items for query '{}' ({} candidates)",
            search_query,
            candidates.len()
        );
    }

    let (results, dropped_items) = reconcile(&items, &candidates);
    if dropped_items > 0 {
        tracing::warn!("{} reranked item(s) did not match any candidate", dropped_items);
    }

    Ok(SearchOutcome {
        results,
        candidate_count: candidates.len(),
        dropped_items,
    })
}
