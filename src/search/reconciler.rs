use std::collections::HashMap;

use super::candidates::Candidate;
use super::extractor::RerankedItem;

/// One entry of the final ranking. Display fields keep the model's literal
/// formatting; the score is the candidate's deterministic one.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub product_name: String,
    pub company_name: String,
    pub company_address: String,
    pub price: f64,
    pub distance_km: f64,
    pub score: f64,
}

/// Outcome of one search invocation.
///
/// `candidate_count` lets callers tell "no candidates existed" apart from
/// "candidates existed but the AI output was unusable": both yield empty
/// `results`, but only the former has `candidate_count == 0`.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub candidate_count: usize,
    pub dropped_items: usize,
}

/// Map each AI item back to its canonical candidate by an exact,
/// case-sensitive (name, company) key. Unmatched items are hallucinated or
/// mis-copied and are dropped, not fabricated into synthetic candidates.
/// The surviving results are ordered ascending by deterministic score; the
/// AI contributes inclusion, the score contributes ordering.
pub fn reconcile(items: &[RerankedItem], candidates: &[Candidate]) -> (Vec<SearchResult>, usize) {
    let by_key: HashMap<(&str, &str), &Candidate> = candidates
        .iter()
        .map(|c| ((c.product.name.as_str(), c.vendor.name.as_str()), c))
        .collect();

    let mut results = Vec::new();
    let mut dropped = 0usize;
    for item in items {
        match by_key.get(&(item.name.as_str(), item.company.as_str())) {
            Some(candidate) => results.push(SearchResult {
                product_name: item.name.clone(),
                company_name: item.company.clone(),
                company_address: candidate.vendor.address.clone(),
                price: item.price,
                distance_km: item.distance,
                score: candidate.score,
            }),
            None => {
                tracing::warn!(
                    "dropping reranked item with no matching candidate: '{}' / '{}'",
                    item.name,
                    item.company
                );
                dropped += 1;
            }
        }
    }

    results.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
    (results, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, Vendor};
    use crate::geo::Coordinate;

    fn candidate(name: &str, company: &str, score: f64) -> Candidate {
        Candidate {
            product: Product {
                id: 1,
                name: name.to_string(),
                price: score,
                vendor_id: 1,
            },
            vendor: Vendor {
                id: 1,
                name: company.to_string(),
                address: format!("{} street 1", company),
                location: Some(Coordinate::new(55.0, 37.0)),
            },
            distance_km: 0.0,
            score,
        }
    }

    fn item(name: &str, company: &str) -> RerankedItem {
        RerankedItem {
            name: name.to_string(),
            company: company.to_string(),
            price: 1.0,
            distance: 2.0,
        }
    }

    #[test]
    fn test_unmatched_items_are_dropped_and_counted() {
        let candidates = vec![candidate("Milk", "Dairy Corner", 80.0)];
        let items = vec![item("Milk", "Dairy Corner"), item("Mikl", "Dairy Corner")];

        let (results, dropped) = reconcile(&items, &candidates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_name, "Milk");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_key_match_is_case_sensitive() {
        let candidates = vec![candidate("Milk", "Dairy Corner", 80.0)];
        let items = vec![item("milk", "Dairy Corner")];

        let (results, dropped) = reconcile(&items, &candidates);
        assert!(results.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_final_order_is_by_deterministic_score_not_ai_order() {
        let candidates = vec![candidate("A", "Shop", 50.0), candidate("B", "Shop", 20.0)];
        // AI returned A before B; the deterministic score says B first.
        let items = vec![item("A", "Shop"), item("B", "Shop")];

        let (results, _) = reconcile(&items, &candidates);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product_name, "B");
        assert_eq!(results[1].product_name, "A");
    }

    #[test]
    fn test_matched_items_keep_ai_display_fields_and_restore_score() {
        let candidates = vec![candidate("Milk", "Dairy Corner", 92.3)];
        let items = vec![RerankedItem {
            name: "Milk".to_string(),
            company: "Dairy Corner".to_string(),
            price: 79.9,
            distance: 1.23,
        }];

        let (results, _) = reconcile(&items, &candidates);
        assert_eq!(results[0].price, 79.9);
        assert_eq!(results[0].distance_km, 1.23);
        assert_eq!(results[0].score, 92.3);
        assert_eq!(results[0].company_address, "Dairy Corner street 1");
    }

    #[test]
    fn test_empty_ai_list_reconciles_to_empty() {
        let candidates = vec![candidate("Milk", "Dairy Corner", 80.0)];
        let (results, dropped) = reconcile(&[], &candidates);
        assert!(results.is_empty());
        assert_eq!(dropped, 0);
    }
}
