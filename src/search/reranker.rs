use std::fmt::Write as _;

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, Provider};

use super::candidates::Candidate;

const RERANK_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// The completion collaborator: one prompt in, one block of free text out.
/// The pipeline treats the reply as untrusted; validation happens downstream
/// in the extractor and reconciler.
pub trait CompletionBackend {
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ApiConnectionError>> + Send;
}

impl CompletionBackend for Provider {
    async fn complete(&self, prompt: &str) -> Result<String, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: RERANK_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(0.05),
            max_tokens: Some(2048),
        };

        let response = self.call_chat_completion(request).await?;
        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone()),
            None => Err(ApiConnectionError::ApiError {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                error_body: "No response choices received from API".to_string(),
            }),
        }
    }
}

/// Serialize the candidate set and the user's query into the ranking prompt.
/// One numbered block per candidate, distance fixed to two decimals.
pub fn build_rerank_prompt(candidates: &[Candidate], search_query: &str) -> String {
    let mut prompt = String::from(
        "You are a shopping assistant that understands typos and finds the best-value products.\n",
    );
    let _ = writeln!(prompt, "The user is searching for: {}", search_query);
    prompt.push_str("Here is the product list:\n");

    for (idx, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}) Name: {}\n   Company: {}\n   Price: {}\n   Distance: {:.2} km",
            idx + 1,
            candidate.product.name,
            candidate.vendor.name,
            candidate.product.price,
            candidate.distance_km,
        );
    }

    prompt.push_str(
        "\nSort the matching products from the best value and closest to the worst. \
         Account for typos and similar-looking words that mean the same item \
         (e.g. 'mikl' = 'milk'), and also include products that match in meaning \
         or belong to the same category (e.g. other dairy products) with low priority.\n\
         Return the result as JSON: an array of objects with the fields \
         name, company, price, distance.\n",
    );
    prompt
}

/// Submit the candidate set for AI re-ranking and return the model's raw
/// reply. Transport failures propagate untouched; retries are the caller's
/// concern.
pub async fn rerank_candidates(
    backend: &impl CompletionBackend,
    candidates: &[Candidate],
    search_query: &str,
) -> Result<String, ApiConnectionError> {
    let prompt = build_rerank_prompt(candidates, search_query);
    tracing::debug!("rerank prompt:\n{}", prompt);
    let response = backend.complete(&prompt).await?;
    tracing::debug!("raw model reply:\n{}", response);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, Vendor};
    use crate::geo::Coordinate;

    fn candidate(name: &str, company: &str, price: f64, distance_km: f64) -> Candidate {
        Candidate {
            product: Product {
                id: 1,
                name: name.to_string(),
                price,
                vendor_id: 1,
            },
            vendor: Vendor {
                id: 1,
                name: company.to_string(),
                address: "somewhere".to_string(),
                location: Some(Coordinate::new(55.0, 37.0)),
            },
            distance_km,
            score: price + distance_km * 10.0,
        }
    }

    #[test]
    fn test_prompt_contains_numbered_candidates_and_query() {
        let candidates = vec![
            candidate("Milk", "Dairy Corner", 79.9, 1.234),
            candidate("Bread", "Bakery", 45.0, 0.5),
        ];
        let prompt = build_rerank_prompt(&candidates, "milk");

        assert!(prompt.contains("The user is searching for: milk"));
        assert!(prompt.contains("1) Name: Milk"));
        assert!(prompt.contains("   Company: Dairy Corner"));
        assert!(prompt.contains("   Distance: 1.23 km"));
        assert!(prompt.contains("2) Name: Bread"));
        assert!(prompt.contains("name, company, price, distance"));
    }

    #[test]
    fn test_prompt_formats_distance_to_two_decimals() {
        let candidates = vec![candidate("Milk", "Shop", 80.0, 0.0)];
        let prompt = build_rerank_prompt(&candidates, "milk");
        assert!(prompt.contains("Distance: 0.00 km"));
    }
}
