//! Place extraction from the grounding/citation side-channel of a
//! maps-grounded model response.

use serde::Deserialize;
use serde_json::Value;

use crate::models::report::now_millis;
use crate::models::{ServiceKind, ServiceResult, ServiceSearchReport};

const DEFAULT_NARRATIVE: &str = "Here are the nearby services I found.";
const DEFAULT_TITLE: &str = "Unknown Business";

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    maps: Option<MapsPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapsPlace {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    place_answer_sources: Vec<PlaceAnswerSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceAnswerSource {
    #[serde(default)]
    review_snippets: Vec<String>,
}

/// Iterate the grounding chunks; keep entries carrying maps metadata with a
/// usable uri. Missing titles default, the snippet is the first review
/// snippet of the first answer source, and chunks that do not deserialize
/// are skipped rather than failing the whole response.
pub fn extract_places(chunks: &[Value]) -> Vec<ServiceResult> {
    chunks
        .iter()
        .filter_map(|raw| serde_json::from_value::<GroundingChunk>(raw.clone()).ok())
        .filter_map(|chunk| chunk.maps)
        .filter_map(|maps| {
            let uri = maps.uri.unwrap_or_default();
            if uri.is_empty() {
                return None;
            }
            let snippet = maps
                .place_answer_sources
                .first()
                .and_then(|source| source.review_snippets.first())
                .cloned();
            Some(ServiceResult {
                title: maps
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                uri,
                snippet,
            })
        })
        .collect()
}

/// Assemble the service report from the narrative text and grounding
/// chunks. Empty narrative text falls back to a fixed default.
pub fn build_service_report(
    kind: ServiceKind,
    text: &str,
    chunks: &[Value],
) -> ServiceSearchReport {
    ServiceSearchReport {
        kind,
        text: if text.trim().is_empty() {
            DEFAULT_NARRATIVE.to_string()
        } else {
            text.to_string()
        },
        places: extract_places(chunks),
        timestamp: now_millis(),
    }
}
