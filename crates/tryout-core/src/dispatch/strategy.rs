//! Request-building strategies keyed by method and body media type

use openapi_parser::HttpMethod;
use tracing::warn;

/// Body media type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Operation declares no request body
    Absent,
    /// `application/json` or a `+json` suffix type
    Json,
    /// Anything else
    Other,
}

impl MediaKind {
    pub fn classify(media_type: Option<&str>) -> Self {
        let Some(media_type) = media_type else {
            return MediaKind::Absent;
        };

        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            MediaKind::Json
        } else {
            MediaKind::Other
        }
    }
}

/// How a request is assembled from form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStrategy {
    /// Path, query, header and cookie fields only; body fields are not sent
    QueryOnly,
    /// As `QueryOnly`, plus body fields serialized as a JSON object
    JsonBody,
}

const STRATEGY_TABLE: &[(HttpMethod, MediaKind, RequestStrategy)] = &[
    (HttpMethod::Get, MediaKind::Absent, RequestStrategy::QueryOnly),
    (HttpMethod::Get, MediaKind::Json, RequestStrategy::QueryOnly),
    (HttpMethod::Delete, MediaKind::Absent, RequestStrategy::QueryOnly),
    (HttpMethod::Delete, MediaKind::Json, RequestStrategy::QueryOnly),
    (HttpMethod::Post, MediaKind::Absent, RequestStrategy::QueryOnly),
    (HttpMethod::Post, MediaKind::Json, RequestStrategy::JsonBody),
    (HttpMethod::Put, MediaKind::Absent, RequestStrategy::QueryOnly),
    (HttpMethod::Put, MediaKind::Json, RequestStrategy::JsonBody),
    (HttpMethod::Patch, MediaKind::Absent, RequestStrategy::QueryOnly),
    (HttpMethod::Patch, MediaKind::Json, RequestStrategy::JsonBody),
];

/// Pick the strategy for a method/media pair.
///
/// Pairs missing from the table (non-JSON bodies) are sent without a body.
pub fn strategy_for(method: HttpMethod, media: MediaKind) -> RequestStrategy {
    STRATEGY_TABLE
        .iter()
        .find(|(m, k, _)| *m == method && *k == media)
        .map(|(_, _, strategy)| *strategy)
        .unwrap_or_else(|| {
            warn!(
                "No request strategy for {} with {:?} body, body fields will not be sent",
                method, media
            );
            RequestStrategy::QueryOnly
        })
}
