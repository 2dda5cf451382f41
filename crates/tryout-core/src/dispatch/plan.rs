//! Request plans assembled from a send snapshot

use std::sync::OnceLock;

use indexmap::IndexMap;
use openapi_parser::HttpMethod;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::strategy::{strategy_for, MediaKind, RequestStrategy};
use crate::error::{FormError, FormResult};
use crate::field::FieldLocation;
use crate::form::SendTicket;
use crate::settings::Settings;

const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters that would end or split a cookie-pair
const COOKIE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'\\');

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{[^{}/]+\}").expect("placeholder pattern is valid"))
}

/// A fully assembled outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    /// HTTP method, always the descriptor's own
    pub method: HttpMethod,
    /// Strategy the plan was built with
    pub strategy: RequestStrategy,
    /// Target URL including the query string
    pub url: Url,
    /// Query parameters, last write wins
    pub query: IndexMap<String, String>,
    /// Headers after defaults were overridden by header fields
    pub headers: IndexMap<String, String>,
    /// JSON body for body-carrying strategies
    pub body: Option<Value>,
}

impl RequestPlan {
    /// Build the plan for a send snapshot.
    ///
    /// Blank fields are not transmitted. Required fields cannot be blank
    /// here since the ticket was issued after validation passed.
    pub fn build(ticket: &SendTicket, settings: &Settings) -> FormResult<Self> {
        let strategy = strategy_for(
            ticket.method,
            MediaKind::classify(ticket.media_type.as_deref()),
        );

        let mut headers = IndexMap::new();
        set_header(&mut headers, "User-Agent", &settings.user_agent);
        set_header(&mut headers, "Accept", &settings.accept);

        let mut query = IndexMap::new();
        let mut cookies = Vec::new();
        let mut body = Map::new();
        let mut path = ticket.path.clone();

        for field in ticket.fields.iter().filter(|field| !field.is_blank()) {
            let (name, value) = (field.name.as_str(), field.value.as_str());
            match field.location {
                FieldLocation::Header => set_header(&mut headers, name, value),
                FieldLocation::Query => {
                    query.insert(name.to_string(), value.to_string());
                }
                FieldLocation::Path => {
                    let encoded = utf8_percent_encode(value, PATH_ENCODE_SET).to_string();
                    path = path.replace(&format!("{{{}}}", name), &encoded);
                }
                FieldLocation::Cookie => cookies.push(format!(
                    "{}={}",
                    name,
                    utf8_percent_encode(value, COOKIE_ENCODE_SET)
                )),
                FieldLocation::Body => match strategy {
                    RequestStrategy::JsonBody => {
                        body.insert(name.to_string(), Value::String(value.to_string()));
                    }
                    RequestStrategy::QueryOnly => {
                        debug!("Body field '{}' is not sent for {}", name, ticket.method);
                    }
                },
            }
        }

        if !cookies.is_empty() {
            if headers.keys().any(|name| name.eq_ignore_ascii_case("cookie")) {
                warn!("Cookie fields replace the Cookie header field");
            }
            set_header(&mut headers, "Cookie", &cookies.join("; "));
        }

        if let Some(unresolved) = placeholder_pattern().find(&path) {
            return Err(FormError::InvalidUrl(format!(
                "path parameter {} has no value",
                unresolved.as_str()
            )));
        }

        let target = format!("{}{}", ticket.server.trim_end_matches('/'), path);
        let mut url =
            Url::parse(&target).map_err(|e| FormError::InvalidUrl(format!("{}: {}", target, e)))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &query {
                pairs.append_pair(name, value);
            }
        }

        let body = (strategy == RequestStrategy::JsonBody).then_some(Value::Object(body));

        Ok(Self {
            method: ticket.method,
            strategy,
            url,
            query,
            headers,
            body,
        })
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Convert the headers for the HTTP client, rejecting invalid names or values
    pub fn header_map(&self) -> FormResult<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FormError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| FormError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

/// Insert a header, replacing any existing header of the same name regardless of case
fn set_header(headers: &mut IndexMap<String, String>, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}
