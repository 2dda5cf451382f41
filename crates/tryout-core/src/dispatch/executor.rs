//! Execute form sends by making HTTP requests

use std::time::Duration;

use openapi_parser::HttpMethod;
use reqwest::{Client, Method};
use tracing::{debug, info};

use super::plan::RequestPlan;
use super::response::ResponseSnapshot;
use crate::error::{FormError, FormResult};
use crate::form::SendTicket;
use crate::settings::Settings;

/// Sends requests built from form snapshots
pub struct Dispatcher {
    /// HTTP client
    client: Client,
    /// Request defaults
    settings: Settings,
}

impl Dispatcher {
    /// Create a dispatcher; a timeout is only set when the settings ask for one
    pub fn new(settings: Settings) -> FormResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FormError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// Build the request plan for a ticket without sending it
    pub fn plan(&self, ticket: &SendTicket) -> FormResult<RequestPlan> {
        RequestPlan::build(ticket, &self.settings)
    }

    /// Plan and execute one send. Single attempt, no retry.
    pub async fn send(&self, ticket: &SendTicket) -> FormResult<ResponseSnapshot> {
        let plan = self.plan(ticket)?;
        self.execute(&plan).await
    }

    /// Execute a plan and turn the response body into a snapshot
    pub async fn execute(&self, plan: &RequestPlan) -> FormResult<ResponseSnapshot> {
        let headers = plan.header_map()?;

        let mut request = self
            .client
            .request(to_reqwest_method(plan.method), plan.url.clone())
            .headers(headers);

        if let Some(body) = &plan.body {
            debug!("Request body: {}", body);
            request = request.json(body);
        }

        info!("Executing {} {}", plan.method, plan.url);

        let response = request
            .send()
            .await
            .map_err(|e| FormError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FormError::Http(format!("Failed to read response: {}", e)))?;

        debug!("Response status: {}", status);

        Ok(ResponseSnapshot::from_body(status.as_u16(), &text))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}
