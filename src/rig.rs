//! HTTP client for the physical dispensing rig.
//!
//! One POST per confirmed order, no retries. The rig answers JSON; anything
//! non-2xx or unreachable is reported upward and merged into the chat reply
//! instead of failing the whole request.

use crate::dispense::DispensePayload;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RigClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Error)]
pub enum RigError {
    #[error("dispensing rig unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("dispensing rig returned HTTP {status}")]
    Http { status: u16 },
    #[error("dispensing rig response was not valid JSON: {0}")]
    BadResponse(#[source] reqwest::Error),
}

impl RigClient {
    /// `base_url` is `http://host:port`; the timeout bounds the whole
    /// request so a wedged rig cannot stall a chat turn indefinitely.
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/hacer_trago", base_url.trim_end_matches('/')),
        })
    }

    pub async fn send(&self, payload: &DispensePayload) -> Result<serde_json::Value, RigError> {
        debug!(endpoint = %self.endpoint, recipe = %payload.recipe_id, "sending dispense payload");
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RigError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.json().await.map_err(RigError::BadResponse)?;
        info!(recipe = %payload.recipe_id, total_ml = payload.total_ml, "rig accepted the order");
        Ok(body)
    }
}
