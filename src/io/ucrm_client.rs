//! UCRM billing system client
//!
//! Queries clients and invoices for matching and posts payments through the
//! UCRM REST API (`{url}/api/v{version}`), authenticated with an app key.

use crate::core::{BillingApi, QueryFilter};
use crate::types::{ClientRecord, InvoiceRecord, Payment, SyncError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const APP_KEY_HEADER: &str = "X-Auth-App-Key";

/// HTTP client for the UCRM API
pub struct UcrmClient {
    client: Client,
    api_base: String,
    app_key: String,
}

impl UcrmClient {
    /// Creates a new UcrmClient for `{api_url}/api/v{api_version}`
    pub fn new(
        api_url: &str,
        api_version: &str,
        app_key: &str,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(UcrmClient {
            client,
            api_base: format!("{}/api/v{}", api_url.trim_end_matches('/'), api_version),
            app_key: app_key.to_string(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Content-Type", "application/json")
            .header(APP_KEY_HEADER, &self.app_key)
    }

    fn query<T: DeserializeOwned>(
        &self,
        resource: &str,
        filter: &QueryFilter,
    ) -> Result<Vec<T>, SyncError> {
        let url = format!("{}/{}", self.api_base, resource);
        debug!(%url, ?filter, "Querying billing system");

        let response = self
            .request(self.client.get(&url).query(filter))
            .send()
            .map_err(SyncError::billing_query)?;
        let response = ensure_success(response).map_err(SyncError::billing_query)?;

        response
            .json()
            .map_err(|e| SyncError::billing_query(format!("Invalid {} response: {}", resource, e)))
    }
}

impl BillingApi for UcrmClient {
    fn query_clients(&self, filter: &QueryFilter) -> Result<Vec<ClientRecord>, SyncError> {
        self.query("clients", filter)
    }

    fn query_invoices(&self, filter: &QueryFilter) -> Result<Vec<InvoiceRecord>, SyncError> {
        self.query("invoices", filter)
    }

    fn create_payment(&self, payment: &Payment) -> Result<(), SyncError> {
        let url = format!("{}/payments", self.api_base);

        let response = self
            .request(self.client.post(&url).json(payment))
            .send()
            .map_err(|e| SyncError::posting(&payment.provider_payment_id, e))?;
        ensure_success(response)
            .map_err(|message| SyncError::posting(&payment.provider_payment_id, message))?;

        Ok(())
    }
}

/// Turn a non-2xx response into a message carrying status and body
fn ensure_success(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    if body.trim().is_empty() {
        Err(format!("HTTP {}", status))
    } else {
        Err(format!("HTTP {}: {}", status, body.trim()))
    }
}
