//! HTTP prediction clients.
//!
//! Each client issues exactly one `GET <base_url>?name=<name>` per call and
//! extracts a single best-guess value. No retries, no caching: any failure
//! surfaces as `Error::PredictionUnavailable`.

use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::types::{AgeResponse, GenderResponse, NationalityResponse};
use people_core::{Error, RequestContext, Result};

/// A name-based guess of one attribute.
pub trait Predictor: Send + Sync {
    type Output: Send;

    fn predict(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// One lookup-by-name endpoint. Shares the underlying connection pool with
/// every other clone of the same `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    base_url: String,
    service: &'static str,
}

impl LookupClient {
    pub fn new(http: Client, base_url: impl Into<String>, service: &'static str) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            service,
        }
    }

    /// Query the endpoint for `name` and decode the JSON body as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, ctx: &RequestContext, name: &str) -> Result<T> {
        ctx.ensure_active()?;
        debug!("Querying {} at {} for {:?}", self.service, self.base_url, name);

        let request = self
            .http
            .get(&self.base_url)
            .query(&[("name", name)])
            .send();
        let response = tokio::select! {
            _ = ctx.cancelled() => return Err(Error::Cancelled),
            result = request => result.map_err(|e| self.unavailable(name, format!("request failed: {}", e)))?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.unavailable(name, format!("status {}: {}", status, body)));
        }

        let body = tokio::select! {
            _ = ctx.cancelled() => return Err(Error::Cancelled),
            result = response.bytes() => result.map_err(|e| self.unavailable(name, format!("read failed: {}", e)))?,
        };

        serde_json::from_slice(&body)
            .map_err(|e| self.unavailable(name, format!("malformed response: {}", e)))
    }

    fn unavailable(&self, name: &str, reason: String) -> Error {
        error!("{} lookup for {:?} failed: {}", self.service, name, reason);
        Error::PredictionUnavailable(format!("{}: {}", self.service, reason))
    }
}

/// Age guess (agify).
#[derive(Debug, Clone)]
pub struct AgeClient {
    lookup: LookupClient,
}

impl AgeClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            lookup: LookupClient::new(http, base_url, "agify"),
        }
    }
}

impl Predictor for AgeClient {
    type Output = u32;

    /// Unknown names (`"age": null`) are reported as 0.
    async fn predict(&self, ctx: &RequestContext, name: &str) -> Result<u32> {
        let response: AgeResponse = self.lookup.fetch(ctx, name).await?;
        let age = response.age.unwrap_or(0);
        debug!("Received age {} for name {}", age, name);
        Ok(age)
    }
}

/// Gender guess (genderize).
#[derive(Debug, Clone)]
pub struct GenderClient {
    lookup: LookupClient,
}

impl GenderClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            lookup: LookupClient::new(http, base_url, "genderize"),
        }
    }
}

impl Predictor for GenderClient {
    type Output = String;

    async fn predict(&self, ctx: &RequestContext, name: &str) -> Result<String> {
        let response: GenderResponse = self.lookup.fetch(ctx, name).await?;
        let gender = response.gender.unwrap_or_default();
        debug!("Received gender {:?} for name {}", gender, name);
        Ok(gender)
    }
}

/// Nationality guess (nationalize).
#[derive(Debug, Clone)]
pub struct NationalityClient {
    lookup: LookupClient,
}

impl NationalityClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            lookup: LookupClient::new(http, base_url, "nationalize"),
        }
    }
}

impl Predictor for NationalityClient {
    type Output = String;

    async fn predict(&self, ctx: &RequestContext, name: &str) -> Result<String> {
        let response: NationalityResponse = self.lookup.fetch(ctx, name).await?;
        let nationality = response.best_guess();
        if nationality.is_empty() {
            debug!("No country data for name {}", name);
        } else {
            debug!("Received country {} for name {}", nationality, name);
        }
        Ok(nationality)
    }
}
