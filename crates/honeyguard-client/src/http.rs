//! reqwest-backed implementation of [`SocApi`].

use std::time::Duration;

use async_trait::async_trait;
use honeyguard_schema::{IntelItem, ReportResult, StatsResponse};
use serde_json::Value;

use crate::{ClientError, SocApi};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8002";

pub const STATS_PATH: &str = "/stats";
pub const INTEL_PATH: &str = "/api/intel";
pub const REPORT_PATH: &str = "/api/report";

#[derive(Debug, Clone)]
pub struct HttpSocClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSocClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// `None` leaves requests without a deadline.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &'static str,
    ) -> Result<Value, ClientError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(endpoint, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

fn decode<T>(endpoint: &'static str, value: Value) -> Result<T, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| ClientError::Decode {
        endpoint,
        reason: e.to_string(),
    })
}

fn shape_error(endpoint: &'static str, expected: &str, value: &Value) -> ClientError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ClientError::Decode {
        endpoint,
        reason: format!("expected {expected}, found {found}"),
    }
}

#[async_trait]
impl SocApi for HttpSocClient {
    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let body = self
            .send(self.client.get(self.url(STATS_PATH)), STATS_PATH)
            .await?;
        if !body.is_object() {
            return Err(shape_error(STATS_PATH, "object", &body));
        }
        decode(STATS_PATH, body)
    }

    async fn intel(&self) -> Result<Vec<IntelItem>, ClientError> {
        let body = self
            .send(self.client.get(self.url(INTEL_PATH)), INTEL_PATH)
            .await?;
        if !body.is_array() {
            return Err(shape_error(INTEL_PATH, "array", &body));
        }
        decode(INTEL_PATH, body)
    }

    async fn report(&self) -> Result<ReportResult, ClientError> {
        let body = self
            .send(self.client.post(self.url(REPORT_PATH)), REPORT_PATH)
            .await?;
        if !body.is_object() {
            return Err(shape_error(REPORT_PATH, "object", &body));
        }
        decode(REPORT_PATH, body)
    }
}
