//! Recognition API Client
//!
//! HTTP client for the single POST endpoint behind the kiosk. The payload
//! shape selects the operation: a bare base64 body is a capture, JSON bodies
//! are registrations or record queries.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{
    CaptureResponse, RecordsQuery, RecordsResponse, RegistrationRequest, RegistrationResponse,
};
use super::error::{ClientError, ClientResult};
use crate::config::ApiConfig;

/// Operations the kiosk needs from the recognition service
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// Match a face and mark attendance
    async fn capture(&self, image_base64: &str) -> ClientResult<CaptureResponse>;

    /// Register a new face
    async fn register(&self, request: &RegistrationRequest) -> ClientResult<RegistrationResponse>;

    /// Everyone's records (passkey gated)
    async fn get_attendance(&self, passkey: &str) -> ClientResult<RecordsResponse>;

    /// One employee's records
    async fn get_employee_attendance(&self, employee_id: &str) -> ClientResult<RecordsResponse>;
}

/// reqwest-backed client for the recognition endpoint
pub struct AttendanceClient {
    client: Client,
    url: String,
}

impl AttendanceClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build().map_err(ClientError::Request)?,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and decode a JSON reply, mapping non-2xx to an error
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, op: &str) -> ClientResult<T> {
        tracing::debug!(op, url = %self.url, "Sending request");

        let response = request.send().await.map_err(classify)?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(op, status = status.as_u16(), "Recognition API returned an error");
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(op, error = %e, "Undecodable response body");
            ClientError::Decode(e.to_string())
        })
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

#[async_trait]
impl AttendanceApi for AttendanceClient {
    async fn capture(&self, image_base64: &str) -> ClientResult<CaptureResponse> {
        let request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(image_base64.to_string());

        self.send(request, "capture").await
    }

    async fn register(&self, request: &RegistrationRequest) -> ClientResult<RegistrationResponse> {
        let request = self.client.post(&self.url).json(request);
        self.send(request, "register").await
    }

    async fn get_attendance(&self, passkey: &str) -> ClientResult<RecordsResponse> {
        let request = self.client.post(&self.url).json(&RecordsQuery::all(passkey));
        self.send(request, "get_attendance").await
    }

    async fn get_employee_attendance(&self, employee_id: &str) -> ClientResult<RecordsResponse> {
        let request = self
            .client
            .post(&self.url)
            .json(&RecordsQuery::employee(employee_id));
        self.send(request, "get_employee_attendance").await
    }
}
