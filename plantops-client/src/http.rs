//! HTTP data service
//!
//! Every exchange is a `POST` of a [`DataRequest`] to one endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::data::{DataRequest, DataResponse, WriteOp};
use shared::models::Record;

use crate::{ClientConfig, ClientError, ClientResult, DataService};

/// Data service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpDataService {
    /// Create a new HTTP data service from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send<T: DeserializeOwned>(&self, request: &DataRequest) -> ClientResult<DataResponse<T>> {
        tracing::debug!(
            action = ?request.action,
            partition = %request.partition,
            "data service request"
        );

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(auth) = self.auth_header() {
            builder = builder.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // A rejection envelope on an error status is still a business answer
            if let Ok(envelope) = serde_json::from_str::<DataResponse<T>>(&text)
                && !envelope.success
            {
                return Ok(envelope);
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "partition {}: {} ({} bytes)",
                request.partition,
                e,
                text.len()
            ))
        })
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn read(&self, partition: &str) -> ClientResult<DataResponse<Vec<Record>>> {
        self.send(&DataRequest::read(partition)).await
    }

    async fn write(
        &self,
        partition: &str,
        op: WriteOp,
        payload: &Record,
    ) -> ClientResult<DataResponse<Record>> {
        self.send(&DataRequest::write(partition, op, payload.clone()))
            .await
    }
}
