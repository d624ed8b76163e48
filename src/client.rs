//! HTTP client for the payments backend.
//!
//! Every call targets the same base origin. No auth headers, retries or
//! timeouts are configured beyond the reqwest defaults.

use crate::errors::ClientError;
use crate::models::{CsvFile, ErrorBody, MessageResponse, PaymentStatistics, UploadResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

#[derive(Clone, Debug)]
pub struct PaymentClient {
    client: Client,
    base_url: String,
}

impl PaymentClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /upload` with the CSV under the multipart field `file`.
    pub async fn upload(&self, file: &CsvFile) -> Result<UploadResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn payment_stats(&self) -> Result<PaymentStatistics, ClientError> {
        let response = self.client.get(self.url("/payment-stats")).send().await?;
        decode(response).await
    }

    /// `POST /send-reminders` with an empty JSON object.
    pub async fn send_reminders(&self) -> Result<MessageResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/send-reminders"))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        decode(response).await
    }

    /// Connectivity check against `GET /test`.
    pub async fn check_connection(&self) -> Result<MessageResponse, ClientError> {
        let response = self.client.get(self.url("/test")).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.json::<ErrorBody>().await?;
    Err(ClientError::Status { status, body })
}
