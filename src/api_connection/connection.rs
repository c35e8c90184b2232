use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::Duration;

#[derive(Debug)]
pub enum ApiConnectionError {
    MissingApiKey(String),
    NetworkError(reqwest::Error),
    SerializationError(serde_json::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    Timeout(Duration),
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::MissingApiKey(key_name) => {
                write!(f, "API key not found in environment: {}", key_name)
            }
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
            ApiConnectionError::Timeout(limit) => {
                write!(f, "Request timed out after {:?}", limit)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            ApiConnectionError::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ApiConnectionError::NetworkError(err)
    }
}

impl From<serde_json::Error> for ApiConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ApiConnectionError::SerializationError(err)
    }
}

pub fn build_http_client(timeout: Duration) -> Result<Client, ApiConnectionError> {
    let app_name = std::env::var("APP_NAME").unwrap_or_else(|_| "FoodScanner".to_string());
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(format!("{}/{}", app_name, env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Runs `request` but gives up after `limit`, whatever the client's own
/// timeout says.
pub async fn with_timeout<T, F>(limit: Duration, request: F) -> Result<T, ApiConnectionError>
where
    F: Future<Output = Result<T, ApiConnectionError>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(ApiConnectionError::Timeout(limit)),
    }
}

/// Decodes a successful JSON body, or turns a non-2xx reply into `ApiError`.
pub async fn read_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ApiConnectionError> {
    if response.status().is_success() {
        let body = response.text().await?;
        Ok(serde_json::from_str::<T>(&body)?)
    } else {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(ApiConnectionError::ApiError { status, error_body })
    }
}
