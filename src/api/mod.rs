//! REST client for the SkillPort marketplace backend
//!
//! Every endpoint answers with the same JSON envelope,
//! `{"success": bool, "message": string?, "data": any?}`. A response with
//! `success: false` is an error even when the HTTP status is 2xx, and the
//! server's `message` is kept so it can be shown to the user.

pub mod endpoints;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::{Category, NewCategory, Order, PaymentReceipt, ReviewRecord};

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api/v1";

/// Upper bound on a whole request, connect through body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when calling the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The backend answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Non-success HTTP status without a readable envelope
    #[error("Server responded with status {0}")]
    Status(StatusCode),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The endpoint needs a login token and none is configured
    #[error("You must be logged in to do that")]
    MissingToken,
}

impl ApiError {
    /// The server-supplied message, if the backend rejected the request
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct CapturePaymentBody<'a> {
    courses: &'a [String],
}

#[derive(Debug, Serialize)]
struct VerifyPaymentBody<'a> {
    #[serde(flatten)]
    receipt: &'a PaymentReceipt,
    courses: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentEmailBody<'a> {
    order_id: &'a str,
    payment_id: &'a str,
    amount: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnrollFreeBody<'a> {
    course_id: &'a str,
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Client for the marketplace REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL every endpoint path is appended to
    base_url: String,
    /// Bearer token for endpoints that need a logged-in user
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client against `base_url` with no login token
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: build_http_client(DEFAULT_REQUEST_TIMEOUT),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Replaces the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = build_http_client(timeout);
        self
    }

    /// Attaches a bearer token used for authenticated endpoints
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(builder.bearer_auth(token))
    }

    /// Sends a request and unwraps the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(ApiError::Status(status)),
            Err(err) => return Err(ApiError::ParseError(err.to_string())),
        };

        if !envelope.success || !status.is_success() {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            debug!(%status, %message, "backend rejected request");
            return Err(ApiError::Rejected(message));
        }

        Ok(envelope.data)
    }

    /// Fetches the review list shown in the carousel
    pub async fn fetch_reviews(&self) -> Result<Vec<ReviewRecord>, ApiError> {
        debug!("fetching reviews");
        let request = self.http_client.get(self.url(endpoints::REVIEWS_DETAILS));
        self.send(request)
            .await?
            .ok_or_else(|| ApiError::ParseError("review response has no data".to_string()))
    }

    /// Fetches every course category
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        debug!("fetching categories");
        let request = self.http_client.get(self.url(endpoints::SHOW_ALL_CATEGORIES));
        Ok(self.send(request).await?.unwrap_or_default())
    }

    /// Creates a category; requires a token
    pub async fn create_category(&self, category: &NewCategory) -> Result<(), ApiError> {
        debug!(name = %category.name, "creating category");
        let request = self.authorized(
            self.http_client
                .post(self.url(endpoints::CREATE_CATEGORY))
                .json(category),
        )?;
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Starts a checkout for `courses`
    ///
    /// Returns `None` when the backend enrolled the user directly because
    /// every course in the cart is free.
    pub async fn capture_payment(&self, courses: &[String]) -> Result<Option<Order>, ApiError> {
        debug!(count = courses.len(), "capturing payment");
        let request = self.authorized(
            self.http_client
                .post(self.url(endpoints::COURSE_PAYMENT))
                .json(&CapturePaymentBody { courses }),
        )?;
        self.send(request).await
    }

    /// Asks the backend to verify a gateway payment and enroll the user
    pub async fn verify_payment(
        &self,
        receipt: &PaymentReceipt,
        courses: &[String],
    ) -> Result<(), ApiError> {
        debug!(order_id = %receipt.razorpay_order_id, "verifying payment");
        let request = self.authorized(
            self.http_client
                .post(self.url(endpoints::COURSE_VERIFY))
                .json(&VerifyPaymentBody { receipt, courses }),
        )?;
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Requests the payment confirmation email
    pub async fn send_payment_success_email(
        &self,
        receipt: &PaymentReceipt,
        amount: u64,
    ) -> Result<(), ApiError> {
        let request = self.authorized(
            self.http_client
                .post(self.url(endpoints::SEND_PAYMENT_SUCCESS_EMAIL))
                .json(&PaymentEmailBody {
                    order_id: &receipt.razorpay_order_id,
                    payment_id: &receipt.razorpay_payment_id,
                    amount,
                }),
        )?;
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Enrolls the user in a free course
    pub async fn enroll_free_course(&self, course_id: &str) -> Result<(), ApiError> {
        debug!(%course_id, "enrolling in free course");
        let request = self.authorized(
            self.http_client
                .post(self.url(endpoints::ENROLL_FREE_COURSE))
                .json(&EnrollFreeBody { course_id }),
        )?;
        self.send::<serde_json::Value>(request).await?;
        Ok(())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
