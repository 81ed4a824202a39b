//! Retrying PageSpeed client.

use std::sync::Arc;

use crate::error::{ErrorType, PsiError};
use crate::http::{HttpClient, HttpRequest};
use crate::retry::{
    classify_response, classify_status, classify_transport, run_with_retry, ClassifiedError,
    RetryPolicy,
};

use super::request::{build_request_url, redact_key, RequestConfig};
use super::response::PageSpeedResponse;

/// Issues PageSpeed requests with classification and exponential backoff.
#[derive(Clone)]
pub struct PageSpeedClient {
    http: Arc<dyn HttpClient>,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for PageSpeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSpeedClient")
            .field("endpoint", &self.endpoint)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl PageSpeedClient {
    /// Fails with [`PsiError::MissingApiKey`] when `api_key` is blank.
    pub fn new(
        http: Arc<dyn HttpClient>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        retry: RetryPolicy,
    ) -> Result<Self, PsiError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(PsiError::MissingApiKey);
        }
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
            retry,
        })
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    /// Runs one analysis, retrying retryable failures.
    ///
    /// Blocks the current thread (network and backoff sleeps); call from
    /// `spawn_blocking` if used from async code.
    pub fn run(&self, config: &RequestConfig) -> Result<PageSpeedResponse, ClassifiedError> {
        let url = build_request_url(&self.endpoint, config, &self.api_key)
            .map_err(|e| ClassifiedError::new(ErrorType::ApiError, e.to_string(), None).exhausted())?;
        let policy = match config.retry_attempts {
            Some(n) => self.retry.with_max_retries(n),
            None => self.retry,
        };
        let request = HttpRequest::get(url.as_str(), config.timeout);
        tracing::debug!(
            target_url = %config.url,
            strategy = %config.strategy,
            request = %redact_key(&url),
            "pagespeed request"
        );

        run_with_retry(&policy, |attempt| {
            let result = self.attempt_once(&request);
            if let Err(ref e) = result {
                tracing::warn!(
                    target_url = %config.url,
                    strategy = %config.strategy,
                    attempt,
                    error = %e,
                    "pagespeed attempt failed"
                );
            }
            result
        })
    }

    fn attempt_once(&self, request: &HttpRequest) -> Result<PageSpeedResponse, ClassifiedError> {
        let response = self
            .http
            .execute(request)
            .map_err(|e| classify_transport(&e))?;
        if !response.is_success() {
            return Err(classify_response(&response));
        }

        let decoded: PageSpeedResponse = serde_json::from_slice(&response.body).map_err(|e| {
            ClassifiedError::new(
                ErrorType::Unknown,
                format!("Malformed response: {}", e),
                Some(response.status),
            )
        })?;

        let Some(lighthouse) = decoded.lighthouse_result.as_ref() else {
            return Err(ClassifiedError::new(
                ErrorType::Unknown,
                "Malformed response: missing lighthouseResult",
                Some(response.status),
            ));
        };

        if let Some(rt) = lighthouse.runtime_error.as_ref() {
            if rt.code != "NO_ERROR" {
                let message = rt.message.clone().unwrap_or_else(|| rt.code.clone());
                let kind = match classify_status(response.status, &rt.code) {
                    ErrorType::Unknown => classify_status(response.status, &message),
                    other => other,
                };
                return Err(ClassifiedError::new(
                    kind,
                    format!("Lighthouse runtime error {}: {}", rt.code, message),
                    Some(response.status),
                ));
            }
        }

        Ok(decoded)
    }
}
