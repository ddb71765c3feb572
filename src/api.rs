//! HTTP helpers for the identity provider and data API with consistent timeouts
//! and error handling. Feature clients use these helpers to avoid duplicating
//! request setup. The helpers never log request bodies or header values; they only
//! attach the API key and bearer tokens provided by callers.

use crate::{APP_USER_AGENT, config::AppConfig, errors::ApiError};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::LOCATION, redirect};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Shared client for one backend: base URL, public API key and a reqwest client.
/// Redirects are never followed so the OAuth authorize call can read `Location`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
}

impl ApiClient {
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Builds an absolute URL from the configured base and a path (query allowed).
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the joined value is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let url = build_url_with_base(self.base_url.as_str(), path);
        Url::parse(&url).map_err(|err| ApiError::Config(format!("Invalid endpoint {url}: {err}")))
    }

    fn request(&self, method: Method, url: Url, bearer: Option<&SecretString>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("apikey", self.api_key.expose_secret());

        match bearer {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Fetches JSON and fails on any non-success status.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, HTTP errors or undecodable bodies.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        bearer: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::GET, url, bearer)).await?;
        handle_json_response(response).await
    }

    /// Fetches JSON and returns `None` on 204 or 401.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, other HTTP errors or undecodable bodies.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        url: Url,
        bearer: Option<&SecretString>,
    ) -> Result<Option<T>, ApiError> {
        let response = send(self.request(Method::GET, url, bearer)).await?;
        handle_optional_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, HTTP errors or undecodable bodies.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::POST, url, bearer).json(body)).await?;
        handle_json_response(response).await
    }

    /// Posts an empty body and expects no response payload.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures or HTTP errors.
    pub async fn post_empty(&self, url: Url, bearer: Option<&SecretString>) -> Result<(), ApiError> {
        let response = send(self.request(Method::POST, url, bearer)).await?;
        handle_empty_response(response).await
    }

    /// Issues a GET that must answer with a redirect and returns its target.
    ///
    /// # Errors
    /// Returns an `ApiError` for transport failures, HTTP errors, a non-redirect
    /// success or a redirect without a usable `Location` header.
    pub async fn get_redirect(&self, url: Url) -> Result<Url, ApiError> {
        let response = send(self.request(Method::GET, url.clone(), None)).await?;
        handle_redirect_response(&url, response).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_decode() {
        ApiError::Parse(format!("Failed to decode response: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder.send().await.map_err(|err| map_request_error(&err))?;
    debug!(status = %response.status(), url = %response.url(), "response received");
    Ok(response)
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

/// Parses optional JSON responses and treats 204/401 as no session.
async fn handle_optional_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, ApiError> {
    match response.status() {
        StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => Ok(None),
        status if status.is_success() => response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}"))),
        _ => Err(http_error(response).await),
    }
}

async fn handle_redirect_response(request_url: &Url, response: Response) -> Result<Url, ApiError> {
    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Parse("Redirect response has no location.".to_string()))?;

        // Relative locations resolve against the request URL.
        return request_url
            .join(location)
            .map_err(|err| ApiError::Parse(format!("Invalid redirect location: {err}")));
    }

    if status.is_success() {
        return Err(ApiError::Parse(format!(
            "Expected a redirect, got status {status}."
        )));
    }

    Err(http_error(response).await)
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let (code, message) = describe_error_body(&body);
    ApiError::Http {
        status,
        code,
        message,
    }
}

/// Extracts a machine-readable error code and a human message from an error body.
/// Both auth (`error`, `error_code`, `msg`) and REST (`code`, `message`) shapes are
/// understood; anything else is surfaced as sanitized text.
fn describe_error_body(body: &str) -> (Option<String>, String) {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return (None, sanitize_body(body));
    };

    let code = ["error_code", "error", "code"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::to_string);
    let message = ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map_or_else(|| sanitize_body(body), sanitize_body);

    (code, message)
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
