//! HTTP access to the ベトめしガイド backend.
//!
//! [`ApiClient::request`] is the only place that touches the network. The
//! façades in the submodules (`client.auth()`, `client.dish()`, ...) are thin
//! typed wrappers that pick the path, method and body.

pub mod auth;
pub mod dish;
pub mod favorite;
pub mod user;

use crate::error::ApiError;
use crate::session::Session;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use auth::AuthApi;
pub use dish::DishApi;
pub use favorite::FavoriteApi;
pub use user::UserApi;

/// Method, body and extra headers for one request. Defaults to a bodyless GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Vec<u8>>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for the backend. Holds the base URL and the session whose token is
/// attached to every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_http(Client::new(), base_url, session)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn dish(&self) -> DishApi<'_> {
        DishApi::new(self)
    }

    pub fn favorite(&self) -> FavoriteApi<'_> {
        FavoriteApi::new(self)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    /// Performs one request against `base_url + endpoint` and decodes the
    /// JSON response as `T`.
    ///
    /// Non-2xx responses become [`ApiError::Request`] with the best message the
    /// body offers. No retries; the caller decides whether to try again.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let method = options.method.clone();

        log::debug!("{} {}", method, url);
        let result = self.execute(&url, options).await;

        if let Err(err) = &result {
            log::error!("API error: {} ({} {})", err, method, url);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let headers = self.headers(options.headers)?;

        let mut builder = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        if !status.is_success() {
            // An unreadable body just means we fall back to the generic message.
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_failure(status, &body));
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(ApiError::InvalidBody)
    }

    /// Default JSON content type, then the caller's headers, then the bearer
    /// token. Later entries replace earlier ones with the same name.
    fn headers(&self, extra: HeaderMap) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(extra);

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}
