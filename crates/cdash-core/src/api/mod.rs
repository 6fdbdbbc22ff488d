//! HTTP client for the creator dashboard API.
//!
//! Plain JSON over HTTP. When a token is set, every request carries
//! `Authorization: Bearer <token>`.

mod errors;
pub mod types;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

pub use errors::ApiError;
pub use types::{
    AggregateResponse, Analytics, LoginBonus, LoginResponse, ProfileUpdate,
    ProfileUpdateResponse, RegisterResponse, SaveFeedRequest, UserAccount,
};

use crate::auth::Role;
use crate::config::Config;
use crate::feed::{FeedItem, FeedSource};
use types::{
    AddCreditsRequest, ChangeRoleRequest, CreditsResponse, LoginRequest, RegisterRequest,
    ReportRequest,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::from_reqwest(&e))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        })
    }

    /// Creates a client from the effective config values.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(config.effective_api_base_url(), config.request_timeout())
    }

    /// Sets or clears the bearer token. Empty strings clear it.
    pub fn set_token(&mut self, token: Option<&str>) {
        self.token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.set_token(token);
        self
    }

    // ---- auth -------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { email, password };
        self.send_json(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<RegisterResponse> {
        let body = RegisterRequest {
            name,
            email,
            password,
        };
        self.send_json(self.request(Method::POST, "/auth/register").json(&body))
            .await
    }

    // ---- users & credits --------------------------------------------------

    pub async fn login_bonus(&self) -> ApiResult<LoginBonus> {
        self.get("/users/login-bonus").await
    }

    pub async fn profile(&self) -> ApiResult<UserAccount> {
        self.get("/users/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<ProfileUpdateResponse> {
        self.send_json(self.request(Method::PATCH, "/users/profile").json(update))
            .await
    }

    pub async fn credits(&self) -> ApiResult<i64> {
        let res: CreditsResponse = self.get("/credits").await?;
        Ok(res.credits)
    }

    // ---- feeds ------------------------------------------------------------

    pub async fn all_feeds(&self) -> ApiResult<Vec<FeedItem>> {
        self.get("/feed/all").await
    }

    pub async fn aggregate(&self, source: FeedSource) -> ApiResult<AggregateResponse> {
        self.get(&format!("/feed/aggregate/{}", source.as_str()))
            .await
    }

    pub async fn save_feed(&self, feed: &SaveFeedRequest<'_>) -> ApiResult<()> {
        self.send_empty(self.request(Method::POST, "/feed/save").json(feed))
            .await
    }

    pub async fn saved_feeds(&self) -> ApiResult<Vec<FeedItem>> {
        self.get("/feed/saved").await
    }

    pub async fn delete_saved(&self, feed_id: &str) -> ApiResult<()> {
        let path = format!("/feed/saved/{}", path_segment(feed_id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn report_feed(&self, feed_id: &str) -> ApiResult<()> {
        let body = ReportRequest { feed_id };
        self.send_empty(self.request(Method::POST, "/feed/report").json(&body))
            .await
    }

    // ---- admin ------------------------------------------------------------

    pub async fn users(&self) -> ApiResult<Vec<UserAccount>> {
        self.get("/users").await
    }

    pub async fn add_credits(&self, user_id: &str, credits: i64) -> ApiResult<()> {
        let path = format!("/admin/add-credits/{}", path_segment(user_id));
        let body = AddCreditsRequest { credits };
        self.send_empty(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn change_role(&self, user_id: &str, role: Role) -> ApiResult<()> {
        let path = format!("/admin/change-role/{}", path_segment(user_id));
        let body = ChangeRoleRequest { role };
        self.send_empty(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn analytics(&self) -> ApiResult<Analytics> {
        self.get("/admin/analytics").await
    }

    // ---- plumbing ---------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");

        let builder = self
            .http
            .request(method, url)
            .header("content-type", "application/json")
            .header("accept", "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = Self::send_checked(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        Self::send_checked(builder).await.map(drop)
    }

    async fn send_checked(builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "API error response");
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        Ok(response)
    }
}

/// Percent-encodes an id for use as a single path segment.
fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
