//! REST API client
//!
//! One attempt per call: no retries, no timeout, no backoff.

use std::sync::Arc;

use reqwest::{header, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{ClientError, Result};
use crate::models::{
    AccessToken, Campaign, ErrorBody, Event, NewCampaign, NewEvent, NewSegment, RegisteredUser,
    Segment,
};
use crate::session::SessionStore;
use crate::VERSION;

/// API client
///
/// Every request carries a JSON content type. Requests to marketing endpoints
/// also carry `Authorization: Bearer <token>` whenever the session store holds
/// a token.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("marktauto/{}", VERSION))
                .map_err(|e| ClientError::Config(e.to_string()))?,
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Issues a request and returns the raw response; status is not checked
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.url(path)?;
        tracing::debug!(%method, path, "API request");

        let mut request = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// `POST /auth/login` with form-encoded credentials. Sent without a bearer
    /// token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken> {
        let url = self.url("/auth/login")?;
        tracing::debug!(path = "/auth/login", "API request");
        let response = self
            .http
            .post(url)
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        Self::read(response).await
    }

    /// `POST /auth/register` with JSON credentials
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisteredUser> {
        #[derive(Serialize)]
        struct RegisterParams<'a> {
            email: &'a str,
            password: &'a str,
        }

        let url = self.url("/auth/register")?;
        tracing::debug!(path = "/auth/register", "API request");
        let response = self
            .http
            .post(url)
            .json(&RegisterParams { email, password })
            .send()
            .await?;
        Self::read(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::read(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, body).await?;
        Self::read(response).await
    }

    /// Parses a success body, or turns a non-success response into [`ClientError::Api`]
    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        Err(api_error(status, &body))
    }

    // =========================================================================
    // Marketing
    // =========================================================================

    pub async fn list_segments(&self) -> Result<Vec<Segment>> {
        self.get("/marketing/segments").await
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        self.get("/marketing/campaigns").await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.get("/marketing/events").await
    }

    pub async fn create_segment(&self, params: &NewSegment) -> Result<Segment> {
        self.post("/marketing/segments", Some(params)).await
    }

    pub async fn create_campaign(&self, params: &NewCampaign) -> Result<Campaign> {
        self.post("/marketing/campaigns", Some(params)).await
    }

    pub async fn launch_campaign(&self, campaign_id: i64) -> Result<Campaign> {
        self.post::<_, ()>(&format!("/marketing/campaigns/{}/launch", campaign_id), None)
            .await
    }

    pub async fn record_event(&self, campaign_id: i64, params: &NewEvent) -> Result<Event> {
        self.post(&format!("/marketing/campaigns/{}/events", campaign_id), Some(params))
            .await
    }
}

/// Builds an API error from the `detail` field, the raw body, or the status reason
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let detail = ErrorBody::parse(body).message().map(str::to_string);
    let message = match &detail {
        Some(msg) => msg.clone(),
        None => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        }
    };

    ClientError::Api {
        status: status.as_u16(),
        message,
        detail,
    }
}
