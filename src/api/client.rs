//! Instagram private API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::api::platform::{
    Collection, CollectionId, Credentials, FeedPage, RemotePlatform, Session,
};
use crate::api::types::*;
use crate::error::{Error, Result};

/// Instagram API base URL.
const API_BASE: &str = "https://i.instagram.com";

/// Application id sent by the web client.
const APP_ID: &str = "936619743392459";

/// Longest response excerpt included in error messages.
const BODY_EXCERPT_LEN: usize = 500;

/// Instagram API client.
pub struct InstagramApi {
    client: Client,
    user_agent: String,
    show_downloads: bool,
}

impl InstagramApi {
    /// Create a new API client.
    pub fn new(user_agent: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent,
            show_downloads: false,
        })
    }

    /// Draw progress bars for large media downloads.
    pub fn with_download_progress(mut self, show: bool) -> Self {
        self.show_downloads = show;
        self
    }

    /// Whether large media downloads draw a progress bar.
    pub fn shows_downloads(&self) -> bool {
        self.show_downloads
    }

    /// Build common headers for API requests.
    fn build_headers(&self, secret: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        let cookie = header::HeaderValue::from_str(&format!("sessionid={}", secret))
            .map_err(|_| Error::Authentication("session id contains invalid characters".into()))?;

        headers.insert(header::COOKIE, cookie);
        headers.insert("x-ig-app-id", header::HeaderValue::from_static(APP_ID));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Make an authenticated GET request.
    async fn get(&self, secret: &str, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", API_BASE, path);
        let headers = self.build_headers(secret)?;

        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {} failed: {}", path, e)))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Transport(format!("Rate limited on {}", path)));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Auth error response: {}", body);
            return Err(Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if body.is_empty() {
                    "session rejected"
                } else {
                    excerpt(&body)
                }
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "HTTP {} on {}: {}",
                status,
                path,
                excerpt(&body)
            )));
        }

        Ok(response)
    }

    /// GET a JSON endpoint and decode it after checking the status envelope.
    async fn get_json<T: DeserializeOwned>(
        &self,
        secret: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get(secret, path, query).await?;
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read {}: {}", path, e)))?;
        tracing::trace!("Response body: {}", text);

        let envelope: StatusResponse = serde_json::from_str(&text).unwrap_or_default();
        if !envelope.is_ok() {
            let message = envelope.message.clone().unwrap_or_else(|| "unknown".into());
            if envelope.requires_login() {
                return Err(Error::Authentication(message));
            }
            return Err(Error::Transport(format!("{} returned failure: {}", path, message)));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::Transport(format!(
                "Failed to parse {}: {} - Response: {}",
                path,
                e,
                excerpt(&text)
            ))
        })
    }

    /// Download a file from a URL.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| Error::Download(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl RemotePlatform for InstagramApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let me: CurrentUserResponse = self
            .get_json(
                &credentials.secret,
                "/api/v1/accounts/current_user/",
                &[("edit", "true".to_string())],
            )
            .await?;

        if !me.user.username.eq_ignore_ascii_case(&credentials.username) {
            return Err(Error::Authentication(format!(
                "session belongs to '{}', not '{}'",
                me.user.username, credentials.username
            )));
        }

        Ok(Session::new(
            me.user.username,
            me.user.pk.map(FlexibleId::into_string),
            credentials.secret.clone(),
        ))
    }

    async fn list_collections(&self, session: &Session) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("collection_types", r#"["ALL_MEDIA_AUTO_COLLECTION","MEDIA"]"#.to_string())];
            if let Some(max_id) = &cursor {
                query.push(("max_id", max_id.clone()));
            }

            let page: CollectionsResponse = self
                .get_json(&session.secret, "/api/v1/collections/list/", &query)
                .await?;

            collections.extend(
                page.items
                    .into_iter()
                    .map(|c| Collection::new(c.collection_id.into_string(), c.collection_name)),
            );

            cursor = match (page.more_available, page.next_max_id) {
                (true, Some(next)) => Some(next.into_string()),
                _ => break,
            };

            // Rate limiting delay between listing pages
            let delay_ms = rand::thread_rng().gen_range(400..750);
            sleep(Duration::from_millis(delay_ms)).await;
        }

        tracing::debug!("Listed {} collections", collections.len());
        Ok(collections)
    }

    async fn fetch_collection_page(
        &self,
        session: &Session,
        collection: &CollectionId,
        cursor: Option<&str>,
    ) -> Result<FeedPage> {
        let path = format!("/api/v1/feed/collection/{}/", collection);
        let query: Vec<(&str, String)> = cursor
            .map(|c| vec![("max_id", c.to_string())])
            .unwrap_or_default();

        let feed: CollectionFeedResponse = self.get_json(&session.secret, &path, &query).await?;
        let next_cursor = feed.next_cursor();

        let mut items = Vec::with_capacity(feed.items.len());
        for raw in &feed.items {
            match parse_feed_item(raw) {
                Ok(post) => items.push(post),
                Err(e) => tracing::warn!("Skipping malformed item in collection {}: {}", collection, e),
            }
        }

        Ok(FeedPage { items, next_cursor })
    }
}

/// Trim a response body for error messages.
fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
