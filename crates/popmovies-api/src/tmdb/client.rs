//! `TmdbClient` - TMDB movie catalog client implementation.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

use super::api::LocalMovieApi;
use super::error::{Result, TmdbError};
use super::parse::{check_response_error, parse_movie_details, parse_movie_page};
use super::types::{Movie, MoviePage, SortCriteria};
use super::urls::TmdbUrls;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter hidden from request logs.
const API_KEY_PARAM: &str = "api_key";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Request URL builder.
    urls: TmdbUrls,
    /// v3 API key sent as the `api_key` query parameter.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    image_base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            image_base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the API root (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the image root used for poster URLs.
    #[must_use]
    pub fn image_base_url(mut self, url: Url) -> Self {
        self.image_base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the whole-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.ok_or(TmdbError::MissingSetting("api_key"))?;
        let user_agent = self
            .user_agent
            .ok_or(TmdbError::MissingSetting("user_agent"))?;

        let mut urls = TmdbUrls::new()?;
        if let Some(url) = self.base_url {
            urls = urls.with_api_base(url);
        }
        if let Some(url) = self.image_base_url {
            urls = urls.with_image_base(url);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()?;

        Ok(TmdbClient {
            http_client,
            urls,
            api_key,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// URL builder configured for this client.
    #[must_use]
    pub const fn urls(&self) -> &TmdbUrls {
        &self.urls
    }

    /// Sends a GET request and returns the full body as text.
    ///
    /// A non-2xx reply whose body carries a TMDB `status_code` becomes
    /// [`TmdbError::Api`]; any other non-2xx reply becomes
    /// [`TmdbError::HttpStatus`].
    #[instrument(skip_all)]
    async fn get_text(&self, url: Url) -> Result<String> {
        tracing::debug!(url = %redact_api_key(&url), "TMDB API request");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(document) = serde_json::from_str::<Map<String, Value>>(&body) {
                check_response_error(&document)?;
            }
            return Err(TmdbError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "TMDB API response");
        Ok(body)
    }
}

impl LocalMovieApi for TmdbClient {
    #[instrument(skip(self))]
    async fn movie_page(&self, sort: SortCriteria) -> Result<MoviePage> {
        let url = self.urls.movie_list_url(sort, &self.api_key)?;
        let body = self.get_text(url).await?;
        parse_movie_page(&body)
    }

    #[instrument(skip(self))]
    async fn movie_list(&self, sort: SortCriteria) -> Result<Vec<Movie>> {
        self.movie_page(sort).await.map(|page| page.results)
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, movie_id: u64) -> Result<Movie> {
        let url = self.urls.movie_details_url(movie_id, &self.api_key)?;
        let body = self.get_text(url).await?;
        parse_movie_details(&body)
    }
}

/// Copy of `url` with the API key masked, for logging.
fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == API_KEY_PARAM {
                String::from("***")
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}
