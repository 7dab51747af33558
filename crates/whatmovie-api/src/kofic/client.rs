//! `KoficClient` - KOFIC API client implementation.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::LocalKoficApi;
use super::error::{KoficError, Result};
use super::image::extract_image_path;
use super::movie::Movie;
use super::params::MovieListParams;
use super::types::{MovieSummary, check_fault, movie_info, parse_movie_list};

/// Default base URL of the KOBIS open API REST service.
const DEFAULT_BASE_URL: &str = "http://www.kobis.or.kr/kobisopenapi/webservice/rest/";

/// Default base URL of the KOBIS web site (HTML pages).
const DEFAULT_WEB_BASE_URL: &str = "http://www.kobis.or.kr/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the movie list endpoint.
const MOVIE_LIST_PATH: &str = "movie/searchMovieList.json";

/// Path of the movie detail endpoint.
const MOVIE_INFO_PATH: &str = "movie/searchMovieInfo.json";

/// Path of the HTML movie detail page.
const MOVIE_PAGE_PATH: &str = "kobis/business/mast/mvie/searchMovieDtl.do";

/// KOFIC API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct KoficClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Base URL for HTML pages.
    web_base_url: Url,
    /// API key sent as the `key` query parameter.
    api_key: String,
}

/// Builder for `KoficClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct KoficClientBuilder {
    base_url: Option<Url>,
    web_base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl KoficClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            web_base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the API base URL (for wiremock in tests).
    ///
    /// A missing trailing `/` is added on build.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the web site base URL used for HTML pages.
    #[must_use]
    pub fn web_base_url(mut self, url: Url) -> Self {
        self.web_base_url = Some(url);
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

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<KoficClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| KoficError::Config(String::from("api_key is required")))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| KoficError::Config(String::from("user_agent is required")))?;

        let base_url = match self.base_url {
            Some(url) => with_trailing_slash(url),
            None => parse_default(DEFAULT_BASE_URL)?,
        };
        let web_base_url = match self.web_base_url {
            Some(url) => with_trailing_slash(url),
            None => parse_default(DEFAULT_WEB_BASE_URL)?,
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .map_err(|source| KoficError::Transport {
                context: String::from("failed to build HTTP client"),
                source,
            })?;

        Ok(KoficClient {
            http_client,
            base_url,
            web_base_url,
            api_key,
        })
    }
}

fn parse_default(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| KoficError::InvalidUrl {
        context: format!("invalid default base URL: {raw}"),
        source,
    })
}

/// Appends `/` to the path so `Url::join` keeps the last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Replaces the `key` query value so the API key never reaches the logs.
fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" {
                String::from("***")
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out
}

impl KoficClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> KoficClientBuilder {
        KoficClientBuilder::new()
    }

    /// Sends a GET request and returns the response body as text.
    #[instrument(skip_all)]
    async fn get_text(&self, base: &Url, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = base.join(path).map_err(|source| KoficError::InvalidUrl {
            context: format!("failed to join URL path: {path}"),
            source,
        })?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .build()
            .map_err(|source| KoficError::Transport {
                context: format!("failed to build request: {path}"),
                source,
            })?;

        tracing::debug!(url = %redacted(request.url()), "KOFIC request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| KoficError::Transport {
                context: format!("request failed: {path}"),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            return Err(KoficError::HttpStatus { status, body });
        }

        response
            .text()
            .await
            .map_err(|source| KoficError::Transport {
                context: format!("failed to read response body: {path}"),
                source,
            })
    }

    /// Sends an authenticated GET request to the API and decodes the JSON body.
    ///
    /// A `faultInfo` envelope is turned into `KoficError::ApiFault`.
    #[instrument(skip_all)]
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let mut full_query: Vec<(&str, String)> = Vec::with_capacity(query.len().saturating_add(1));
        full_query.push(("key", self.api_key.clone()));
        full_query.extend_from_slice(query);

        let body = self.get_text(&self.base_url, path, &full_query).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| KoficError::Parse(format!("invalid JSON from {path}: {e}")))?;
        check_fault(&value)?;
        Ok(value)
    }
}

impl LocalKoficApi for KoficClient {
    #[instrument(skip_all, fields(page = params.page))]
    async fn movie_list(&self, params: &MovieListParams) -> Result<Vec<MovieSummary>> {
        let body = self.get_json(MOVIE_LIST_PATH, &params.to_query()).await?;
        parse_movie_list(&body)
    }

    #[instrument(skip_all, fields(movie_code = %movie_code))]
    async fn movie_detail(&self, movie_code: &str) -> Result<Movie> {
        let query = [("movieCd", String::from(movie_code))];
        let body = self.get_json(MOVIE_INFO_PATH, &query).await?;
        Movie::from_movie_info(movie_code, movie_info(&body)?)
    }

    #[instrument(skip_all, fields(movie_code = %movie_code))]
    async fn movie_image_path(&self, movie_code: &str) -> Result<String> {
        let query = [("code", String::from(movie_code))];
        let html = self
            .get_text(&self.web_base_url, MOVIE_PAGE_PATH, &query)
            .await?;
        extract_image_path(&html)
    }
}
