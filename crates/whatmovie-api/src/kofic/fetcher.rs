//! Page fetching: list, adult filter, then one detail call per entry.

use tracing::instrument;

use super::api::LocalKoficApi;
use super::error::Result;
use super::movie::Movie;
use super::params::MovieListParams;
use super::types::MovieSummary;

/// `genreAlt` value KOFIC uses for adult (erotic) titles.
pub const ADULT_GENRE_ALT: &str = "성인물(에로)";

/// Returns `true` if the list entry is an adult title.
#[must_use]
pub fn is_adult(summary: &MovieSummary) -> bool {
    summary.genre_alt == ADULT_GENRE_ALT
}

/// Fetches one list page (100 entries, all opening years) and the details
/// of every non-adult entry.
///
/// # Errors
///
/// See [`fetch_movies`].
#[instrument(skip(api))]
pub async fn fetch_movies_by_page(
    api: &(impl LocalKoficApi + Sync),
    page: u32,
) -> Result<Vec<Movie>> {
    fetch_movies(api, &MovieListParams::new(page)).await
}

/// Fetches a list page and then the details of each non-adult entry, one
/// request at a time, in list order.
///
/// The first failing detail request aborts the page; movies fetched before
/// it are discarded.
///
/// # Errors
///
/// Returns the error of the list request or of the first failing detail
/// request.
#[instrument(skip_all, fields(page = params.page))]
pub async fn fetch_movies(
    api: &(impl LocalKoficApi + Sync),
    params: &MovieListParams,
) -> Result<Vec<Movie>> {
    let summaries = api.movie_list(params).await?;

    let mut movies: Vec<Movie> = Vec::with_capacity(summaries.len());
    let mut skipped: usize = 0;

    for summary in &summaries {
        if is_adult(summary) {
            skipped = skipped.saturating_add(1);
            tracing::debug!(movie_cd = %summary.movie_cd, "skipping adult title");
            continue;
        }
        let movie = api.movie_detail(&summary.movie_cd).await?;
        movies.push(movie);
    }

    tracing::info!(
        page = params.page,
        entries = summaries.len(),
        skipped = skipped,
        fetched = movies.len(),
        "movie list page fetched"
    );

    Ok(movies)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::kofic::client::KoficClient;
    use crate::kofic::error::KoficError;

    /// Mock API serving a fixed list and recording detail calls.
    struct MockKoficApi {
        list: Result<Vec<MovieSummary>>,
        failing_code: Option<&'static str>,
        detail_calls: Mutex<Vec<String>>,
    }

    impl MockKoficApi {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                list: Ok(entries
                    .iter()
                    .map(|(code, genre_alt)| summary(code, genre_alt))
                    .collect()),
                failing_code: None,
                detail_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_list() -> Self {
            Self {
                list: Err(KoficError::missing_field("movieListResult")),
                failing_code: None,
                detail_calls: Mutex::new(Vec::new()),
            }
        }

        fn detail_calls(&self) -> Vec<String> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    impl LocalKoficApi for MockKoficApi {
        async fn movie_list(&self, _params: &MovieListParams) -> Result<Vec<MovieSummary>> {
            match &self.list {
                Ok(list) => Ok(list.clone()),
                Err(e) => Err(KoficError::Parse(e.to_string())),
            }
        }

        async fn movie_detail(&self, movie_code: &str) -> Result<Movie> {
            self.detail_calls
                .lock()
                .unwrap()
                .push(String::from(movie_code));
            if self.failing_code == Some(movie_code) {
                return Err(KoficError::missing_field("movieInfoResult"));
            }
            Ok(movie(movie_code))
        }

        async fn movie_image_path(&self, _movie_code: &str) -> Result<String> {
            Err(KoficError::NotFound(String::from("unused")))
        }
    }

    fn summary(code: &str, genre_alt: &str) -> MovieSummary {
        MovieSummary {
            movie_cd: String::from(code),
            movie_nm: format!("movie {code}"),
            genre_alt: String::from(genre_alt),
        }
    }

    fn movie(code: &str) -> Movie {
        Movie {
            movie_code: String::from(code),
            name: format!("movie {code}"),
            name_en: String::new(),
            actor: String::new(),
            director: String::new(),
            genre: String::new(),
            nation: String::new(),
            rating: String::new(),
            open_date: String::new(),
            show_time: 0,
            movie_type: String::new(),
            status: String::new(),
            production_year: String::new(),
            company: String::new(),
        }
    }

    #[test]
    fn test_is_adult() {
        // Arrange & Act & Assert
        assert!(is_adult(&summary("1", "성인물(에로)")));
        assert!(!is_adult(&summary("2", "드라마")));
        assert!(!is_adult(&summary("3", "드라마,성인물(에로)")));
        assert!(!is_adult(&summary("4", "")));
    }

    #[tokio::test]
    async fn test_adult_entry_is_skipped() {
        // Arrange
        let mock = MockKoficApi::new(&[("1", "성인물(에로)"), ("2", "드라마")]);

        // Act
        let movies = fetch_movies_by_page(&mock, 1).await.unwrap();

        // Assert
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_code, "2");
        assert_eq!(mock.detail_calls(), vec![String::from("2")]);
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        // Arrange
        let mock = MockKoficApi::new(&[
            ("30", "액션"),
            ("10", "성인물(에로)"),
            ("20", "코미디"),
            ("50", "성인물(에로)"),
            ("40", "공포(호러)"),
        ]);

        // Act
        let movies = fetch_movies_by_page(&mock, 1).await.unwrap();

        // Assert
        let codes: Vec<&str> = movies.iter().map(|m| m.movie_code.as_str()).collect();
        assert_eq!(codes, vec!["30", "20", "40"]);
        assert_eq!(mock.detail_calls(), vec!["30", "20", "40"]);
    }

    #[tokio::test]
    async fn test_all_adult_page_is_empty() {
        // Arrange
        let mock = MockKoficApi::new(&[("1", "성인물(에로)"), ("2", "성인물(에로)")]);

        // Act
        let movies = fetch_movies_by_page(&mock, 7).await.unwrap();

        // Assert
        assert!(movies.is_empty());
        assert!(mock.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page() {
        // Arrange
        let mock = MockKoficApi::new(&[]);

        // Act
        let movies = fetch_movies_by_page(&mock, 999).await.unwrap();

        // Assert
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_issues_no_detail_calls() {
        // Arrange
        let mock = MockKoficApi::failing_list();

        // Act
        let result = fetch_movies_by_page(&mock, 1).await;

        // Assert
        assert!(matches!(result, Err(KoficError::Parse(_))));
        assert!(mock.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_aborts_page() {
        // Arrange
        let mut mock = MockKoficApi::new(&[("1", "드라마"), ("2", "드라마"), ("3", "드라마")]);
        mock.failing_code = Some("2");

        // Act
        let result = fetch_movies_by_page(&mock, 1).await;

        // Assert: "3" is never requested
        assert!(result.is_err());
        assert_eq!(mock.detail_calls(), vec!["1", "2"]);
    }

    /// Mounts a detail response for `code` expected to be requested `times` times.
    async fn mount_detail(server: &MockServer, code: &str, body: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path("/rest/movie/searchMovieInfo.json"))
            .and(query_param("movieCd", code))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(times)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> KoficClient {
        KoficClient::builder()
            .base_url(format!("{}/rest/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_movies_by_page_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/movie/searchMovieList.json"))
            .and(query_param("curPage", "1"))
            .and(query_param("itemPerPage", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../../../../fixtures/kofic/movie_list.json")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        mount_detail(
            &mock_server,
            "20124079",
            include_str!("../../../../fixtures/kofic/movie_info_20124079.json"),
            1,
        )
        .await;
        mount_detail(
            &mock_server,
            "20112207",
            include_str!("../../../../fixtures/kofic/movie_info_20112207.json"),
            1,
        )
        .await;
        // Adult entry: must never be requested
        mount_detail(&mock_server, "20129370", "{}", 0).await;

        let client = client_for(&mock_server);

        // Act
        let movies = fetch_movies_by_page(&client, 1).await.unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].movie_code, "20124079");
        assert_eq!(movies[0].genre, "사극,드라마");
        assert_eq!(movies[1].movie_code, "20112207");
        assert_eq!(movies[1].nation, "미국");
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_missing_list_result_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/movie/searchMovieList.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":{}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/movie/searchMovieInfo.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = fetch_movies_by_page(&client, 1).await;

        // Assert
        assert!(matches!(result, Err(KoficError::Parse(_))));
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_detail_parse_error_aborts_page_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let list = r#"{"movieListResult":{"totCnt":2,"movieList":[
            {"movieCd":"A1","genreAlt":"드라마"},
            {"movieCd":"B2","genreAlt":"드라마"}
        ]}}"#;

        Mock::given(method("GET"))
            .and(path("/rest/movie/searchMovieList.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(list))
            .mount(&mock_server)
            .await;
        mount_detail(
            &mock_server,
            "A1",
            r#"{"movieInfoResult":{"movieInfo":{"movieNm":"x"}}}"#,
            1,
        )
        .await;
        mount_detail(&mock_server, "B2", "{}", 0).await;

        let client = client_for(&mock_server);

        // Act
        let err = fetch_movies_by_page(&client, 1).await.unwrap_err();

        // Assert
        assert!(matches!(err, KoficError::Parse(_)));
        assert!(err.to_string().contains("movieInfo."));
        mock_server.verify().await;
    }
}
