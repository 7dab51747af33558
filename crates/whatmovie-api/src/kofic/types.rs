//! KOFIC API response types and envelope parsing.

use serde::Deserialize;
use serde_json::Value;

use super::error::{KoficError, Result};

/// A single entry of the `searchMovieList` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    /// KOFIC movie code.
    pub movie_cd: String,
    /// Korean title.
    #[serde(default)]
    pub movie_nm: String,
    /// Comma-separated genre list (used for the adult filter).
    #[serde(default)]
    pub genre_alt: String,
}

/// `faultInfo` object returned instead of a result on API errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaultInfo {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: String,
}

/// Fails with `ApiFault` if the body is a `faultInfo` envelope.
pub(crate) fn check_fault(body: &Value) -> Result<()> {
    let Some(fault) = body.get("faultInfo") else {
        return Ok(());
    };
    let fault: FaultInfo = serde_json::from_value(fault.clone())
        .map_err(|e| KoficError::Parse(format!("malformed `faultInfo`: {e}")))?;
    Err(KoficError::ApiFault {
        code: fault.error_code,
        message: fault.message,
    })
}

/// Extracts `movieListResult.movieList` from a `searchMovieList` body.
pub(crate) fn parse_movie_list(body: &Value) -> Result<Vec<MovieSummary>> {
    let result = body
        .get("movieListResult")
        .ok_or_else(|| KoficError::missing_field("movieListResult"))?;
    let list = result
        .get("movieList")
        .ok_or_else(|| KoficError::missing_field("movieListResult.movieList"))?;
    let entries = list.as_array().ok_or_else(|| {
        KoficError::Parse(String::from("`movieListResult.movieList` is not an array"))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            MovieSummary::deserialize(entry)
                .map_err(|e| KoficError::Parse(format!("movieListResult.movieList[{i}]: {e}")))
        })
        .collect()
}

/// Extracts `movieInfoResult.movieInfo` from a `searchMovieInfo` body.
pub(crate) fn movie_info(body: &Value) -> Result<&Value> {
    let info = body
        .get("movieInfoResult")
        .ok_or_else(|| KoficError::missing_field("movieInfoResult"))?
        .get("movieInfo")
        .ok_or_else(|| KoficError::missing_field("movieInfoResult.movieInfo"))?;
    if !info.is_object() {
        return Err(KoficError::Parse(String::from(
            "`movieInfoResult.movieInfo` is not an object",
        )));
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_movie_list_fixture() {
        // Arrange
        let body: Value =
            serde_json::from_str(include_str!("../../../../fixtures/kofic/movie_list.json"))
                .unwrap();

        // Act
        let list = parse_movie_list(&body).unwrap();

        // Assert
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].movie_cd, "20124079");
        assert_eq!(list[0].movie_nm, "광해, 왕이 된 남자");
        assert_eq!(list[1].genre_alt, "성인물(에로)");
        assert_eq!(list[2].movie_cd, "20112207");
    }

    #[test]
    fn test_parse_movie_list_missing_result() {
        // Arrange
        let body = json!({ "somethingElse": {} });

        // Act
        let err = parse_movie_list(&body).unwrap_err();

        // Assert
        assert!(matches!(err, KoficError::Parse(_)));
        assert!(err.to_string().contains("`movieListResult`"));
    }

    #[test]
    fn test_parse_movie_list_missing_list() {
        // Arrange
        let body = json!({ "movieListResult": { "totCnt": 0 } });

        // Act
        let err = parse_movie_list(&body).unwrap_err();

        // Assert
        assert!(err.to_string().contains("`movieListResult.movieList`"));
    }

    #[test]
    fn test_parse_movie_list_not_an_array() {
        // Arrange
        let body = json!({ "movieListResult": { "movieList": "nope" } });

        // Act
        let err = parse_movie_list(&body).unwrap_err();

        // Assert
        assert!(err.to_string().contains("is not an array"));
    }

    #[test]
    fn test_parse_movie_list_entry_without_code() {
        // Arrange
        let body = json!({ "movieListResult": { "movieList": [{ "genreAlt": "드라마" }] } });

        // Act
        let err = parse_movie_list(&body).unwrap_err();

        // Assert
        assert!(err.to_string().contains("movieList[0]"));
        assert!(err.to_string().contains("movieCd"));
    }

    #[test]
    fn test_parse_movie_list_missing_genre_alt_defaults_to_empty() {
        // Arrange
        let body = json!({ "movieListResult": { "movieList": [{ "movieCd": "1" }] } });

        // Act
        let list = parse_movie_list(&body).unwrap();

        // Assert
        assert_eq!(list[0].genre_alt, "");
    }

    #[test]
    fn test_check_fault_passes_regular_body() {
        // Arrange
        let body = json!({ "movieListResult": { "movieList": [] } });

        // Act & Assert
        assert!(check_fault(&body).is_ok());
    }

    #[test]
    fn test_check_fault_fixture() {
        // Arrange
        let body: Value =
            serde_json::from_str(include_str!("../../../../fixtures/kofic/fault_invalid_key.json"))
                .unwrap();

        // Act
        let err = check_fault(&body).unwrap_err();

        // Assert
        assert!(matches!(err, KoficError::ApiFault { .. }));
        if let KoficError::ApiFault { code, message } = err {
            assert_eq!(code, "320010");
            assert!(message.contains("유효하지않은 키값"));
        }
    }

    #[test]
    fn test_movie_info_requires_object() {
        // Arrange
        let body = json!({ "movieInfoResult": { "movieInfo": [] } });

        // Act
        let err = movie_info(&body).unwrap_err();

        // Assert
        assert!(err.to_string().contains("is not an object"));
    }

    #[test]
    fn test_movie_info_missing_result() {
        // Arrange
        let body = json!({});

        // Act
        let err = movie_info(&body).unwrap_err();

        // Assert
        assert!(err.to_string().contains("`movieInfoResult`"));
    }
}
