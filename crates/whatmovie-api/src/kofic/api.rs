//! `KoficApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::Result;
use super::movie::Movie;
use super::params::MovieListParams;
use super::types::MovieSummary;

/// KOFIC API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(KoficApi: Send)]
pub trait LocalKoficApi {
    /// Fetches one page of `searchMovieList`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP request fails, or
    /// `KoficError::Parse` if `movieListResult.movieList` is missing.
    async fn movie_list(&self, params: &MovieListParams) -> Result<Vec<MovieSummary>>;

    /// Fetches `searchMovieInfo` for one movie and flattens it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP request fails, or
    /// `KoficError::Parse` naming the first missing field.
    async fn movie_detail(&self, movie_code: &str) -> Result<Movie>;

    /// Scrapes the poster image path from the KOBIS movie detail page.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the page cannot be fetched, or
    /// `KoficError::NotFound` if the page has no image path.
    async fn movie_image_path(&self, movie_code: &str) -> Result<String>;
}
