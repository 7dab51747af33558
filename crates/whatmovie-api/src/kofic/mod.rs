//! KOFIC API client module.
//!
//! Handles HTTP requests to the KOBIS open API `movie` endpoints,
//! filters adult titles out of list pages, and flattens detail
//! responses into [`Movie`] records.

mod api;
mod client;
mod error;
mod fetcher;
mod image;
mod movie;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{KoficApi, LocalKoficApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{KoficClient, KoficClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{KoficError, Result};
pub use fetcher::{ADULT_GENRE_ALT, fetch_movies, fetch_movies_by_page, is_adult};
pub use image::extract_image_path;
pub use movie::{Movie, flatten_named_list};
pub use params::MovieListParams;
pub use types::MovieSummary;
