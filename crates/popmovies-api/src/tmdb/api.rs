//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::Result;
use super::types::{Movie, MoviePage, SortCriteria};

/// Movie catalog API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches one page of the popular or top-rated list, envelope included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body cannot be decoded,
    /// or TMDB reports a non-success `status_code`.
    async fn movie_page(&self, sort: SortCriteria) -> Result<MoviePage>;

    /// Fetches the popular or top-rated list.
    ///
    /// # Errors
    ///
    /// Same as [`LocalMovieApi::movie_page`].
    async fn movie_list(&self, sort: SortCriteria) -> Result<Vec<Movie>>;

    /// Fetches one movie with its videos and reviews in a single request.
    ///
    /// # Errors
    ///
    /// Same as [`LocalMovieApi::movie_page`].
    async fn movie_details(&self, movie_id: u64) -> Result<Movie>;
}
