//! TMDB API client module.
//!
//! Builds request URLs for the movie list, movie details and poster
//! endpoints, fetches them over HTTP and decodes the JSON bodies into
//! [`Movie`] records.

mod api;
mod client;
mod error;
mod parse;
mod types;
mod urls;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{Result, TmdbError};
pub use parse::{
    SUCCESS_STATUS_CODE, check_response_error, parse_movie_details, parse_movie_list,
    parse_movie_page,
};
pub use types::{Movie, MoviePage, ParseSortCriteriaError, Review, SortCriteria, Video};
#[allow(clippy::module_name_repetitions)]
pub use urls::{POSTER_SIZE, TmdbUrls, youtube_url};
