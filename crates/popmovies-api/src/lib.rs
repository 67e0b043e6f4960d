//! API client library for popmovies.
//!
//! Provides URL building, fetching and response decoding for the TMDB movie
//! catalog.

/// TMDB API client.
pub mod tmdb;
