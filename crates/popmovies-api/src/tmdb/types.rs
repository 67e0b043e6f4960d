//! TMDB movie records and request parameters.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use super::parse::{lenient, lenient_list, nested_results, results_array, serialize_results};
use super::urls::youtube_url;

/// `site` value of videos hosted on YouTube.
const YOUTUBE_SITE: &str = "YouTube";

// --- Sort Criteria ---

/// Ordering of the movie list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortCriteria {
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
}

impl SortCriteria {
    /// Path segment appended to the movie catalog root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
        }
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error returned when a string names no known [`SortCriteria`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort criteria: {0} (expected popular or top_rated)")]
pub struct ParseSortCriteriaError(String);

impl FromStr for SortCriteria {
    type Err = ParseSortCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Self::Popular),
            "top_rated" | "top-rated" => Ok(Self::TopRated),
            other => Err(ParseSortCriteriaError(String::from(other))),
        }
    }
}

// --- Movie ---

/// A movie from the list or details endpoint.
///
/// Every field is optional on the wire. Missing, `null` or mistyped values
/// decode to the type's zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    #[serde(default, deserialize_with = "lenient")]
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    /// Original title.
    #[serde(default, deserialize_with = "lenient")]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default, deserialize_with = "lenient")]
    pub original_language: String,
    /// Overview text.
    #[serde(default, deserialize_with = "lenient")]
    pub overview: String,
    /// Poster image path (e.g. `/abc.jpg`), empty when there is none.
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: String,
    /// Backdrop image path.
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: String,
    /// Release date as sent (`YYYY-MM-DD` or empty).
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: String,
    /// Runtime in minutes. Only the details endpoint sends it.
    #[serde(default, deserialize_with = "lenient")]
    pub runtime: u32,
    /// Vote average (0-10).
    #[serde(default, deserialize_with = "lenient")]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default, deserialize_with = "lenient")]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: f64,
    /// Adult flag.
    #[serde(default, deserialize_with = "lenient")]
    pub adult: bool,
    /// Whether the entry itself is a promotional video.
    #[serde(default, deserialize_with = "lenient")]
    pub video: bool,
    /// Genre IDs.
    #[serde(default, deserialize_with = "lenient_list")]
    pub genre_ids: Vec<u32>,
    /// Videos appended via `append_to_response`.
    #[serde(
        default,
        deserialize_with = "nested_results",
        serialize_with = "serialize_results"
    )]
    pub videos: Vec<Video>,
    /// Reviews appended via `append_to_response`.
    #[serde(
        default,
        deserialize_with = "nested_results",
        serialize_with = "serialize_results"
    )]
    pub reviews: Vec<Review>,
}

impl Movie {
    /// Whether a poster URL can be built for this movie.
    #[must_use]
    pub fn has_poster(&self) -> bool {
        !self.poster_path.is_empty()
    }

    /// Parses `release_date`. Returns `None` if it is empty or not `YYYY-MM-DD`.
    #[must_use]
    pub fn released_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }

    /// Drops the appended sub-resources. List entries never carry them.
    pub(crate) fn into_list_entry(self) -> Self {
        Self {
            videos: Vec::new(),
            reviews: Vec::new(),
            ..self
        }
    }
}

// --- Movie List ---

/// Envelope of the `movie/popular` and `movie/top_rated` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    /// Current page number.
    #[serde(default, deserialize_with = "lenient")]
    pub page: u32,
    /// Total number of pages.
    #[serde(default, deserialize_with = "lenient")]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default, deserialize_with = "lenient")]
    pub total_results: u32,
    /// Movies on this page, in response order.
    #[serde(default, deserialize_with = "results_array")]
    pub results: Vec<Movie>,
}

// --- Video ---

/// A video clip attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VideoPayload")]
pub struct Video {
    /// Provider clip identifier.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Hosting provider (e.g. "YouTube").
    pub site: String,
    /// Watch URL, present only for providers with a known URL template.
    pub resolved_url: Option<Url>,
}

/// Wire shape of a `videos.results` item.
#[derive(Deserialize)]
struct VideoPayload {
    #[serde(default, deserialize_with = "lenient")]
    key: String,
    #[serde(default, deserialize_with = "lenient")]
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    site: String,
}

impl From<VideoPayload> for Video {
    fn from(payload: VideoPayload) -> Self {
        let resolved_url = if payload.site == YOUTUBE_SITE {
            youtube_url(&payload.key).ok()
        } else {
            None
        };
        Self {
            key: payload.key,
            name: payload.name,
            site: payload.site,
            resolved_url,
        }
    }
}

// --- Review ---

/// A user review attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReviewPayload")]
pub struct Review {
    /// Author name.
    pub author: String,
    /// Review body.
    pub content: String,
    /// Review permalink, `None` if the source is not an absolute URL.
    pub url: Option<Url>,
}

/// Wire shape of a `reviews.results` item.
#[derive(Deserialize)]
struct ReviewPayload {
    #[serde(default, deserialize_with = "lenient")]
    author: String,
    #[serde(default, deserialize_with = "lenient")]
    content: String,
    #[serde(default, deserialize_with = "lenient")]
    url: String,
}

impl From<ReviewPayload> for Review {
    fn from(payload: ReviewPayload) -> Self {
        Self {
            author: payload.author,
            content: payload.content,
            url: Url::parse(&payload.url).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_sort_criteria_paths() {
        // Arrange & Act & Assert
        assert_eq!(SortCriteria::Popular.path(), "popular");
        assert_eq!(SortCriteria::TopRated.path(), "top_rated");
        assert_eq!(SortCriteria::TopRated.to_string(), "top_rated");
    }

    #[test]
    fn test_sort_criteria_from_str() {
        // Arrange & Act & Assert
        assert_eq!(
            "popular".parse::<SortCriteria>().unwrap(),
            SortCriteria::Popular
        );
        assert_eq!(
            "top_rated".parse::<SortCriteria>().unwrap(),
            SortCriteria::TopRated
        );
        assert_eq!(
            "top-rated".parse::<SortCriteria>().unwrap(),
            SortCriteria::TopRated
        );
    }

    #[test]
    fn test_sort_criteria_rejects_unknown() {
        // Arrange & Act
        let result = "latest".parse::<SortCriteria>();

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn test_youtube_video_resolves_url() {
        // Arrange
        let json = r#"{"key":"abc","name":"Trailer","site":"YouTube"}"#;

        // Act
        let video: Video = serde_json::from_str(json).unwrap();

        // Assert
        let url = video.resolved_url.unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_other_site_has_no_url() {
        // Arrange
        let json = r#"{"key":"abc","name":"Trailer","site":"Vimeo"}"#;

        // Act
        let video: Video = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(video.site, "Vimeo");
        assert!(video.resolved_url.is_none());
    }

    #[test]
    fn test_review_with_invalid_url_keeps_fields() {
        // Arrange
        let json = r#"{"author":"Jane","content":"Great.","url":"not a url"}"#;

        // Act
        let review: Review = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(review.author, "Jane");
        assert_eq!(review.content, "Great.");
        assert!(review.url.is_none());
    }

    #[test]
    fn test_review_with_valid_url() {
        // Arrange
        let json = r#"{"author":"Jane","content":"Great.","url":"https://www.themoviedb.org/review/58a2"}"#;

        // Act
        let review: Review = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            review.url.unwrap().as_str(),
            "https://www.themoviedb.org/review/58a2"
        );
    }

    #[test]
    fn test_movie_null_and_mistyped_fields_default() {
        // Arrange
        let json = r#"{"id":"550","title":null,"runtime":-3,"vote_average":"high","adult":1,"poster_path":null}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie, Movie::default());
        assert!(!movie.has_poster());
    }

    #[test]
    fn test_movie_genre_ids_mistyped_element_empties_list() {
        // Arrange
        let json = r#"{"id":1,"genre_ids":[18,"drama",53]}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 1);
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_released_on() {
        // Arrange
        let movie = Movie {
            release_date: String::from("1999-10-15"),
            ..Movie::default()
        };
        let undated = Movie::default();

        // Act & Assert
        assert_eq!(
            movie.released_on(),
            NaiveDate::from_ymd_opt(1999, 10, 15)
        );
        assert_eq!(undated.released_on(), None);
    }

    #[test]
    fn test_into_list_entry_drops_sub_resources() {
        // Arrange
        let movie = Movie {
            id: 9,
            videos: vec![Video {
                key: String::from("k"),
                name: String::from("n"),
                site: String::from("Vimeo"),
                resolved_url: None,
            }],
            ..Movie::default()
        };

        // Act
        let entry = movie.into_list_entry();

        // Assert
        assert_eq!(entry.id, 9);
        assert!(entry.videos.is_empty());
        assert!(entry.reviews.is_empty());
    }
}
