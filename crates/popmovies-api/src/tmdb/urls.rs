//! Request URL construction for the TMDB endpoints.

use url::{ParseError, Url};

use super::error::Result;
use super::types::SortCriteria;

/// Default base URL for TMDB API v3.
const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default base URL for TMDB images.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// YouTube watch page.
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";

/// Movie catalog segment under the API root.
const MOVIE_SEGMENT: &str = "movie";

/// Poster width tier used for every poster URL.
pub const POSTER_SIZE: &str = "w780";

/// Sub-resources fetched together with movie details.
const APPENDED_SUB_RESOURCES: &str = "videos,reviews";

/// Builds absolute request URLs for the movie catalog.
///
/// Pure: holds only the parsed base URLs and never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbUrls {
    /// API root (`.../3/`).
    api_base: Url,
    /// Image root (`.../t/p/`).
    image_base: Url,
}

impl TmdbUrls {
    /// Creates a builder for the public TMDB hosts.
    ///
    /// # Errors
    ///
    /// Returns [`super::TmdbError::MalformedUrl`] if a default base URL fails to parse.
    pub fn new() -> Result<Self> {
        Ok(Self {
            api_base: Url::parse(DEFAULT_API_BASE_URL)?,
            image_base: Url::parse(DEFAULT_IMAGE_BASE_URL)?,
        })
    }

    /// Overrides the API root (for wiremock in tests).
    #[must_use]
    pub fn with_api_base(mut self, url: Url) -> Self {
        self.api_base = url;
        self
    }

    /// Overrides the image root.
    #[must_use]
    pub fn with_image_base(mut self, url: Url) -> Self {
        self.image_base = url;
        self
    }

    /// API root in use.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// `movie/{popular|top_rated}?api_key=...`
    ///
    /// # Errors
    ///
    /// Returns [`super::TmdbError::MalformedUrl`] if the API root cannot carry a path.
    pub fn movie_list_url(&self, sort: SortCriteria, api_key: &str) -> Result<Url> {
        let mut url = with_segments(&self.api_base, [MOVIE_SEGMENT, sort.path()])?;
        url.query_pairs_mut().append_pair("api_key", api_key);
        Ok(url)
    }

    /// `movie/{id}?api_key=...&append_to_response=videos,reviews`
    ///
    /// # Errors
    ///
    /// Returns [`super::TmdbError::MalformedUrl`] if the API root cannot carry a path.
    pub fn movie_details_url(&self, movie_id: u64, api_key: &str) -> Result<Url> {
        let id = movie_id.to_string();
        let mut url = with_segments(&self.api_base, [MOVIE_SEGMENT, id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("append_to_response", APPENDED_SUB_RESOURCES);
        Ok(url)
    }

    /// `{image root}/w780/{image_path}`
    ///
    /// An empty `image_path` yields the size directory itself; check
    /// [`super::Movie::has_poster`] first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TmdbError::MalformedUrl`] if the image root cannot carry a path.
    pub fn poster_url(&self, image_path: &str) -> Result<Url> {
        let segments = std::iter::once(POSTER_SIZE)
            .chain(image_path.split('/').filter(|segment| !segment.is_empty()));
        with_segments(&self.image_base, segments)
    }
}

/// `https://www.youtube.com/watch?v={video_key}`
///
/// # Errors
///
/// Returns [`super::TmdbError::MalformedUrl`] if the watch URL fails to parse.
pub fn youtube_url(video_key: &str) -> Result<Url> {
    let mut url = Url::parse(YOUTUBE_WATCH_URL)?;
    url.query_pairs_mut().append_pair("v", video_key);
    Ok(url)
}

/// Appends path segments to `base`, replacing a trailing empty segment.
fn with_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
