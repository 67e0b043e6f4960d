//! Response body decoding and lenient field deserializers.

use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::{Result, TmdbError};
use super::types::{Movie, MoviePage};

/// The only `status_code` TMDB uses for a successful read.
pub const SUCCESS_STATUS_CODE: i64 = 1;

/// Deserializes any value, falling back to `T::default()` when it does not fit.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserializes a JSON array, falling back to an empty list when the value
/// is not an array or any element fails to decode.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_list(value))
}

/// Deserializes the `results` array of an appended sub-resource
/// (`{"results": [...]}`), with the same fallback as [`lenient_list`].
pub(crate) fn nested_results<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let results = match value {
        Value::Object(mut map) => map.remove("results").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    Ok(decode_list(results))
}

/// Serializes a sub-resource list back into its `{"results": [...]}` wrapper,
/// so [`nested_results`] reads it back unchanged.
#[allow(clippy::ptr_arg)]
pub(crate) fn serialize_results<S, T>(
    items: &Vec<T>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("results", items)?;
    map.end()
}

/// Deserializes the `results` array of a movie list envelope.
///
/// A missing or non-array value yields an empty list. An entry that is not
/// a movie object fails the whole document.
pub(crate) fn results_array<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        items @ Value::Array(_) => serde_json::from_value(items).map_err(de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

fn decode_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match serde_json::from_value::<Vec<T>>(value) {
        Ok(items) => items,
        Err(e) => {
            tracing::debug!(error = %e, "discarding malformed list");
            Vec::new()
        }
    }
}

/// Parses `body` as a JSON object.
fn parse_object(body: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TmdbError::Decode(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TmdbError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Checks the TMDB in-body status convention.
///
/// A document whose `status_code` is present and differs from
/// [`SUCCESS_STATUS_CODE`] is an API error, whatever else it contains.
///
/// # Errors
///
/// - [`TmdbError::Api`] for a non-success `status_code`.
/// - [`TmdbError::Decode`] if `status_code` is not an integer.
pub fn check_response_error(document: &Map<String, Value>) -> Result<()> {
    let Some(raw_code) = document.get("status_code") else {
        return Ok(());
    };
    let code = raw_code.as_i64().ok_or_else(|| {
        TmdbError::Decode(format!(
            "status_code must be an integer, got {}",
            json_kind(raw_code)
        ))
    })?;
    if code == SUCCESS_STATUS_CODE {
        return Ok(());
    }
    let message = document
        .get("status_message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Err(TmdbError::Api {
        code,
        message: String::from(message),
    })
}

/// Decodes a `movie/{id}` body, including appended videos and reviews.
///
/// # Errors
///
/// Returns [`TmdbError::Decode`] if the body is not a JSON object and
/// [`TmdbError::Api`] if it carries a non-success `status_code`.
pub fn parse_movie_details(body: &str) -> Result<Movie> {
    let document = parse_object(body)?;
    check_response_error(&document)?;
    serde_json::from_value(Value::Object(document)).map_err(|e| TmdbError::Decode(e.to_string()))
}

/// Decodes a `movie/popular` or `movie/top_rated` body, envelope included.
///
/// # Errors
///
/// Same as [`parse_movie_details`].
pub fn parse_movie_page(body: &str) -> Result<MoviePage> {
    let document = parse_object(body)?;
    check_response_error(&document)?;
    let page: MoviePage = serde_json::from_value(Value::Object(document))
        .map_err(|e| TmdbError::Decode(e.to_string()))?;
    Ok(MoviePage {
        results: page.results.into_iter().map(Movie::into_list_entry).collect(),
        ..page
    })
}

/// Decodes a movie list body into its `results`, in response order.
///
/// A missing `results` array yields an empty list, not an error. An entry
/// that is not a JSON object is a decode error.
///
/// # Errors
///
/// Same as [`parse_movie_details`].
pub fn parse_movie_list(body: &str) -> Result<Vec<Movie>> {
    parse_movie_page(body).map(|page| page.results)
}
