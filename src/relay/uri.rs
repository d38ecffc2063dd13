//! Destination URL construction.

use axum::http::Uri;
use url::Url;

/// Error joining the target with a request path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriJoinError {
    #[error("invalid target URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("target URL cannot carry a path: {0}")]
    NotABase(String),
}

/// Path and query of an inbound request, as the client sent it.
pub fn request_uri(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// Append `path_and_query` to the path of `target`.
///
/// Empty segments are dropped so the result never contains `//`. A query on
/// the inbound request replaces the target's query; otherwise the target's
/// query is kept.
pub fn join_target(target: &str, path_and_query: &str) -> Result<Url, UriJoinError> {
    let mut url = Url::parse(target)?;
    if url.cannot_be_a_base() {
        return Err(UriJoinError::NotABase(target.to_string()));
    }

    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let mut joined = url.path().trim_end_matches('/').to_string();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        joined.push('/');
        joined.push_str(segment);
    }
    if joined.is_empty() || (path.ends_with('/') && !joined.ends_with('/')) {
        joined.push('/');
    }

    url.set_path(&joined);
    if query.is_some() {
        url.set_query(query);
    }
    url.set_fragment(None);
    Ok(url)
}
