//! Title gate in front of the page handlers
//!
//! Every handler that needs a page title is reached through [`dispatch`], so an
//! invalid path is answered with 404 before any handler or storage code runs.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::future::Future;

use super::title::{extract_title, Title};
use crate::http;

/// Run `handler` with the title extracted from `path`, or respond 404
pub async fn dispatch<F, Fut>(path: &str, handler: F) -> Response<Full<Bytes>>
where
    F: FnOnce(Title) -> Fut,
    Fut: Future<Output = Response<Full<Bytes>>>,
{
    match extract_title(path) {
        Ok(title) => handler(title).await,
        // Routine bad input, not a server fault
        Err(_) => http::build_404_response(),
    }
}
