//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route selection, access logging,
//! and the save route's method and body limits. Routes are chosen by path
//! prefix; the title gate in [`crate::wiki::dispatch`] runs before any other
//! check.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::wiki::{dispatch, handlers, Action};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Form field holding the page body on `/save/`
const BODY_FIELD: &str = "body";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let entry = state
        .access_log()
        .then(|| new_access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;
    http::set_server_header(&mut response, &state.config.http.server_name);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on its percent-decoded path prefix
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let path = decode_path(req.uri().path());
    let wiki = &state.wiki;

    match route_action(&path) {
        Some(Action::View) => dispatch(&path, |title| handlers::view(wiki, title)).await,
        Some(Action::Edit) => dispatch(&path, |title| handlers::edit(wiki, title)).await,
        Some(Action::Save) => {
            let http_cfg = &state.config.http;
            dispatch(&path, |title| async move {
                let rejected = check_save_method(req.method(), http_cfg.restrict_save_method)
                    .or_else(|| check_body_size(&req, http_cfg.max_body_size));
                if let Some(resp) = rejected {
                    return resp;
                }
                match read_page_body(req, http_cfg.max_body_size).await {
                    Ok(body) => handlers::save(wiki, title, body).await,
                    Err(resp) => resp,
                }
            })
            .await
        }
        None => http::build_404_response(),
    }
}

/// Decode `%XX` escapes; invalid UTF-8 turns into replacement characters
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Pick the route whose prefix the path starts with
fn route_action(path: &str) -> Option<Action> {
    [Action::View, Action::Edit, Action::Save]
        .into_iter()
        .find(|action| path.starts_with(action.prefix()))
}

/// Enforce POST on `/save/` when configured to
fn check_save_method(method: &Method, restrict: bool) -> Option<Response<Full<Bytes>>> {
    if !restrict || *method == Method::POST {
        return None;
    }
    logger::log_warning(&format!("Method not allowed on save route: {method}"));
    Some(http::build_405_response("POST"))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the `body` form value for a save; missing means empty
async fn read_page_body<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<Vec<u8>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let query = parts.uri.query();

    let form = if http::has_form_body(&parts.method, &parts.headers) {
        let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
        match Limited::new(body, limit).collect().await {
            Ok(collected) => Some(collected.to_bytes()),
            Err(e) if e.is::<LengthLimitError>() => {
                logger::log_warning(&format!("Form body exceeds {max_body_size} bytes"));
                return Err(http::build_413_response());
            }
            Err(e) => {
                logger::log_warning(&format!("Failed to read form body: {e}"));
                return Err(http::build_400_response());
            }
        }
    } else {
        None
    };

    let value = http::form_value(form.as_deref(), query, BODY_FIELD).unwrap_or_default();
    Ok(value.into_bytes())
}

fn new_access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
