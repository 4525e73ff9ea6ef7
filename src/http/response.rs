//! HTTP response building module
//!
//! Provides builders for the status codes the wiki answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::Response;

/// Build 200 response carrying rendered HTML
pub fn build_html_response(content: Vec<u8>) -> Response<Full<Bytes>> {
    let content_length = content.len();

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 Found redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response carrying the failure message
pub fn build_500_response(message: &str) -> Response<Full<Bytes>> {
    let body = format!("{message}\n");
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Stamp the `Server` header on an outgoing response
pub fn set_server_header(resp: &mut Response<Full<Bytes>>, server_name: &str) {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            resp.headers_mut().insert("Server", value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid server name '{server_name}': {e}"
        )),
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
