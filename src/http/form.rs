//! Form value lookup
//!
//! Values from an urlencoded request body win over the same key in the URL
//! query string. A body is only considered form data when the request carries
//! `Content-Type: application/x-www-form-urlencoded`.

use hyper::header::{HeaderMap, CONTENT_TYPE};
use hyper::Method;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Whether a request with this method and headers carries an urlencoded form body
pub fn has_form_body(method: &Method, headers: &HeaderMap) -> bool {
    if !matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        return false;
    }
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// First value for `key`, looked up in the form body then in the query string
pub fn form_value(form_body: Option<&[u8]>, query: Option<&str>, key: &str) -> Option<String> {
    form_body
        .and_then(|body| first_value(body, key))
        .or_else(|| query.and_then(|q| first_value(q.as_bytes(), key)))
}

fn first_value(encoded: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_body_value_decoded() {
        let body = b"body=hello+world%21&other=1";
        assert_eq!(
            form_value(Some(body), None, "body").as_deref(),
            Some("hello world!")
        );
    }

    #[test]
    fn test_body_wins_over_query() {
        assert_eq!(
            form_value(Some(b"body=form"), Some("body=query"), "body").as_deref(),
            Some("form")
        );
        assert_eq!(
            form_value(Some(b"x=1"), Some("body=query"), "body").as_deref(),
            Some("query")
        );
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(form_value(None, None, "body"), None);
        assert_eq!(form_value(Some(b""), Some(""), "body"), None);
    }

    #[test]
    fn test_has_form_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        assert!(has_form_body(&Method::POST, &headers));
        assert!(!has_form_body(&Method::GET, &headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!has_form_body(&Method::POST, &headers));
        assert!(!has_form_body(&Method::POST, &HeaderMap::new()));
    }
}
