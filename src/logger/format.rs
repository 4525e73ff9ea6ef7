//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::{DateTime, Local};
use serde::Serialize;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Handling time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => serde_json::to_string(self).unwrap_or_default(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Substitute `$variables` in `pattern`.
    ///
    /// Supported: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time` (seconds),
    /// `$status`, `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and friends before $request
        let vars: [(&str, String); 11] = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".into())),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".into()),
            ),
        ];

        vars.iter()
            .fold(pattern.to_string(), |acc, (name, value)| acc.replace(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "POST".to_string(),
            "/save/Home".to_string(),
        );
        entry.query = Some("body=hi".to_string());
        entry.status = 302;
        entry.body_bytes = 14;
        entry.referer = Some("http://localhost:8080/edit/Home".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"POST /save/Home?body=hi HTTP/1.1\" 302 14"));
        assert!(log.ends_with("\"http://localhost:8080/edit/Home\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("\"POST /save/Home?body=hi HTTP/1.1\" 302 14"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("Mozilla"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["path"], "/save/Home");
        assert_eq!(value["status"], 302);
        assert_eq!(value["body_bytes"], 14);
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$request_method $request_uri -> $status in $request_time");
        // 1500us = 0.0015s, printed with 3 decimals
        assert!(log.starts_with("POST /save/Home?body=hi -> 302 in 0.00"), "got: {log}");
    }

    #[test]
    fn test_format_custom_missing_headers() {
        let entry = AccessLogEntry::new("::1".into(), "GET".into(), "/view/A".into());
        assert_eq!(entry.format("$http_referer|$http_user_agent"), "-|-");
    }
}
