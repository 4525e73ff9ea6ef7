//! Logger module
//!
//! Provides logging utilities for the wiki server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, content_dir: &std::path::Path) {
    write_info("======================================");
    write_info("Wiki server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Content directory: {}", content_dir.display()));
    write_info(&format!("Templates: {}", config.wiki.template_dir));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    if config.http.restrict_save_method {
        write_info("Save route: POST only");
    }
    write_info("======================================\n");
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("\n[Shutdown] {reason}, no longer accepting connections"));
}
