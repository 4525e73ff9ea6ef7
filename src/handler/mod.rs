//! Request handler module
//!
//! Responsible for request routing dispatch into the wiki handlers.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
