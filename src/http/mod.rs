//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the wiki logic.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::{form_value, has_form_body};
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_redirect_response, set_server_header,
};
