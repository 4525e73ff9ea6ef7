//! Page handlers: view, edit and save
//!
//! Each handler receives an already validated [`Title`] from the dispatcher.
//! A missing page is never an error here: view sends the user to the editor,
//! and edit shows an empty page.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::page::Page;
use super::store::StoreError;
use super::title::{Action, Title};
use super::Wiki;
use crate::http;
use crate::logger;

/// Show a page, or redirect to its editor when it cannot be loaded
pub async fn view(wiki: &Wiki, title: Title) -> Response<Full<Bytes>> {
    match wiki.store.load(&title).await {
        Ok(page) => render(wiki, "view", &page),
        Err(e) => {
            log_load_failure(&e);
            http::build_redirect_response(&title.route(Action::Edit))
        }
    }
}

/// Show the editor, blank when the page does not exist yet
pub async fn edit(wiki: &Wiki, title: Title) -> Response<Full<Bytes>> {
    let page = match wiki.store.load(&title).await {
        Ok(page) => page,
        Err(e) => {
            log_load_failure(&e);
            Page::empty(title)
        }
    };
    render(wiki, "edit", &page)
}

/// Persist `body` under `title` and redirect to the page
pub async fn save(wiki: &Wiki, title: Title, body: Vec<u8>) -> Response<Full<Bytes>> {
    let page = Page::new(title, body);
    match wiki.store.save(&page).await {
        Ok(()) => http::build_redirect_response(&page.title.route(Action::View)),
        Err(e) => {
            logger::log_error(&format!("Failed to save page '{}': {e}", page.title));
            http::build_500_response(&e.to_string())
        }
    }
}

fn render(wiki: &Wiki, template: &str, page: &Page) -> Response<Full<Bytes>> {
    let mut out = Vec::new();
    match wiki.templates.render(&mut out, template, page) {
        Ok(()) => http::build_html_response(out),
        Err(e) => {
            logger::log_error(&format!("Failed to render page '{}': {e}", page.title));
            http::build_500_response(&e.to_string())
        }
    }
}

fn log_load_failure(err: &StoreError) {
    // Absence is the normal "create it" path; anything else is worth a look
    if let StoreError::Io { .. } = err {
        logger::log_warning(&format!("Failed to load page: {err}"));
    }
}
