//! Wiki page entity

use super::title::Title;

/// A page as loaded from or saved to the content directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// Page with no content yet; what the editor shows for a missing page
    pub const fn empty(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }
}
