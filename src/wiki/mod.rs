//! Wiki core
//!
//! Title validation, page storage, template rendering, and the handlers built
//! on top of them.

pub mod dispatch;
pub mod handlers;
pub mod page;
pub mod render;
pub mod store;
pub mod title;

pub use dispatch::dispatch;
pub use render::Templates;
pub use store::PageStore;
pub use title::Action;

/// Everything a page handler needs, shared read-only across requests
#[derive(Debug)]
pub struct Wiki {
    pub store: PageStore,
    pub templates: Templates,
}

impl Wiki {
    pub const fn new(store: PageStore, templates: Templates) -> Self {
        Self { store, templates }
    }
}
