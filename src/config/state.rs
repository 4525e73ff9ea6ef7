// Application state module
// Read-only state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::wiki::Wiki;

/// Application state
///
/// Built once before the listener accepts anything and never mutated afterwards.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub wiki: Arc<Wiki>,
}

impl AppState {
    pub fn new(config: &Config, wiki: Wiki) -> Self {
        Self {
            config: config.clone(),
            wiki: Arc::new(wiki),
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
