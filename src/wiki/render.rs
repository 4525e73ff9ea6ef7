//! Template rendering
//!
//! The template set is parsed once at startup and never changes afterwards.
//! Templates are registered with an `.html` suffix so minijinja applies HTML
//! auto-escaping to page content.

use minijinja::Environment;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::page::Page;

/// Templates every wiki needs
pub const TEMPLATE_NAMES: [&str; 2] = ["view", "edit"];

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("cannot read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("template '{name}' failed: {source}")]
    Execute {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Fields exposed to templates
#[derive(Serialize)]
struct PageContext<'a> {
    title: &'a str,
    body: std::borrow::Cow<'a, str>,
}

impl<'a> From<&'a Page> for PageContext<'a> {
    fn from(page: &'a Page) -> Self {
        Self {
            title: page.title.as_str(),
            body: String::from_utf8_lossy(&page.body),
        }
    }
}

/// Precompiled, read-only template set
pub struct Templates {
    env: Environment<'static>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}

impl Templates {
    /// Load `<name>.html` for every name in [`TEMPLATE_NAMES`] from `dir`
    pub fn load_dir(dir: &Path) -> Result<Self, TemplateLoadError> {
        let mut sources = Vec::with_capacity(TEMPLATE_NAMES.len());
        for name in TEMPLATE_NAMES {
            let path = dir.join(file_name(name));
            let source = std::fs::read_to_string(&path)
                .map_err(|source| TemplateLoadError::Read { path, source })?;
            sources.push((name.to_string(), source));
        }
        Self::from_sources(sources)
    }

    /// Compile templates from `(name, source)` pairs
    pub fn from_sources<I>(sources: I) -> Result<Self, TemplateLoadError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template_owned(file_name(&name), source)
                .map_err(|source| TemplateLoadError::Parse { name, source })?;
        }
        Ok(Self { env })
    }

    /// Render `name` for `page` directly into `out`.
    ///
    /// On error, part of the output may already be in `out`.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        page: &Page,
    ) -> Result<(), RenderError> {
        let template = self
            .env
            .get_template(&file_name(name))
            .map_err(|_| RenderError::UnknownTemplate(name.to_string()))?;
        template
            .render_captured_to(PageContext::from(page), out)
            .map(|_| ())
            .map_err(|source| RenderError::Execute {
                name: name.to_string(),
                source,
            })
    }
}

fn file_name(name: &str) -> String {
    format!("{name}.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::title::Title;

    fn templates(view: &str, edit: &str) -> Templates {
        Templates::from_sources([
            ("view".to_string(), view.to_string()),
            ("edit".to_string(), edit.to_string()),
        ])
        .unwrap()
    }

    fn page(title: &str, body: &str) -> Page {
        Page::new(Title::parse(title).unwrap(), body)
    }

    #[test]
    fn test_render_substitutes_fields() {
        let t = templates(
            "<h1>{{ title }}</h1><div>{{ body }}</div>",
            "{{ title }}:{{ body }}",
        );
        let mut out = Vec::new();
        t.render(&mut out, "view", &page("Home", "hi there")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<h1>Home</h1><div>hi there</div>"
        );
    }

    #[test]
    fn test_render_escapes_html() {
        let t = templates("{{ body }}", "<textarea>{{ body }}</textarea>");
        let mut out = Vec::new();
        t.render(&mut out, "edit", &page("X", "<script>&")).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("&lt;script&gt;&amp;"), "got: {html}");
    }

    #[test]
    fn test_render_unknown_template() {
        let t = templates("v", "e");
        let mut out = Vec::new();
        let err = t.render(&mut out, "missing", &page("X", "")).unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(n) if n == "missing"));
    }

    #[test]
    fn test_render_execution_error() {
        let t = templates("before {{ title + 1 }}", "e");
        let mut out = Vec::new();
        assert!(t.render(&mut out, "view", &page("X", "y")).is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Templates::from_sources([("view".to_string(), "{% if %}".to_string())])
            .unwrap_err();
        assert!(matches!(err, TemplateLoadError::Parse { name, .. } if name == "view"));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("view.html"), "V {{ title }}").unwrap();
        std::fs::write(dir.path().join("edit.html"), "E {{ title }}").unwrap();

        let t = Templates::load_dir(dir.path()).unwrap();
        let mut out = Vec::new();
        t.render(&mut out, "edit", &page("Foo", "")).unwrap();
        assert_eq!(out, b"E Foo");
    }

    #[test]
    fn test_load_dir_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("view.html"), "V").unwrap();

        let err = Templates::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateLoadError::Read { .. }));
    }
}
