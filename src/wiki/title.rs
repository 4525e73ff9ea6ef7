//! Page title extraction
//!
//! A request path reaches a handler only as a validated [`Title`]. The allowed
//! shape is `/<verb>/<title>` with the verb one of `edit`, `save`, `view` and the
//! title one or more ASCII alphanumerics.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static VALID_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(edit|save|view)/([a-zA-Z0-9]+)$").expect("route pattern is valid")
});

/// The path did not match the allowed route shape
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid page title")]
pub struct InvalidTitle;

/// Route verb captured from the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    /// Path prefix of the route, including both slashes
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::View => "/view/",
            Self::Edit => "/edit/",
            Self::Save => "/save/",
        }
    }

    fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// Validated page title; doubles as the on-disk filename stem
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Validate a bare title (no route prefix)
    pub fn parse(raw: &str) -> Result<Self, InvalidTitle> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidTitle)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of this page under another route, e.g. `/edit/Home`
    pub fn route(&self, action: Action) -> String {
        format!("{}{}", action.prefix(), self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Match a full request path and return its verb and title
pub fn parse_route(path: &str) -> Result<(Action, Title), InvalidTitle> {
    let caps = VALID_PATH.captures(path).ok_or(InvalidTitle)?;
    let action = caps
        .get(1)
        .and_then(|m| Action::from_verb(m.as_str()))
        .ok_or(InvalidTitle)?;
    let title = caps.get(2).ok_or(InvalidTitle)?;
    Ok((action, Title::parse(title.as_str())?))
}

/// Extract the page title from a request path such as `/view/Home`
pub fn extract_title(path: &str) -> Result<Title, InvalidTitle> {
    parse_route(path).map(|(_, title)| title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_valid_paths() {
        assert_eq!(extract_title("/view/Home").unwrap().as_str(), "Home");
        assert_eq!(extract_title("/edit/Page42").unwrap().as_str(), "Page42");
        assert_eq!(extract_title("/save/x").unwrap().as_str(), "x");
    }

    #[test]
    fn test_extract_rejects_bad_shapes() {
        for path in [
            "/view/",
            "/view",
            "/view/Home/extra",
            "/view/../etc",
            "/view/a.txt",
            "/view/with space",
            "/view/under_score",
            "/delete/Foo",
            "view/Home",
            "//view/Home",
            "/View/Home",
            "/view/Home/",
            "",
        ] {
            assert_eq!(extract_title(path), Err(InvalidTitle), "path: {path:?}");
        }
    }

    #[test]
    fn test_extract_rejects_non_ascii() {
        assert_eq!(extract_title("/view/Caf\u{e9}"), Err(InvalidTitle));
        assert_eq!(extract_title("/view/\u{664}\u{662}"), Err(InvalidTitle));
    }

    #[test]
    fn test_parse_route_action() {
        let (action, title) = parse_route("/save/Foo").unwrap();
        assert_eq!(action, Action::Save);
        assert_eq!(title.route(Action::View), "/view/Foo");
        assert_eq!(title.route(Action::Edit), "/edit/Foo");
    }

    #[test]
    fn test_title_parse() {
        assert!(Title::parse("abcXYZ019").is_ok());
        assert!(Title::parse("").is_err());
        assert!(Title::parse("a/b").is_err());
        assert!(Title::parse("..").is_err());
    }
}
