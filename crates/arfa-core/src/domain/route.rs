//! Route patterns derived from page file paths.
//!
//! A file such as `./pages/blog/[id].tsx` becomes the pattern `/blog/[id]`:
//! the pages root and extension are stripped and a trailing `/index`
//! collapses into its directory. Bracketed segments are parameters:
//!
//! - `[name]` matches exactly one path component
//! - `[...name]` matches one or more remaining components
//!
//! Anything that does not parse as a bracket segment is matched literally.

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::error::DomainError;
use super::module::PageComponent;
use super::params::{ParamValue, Params};

/// Default prefix stripped from registered file paths.
pub const DEFAULT_PAGES_ROOT: &str = "./pages";

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(t|j)sx?$").expect("static regex"));

static PARAM_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\.\.\.)?(.+?)\]$").expect("static regex"));

/// The directory prefix that registered file paths are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesRoot(String);

impl PagesRoot {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self(root.trim_end_matches('/').to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip the root prefix and the script extension.
    ///
    /// Index files are *not* collapsed here; special-file detection runs on
    /// this form.
    pub fn strip(&self, file_path: &str) -> String {
        let relative = file_path.strip_prefix(self.0.as_str()).unwrap_or(file_path);
        EXTENSION.replace(relative, "").into_owned()
    }
}

impl Default for PagesRoot {
    fn default() -> Self {
        Self::new(DEFAULT_PAGES_ROOT)
    }
}

/// What a registered file is, judged by its stripped path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFile {
    NotFound,
    App,
    Layout { dir: String },
    Page,
}

impl RouteFile {
    pub fn classify(stripped: &str) -> Self {
        if stripped == "/404" {
            Self::NotFound
        } else if stripped == "/_app" {
            Self::App
        } else if let Some(dir) = stripped.strip_suffix("/_layout") {
            Self::Layout {
                dir: if dir.is_empty() { "/".into() } else { dir.into() },
            }
        } else {
            Self::Page
        }
    }
}

/// Collapse a trailing `/index` into its directory; the root index is `/`.
pub fn collapse_index(stripped: &str) -> String {
    let path = stripped.strip_suffix("/index").unwrap_or(stripped);
    if path.is_empty() { "/".into() } else { path.into() }
}

/// Parent directory of a stripped file path; `/` at the root.
pub fn parent_dir(stripped: &str) -> String {
    match stripped.rfind('/') {
        Some(0) | None => "/".into(),
        Some(idx) => stripped[..idx].into(),
    }
}

/// Non-empty path components of a pathname or pattern.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// One component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSegment {
    Static(String),
    Dynamic(String),
    CatchAll(String),
}

impl RouteSegment {
    pub fn parse(segment: &str) -> Self {
        match PARAM_SEGMENT.captures(segment) {
            Some(caps) => {
                let name = caps[2].to_owned();
                if caps.get(1).is_some() {
                    Self::CatchAll(name)
                } else {
                    Self::Dynamic(name)
                }
            }
            None => Self::Static(segment.to_owned()),
        }
    }

    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Dynamic(name) | Self::CatchAll(name) => Some(name),
        }
    }

    fn regex_source(&self) -> String {
        match self {
            Self::Static(literal) => regex::escape(literal),
            Self::Dynamic(_) => "([^/]+)".into(),
            Self::CatchAll(_) => "(.+)".into(),
        }
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    route_path: String,
    segments: Vec<RouteSegment>,
    regex: Option<Regex>,
}

impl RoutePattern {
    /// Compile a normalized route path such as `/blog/[...slug]`.
    ///
    /// Only dynamic patterns get a regex; static ones match by string
    /// equality.
    pub fn parse(route_path: &str) -> Result<Self, DomainError> {
        let segments: Vec<RouteSegment> = path_segments(route_path).map(RouteSegment::parse).collect();

        if segments.is_empty() {
            return Ok(Self {
                route_path: "/".into(),
                segments,
                regex: None,
            });
        }

        let dynamic = segments.iter().any(|s| s.param_name().is_some());
        let regex = if dynamic {
            let body: Vec<String> = segments.iter().map(RouteSegment::regex_source).collect();
            let source = format!("^/{}/?$", body.join("/"));
            let regex = Regex::new(&source).map_err(|e| DomainError::InvalidRoutePattern {
                route: route_path.into(),
                reason: e.to_string(),
            })?;
            Some(regex)
        } else {
            None
        };

        Ok(Self {
            route_path: route_path.into(),
            segments,
            regex,
        })
    }

    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn is_dynamic(&self) -> bool {
        self.regex.is_some()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Parameter names in segment order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(RouteSegment::param_name)
    }

    /// Match a pathname against a dynamic pattern and decode its captures.
    ///
    /// Always `None` for static patterns.
    pub fn captures(&self, pathname: &str) -> Option<Params> {
        let caps = self.regex.as_ref()?.captures(pathname)?;
        let mut params = Params::new();
        for (idx, name) in self.param_names().enumerate() {
            let raw = caps.get(idx + 1).map_or("", |m| m.as_str());
            let value = if raw.contains('/') {
                ParamValue::Many(raw.split('/').map(decode).collect())
            } else {
                ParamValue::One(decode(raw))
            };
            params.insert(name, value);
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route_path)
    }
}

/// Percent-decode one captured component; malformed sequences decode
/// lossily instead of failing the navigation.
fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// A page registered in the route table.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    file_path: String,
    dir_path: String,
    pattern: RoutePattern,
    component: PageComponent,
}

impl RouteRecord {
    /// Build a record from a registered file path.
    pub fn from_file(
        file_path: &str,
        root: &PagesRoot,
        component: PageComponent,
    ) -> Result<Self, DomainError> {
        let stripped = root.strip(file_path);
        let pattern = RoutePattern::parse(&collapse_index(&stripped))?;

        Ok(Self {
            file_path: file_path.into(),
            dir_path: parent_dir(&stripped),
            pattern,
            component,
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn route_path(&self) -> &str {
        self.pattern.route_path()
    }

    pub fn dir_path(&self) -> &str {
        &self.dir_path
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn is_dynamic(&self) -> bool {
        self.pattern.is_dynamic()
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.pattern.param_names().collect()
    }

    pub fn component(&self) -> &PageComponent {
        &self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vnode::Node;

    fn record(path: &str) -> RouteRecord {
        RouteRecord::from_file(path, &PagesRoot::default(), PageComponent::new(|_| Node::Empty))
            .unwrap()
    }

    #[test]
    fn strips_root_extension_and_index() {
        assert_eq!(record("./pages/index.tsx").route_path(), "/");
        assert_eq!(record("./pages/blog/index.jsx").route_path(), "/blog");
        assert_eq!(record("./pages/about.ts").route_path(), "/about");
        assert_eq!(record("./pages/blog/[id].js").route_path(), "/blog/[id]");
    }

    #[test]
    fn dir_path_is_file_parent() {
        assert_eq!(record("./pages/index.tsx").dir_path(), "/");
        assert_eq!(record("./pages/about.tsx").dir_path(), "/");
        assert_eq!(record("./pages/blog/index.tsx").dir_path(), "/blog");
        assert_eq!(record("./pages/blog/[id].tsx").dir_path(), "/blog");
    }

    #[test]
    fn classifies_special_files() {
        let root = PagesRoot::default();
        assert_eq!(RouteFile::classify(&root.strip("./pages/404.tsx")), RouteFile::NotFound);
        assert_eq!(RouteFile::classify(&root.strip("./pages/_app.tsx")), RouteFile::App);
        assert_eq!(
            RouteFile::classify(&root.strip("./pages/_layout.tsx")),
            RouteFile::Layout { dir: "/".into() }
        );
        assert_eq!(
            RouteFile::classify(&root.strip("./pages/dashboard/_layout.tsx")),
            RouteFile::Layout {
                dir: "/dashboard".into()
            }
        );
        assert_eq!(RouteFile::classify(&root.strip("./pages/blog/404.tsx")), RouteFile::Page);
    }

    #[test]
    fn parses_param_segments() {
        assert_eq!(RouteSegment::parse("[id]"), RouteSegment::Dynamic("id".into()));
        assert_eq!(RouteSegment::parse("[...slug]"), RouteSegment::CatchAll("slug".into()));
        assert_eq!(RouteSegment::parse("about"), RouteSegment::Static("about".into()));
    }

    #[test]
    fn malformed_brackets_are_literal() {
        for seg in ["[id", "id]", "[]", "x[id]"] {
            assert_eq!(RouteSegment::parse(seg), RouteSegment::Static(seg.into()), "{seg}");
        }
        let pattern = RoutePattern::parse("/post/[id").unwrap();
        assert!(!pattern.is_dynamic());
    }

    #[test]
    fn single_param_captures_one_decoded_component() {
        let pattern = RoutePattern::parse("/blog/[id]").unwrap();
        let params = pattern.captures("/blog/42").unwrap();
        assert_eq!(params.get_str("id"), Some("42"));

        let params = pattern.captures("/blog/hello%20world/").unwrap();
        assert_eq!(params.get_str("id"), Some("hello world"));

        assert!(pattern.captures("/blog/a/b").is_none());
        assert!(pattern.captures("/blog").is_none());
    }

    #[test]
    fn catch_all_splits_and_decodes_components() {
        let pattern = RoutePattern::parse("/docs/[...slug]").unwrap();
        let params = pattern.captures("/docs/a/b%2Fc/d").unwrap();
        assert_eq!(
            params.get("slug"),
            Some(&ParamValue::Many(vec!["a".into(), "b/c".into(), "d".into()]))
        );

        let params = pattern.captures("/docs/only").unwrap();
        assert_eq!(params.get_str("slug"), Some("only"));
    }

    #[test]
    fn literal_segments_are_regex_escaped() {
        let pattern = RoutePattern::parse("/v1.0/[id]").unwrap();
        assert!(pattern.captures("/v1.0/7").is_some());
        assert!(pattern.captures("/v1x0/7").is_none());
    }

    #[test]
    fn malformed_percent_encoding_decodes_lossily() {
        let pattern = RoutePattern::parse("/q/[term]").unwrap();
        let params = pattern.captures("/q/%E0%A4").unwrap();
        assert_eq!(params.get_str("term"), Some("\u{FFFD}"));
    }

    #[test]
    fn param_names_follow_segment_order() {
        let pattern = RoutePattern::parse("/[org]/repos/[repo]/[...path]").unwrap();
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), ["org", "repo", "path"]);
        assert_eq!(pattern.segment_count(), 4);
    }
}
