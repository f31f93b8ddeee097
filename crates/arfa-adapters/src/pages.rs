//! Pages directory scanner.
//!
//! Turns a `pages/` directory on disk into [`RouteModules`] so a route table
//! can be built and inspected without a bundler. Modules are placeholders:
//! pages render their own file path, layouts pass their children through.
//!
//! A layout that declares `export function protect` gets a guard. The guard
//! always allows; only its `protectRedirect` target is read from the source.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use arfa_core::application::ApplicationError;
use arfa_core::domain::{
    DEFAULT_PAGES_ROOT, LayoutModule, Node, PagesRoot, RouteFile, RouteModules,
};
use arfa_core::error::ArfaResult;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

static PROTECT_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:async\s+)?(?:function\s+protect\b|(?:const|let)\s+protect\s*=)")
        .expect("static regex")
});

static PROTECT_REDIRECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"export\s+(?:const|let)\s+protectRedirect\s*(?::\s*string\s*)?=\s*["'`]([^"'`]*)["'`]"#)
        .expect("static regex")
});

/// Redirect used when a layout guards without naming a target.
pub const DEFAULT_GUARD_REDIRECT: &str = "/";

const EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// What kind of module a scanned file registers as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageFileKind {
    Page,
    Layout,
    App,
    NotFound,
}

/// One module found under the pages directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFile {
    /// Registration key, e.g. `./pages/blog/[id].tsx`.
    pub module_path: String,
    pub kind: PageFileKind,
    /// `protectRedirect` of a guarded layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard_redirect: Option<String>,
}

/// Result of scanning a pages directory.
#[derive(Debug, Clone)]
pub struct PagesDir {
    root: PathBuf,
    prefix: PagesRoot,
    files: Vec<PageFile>,
}

impl PagesDir {
    /// Walk `root` and collect every script module, sorted by path, keyed
    /// under `./pages`.
    pub fn scan(root: &Path) -> ArfaResult<Self> {
        Self::scan_as(root, DEFAULT_PAGES_ROOT)
    }

    /// Like [`PagesDir::scan`], keying modules under `prefix` instead.
    ///
    /// Declaration files (`*.d.ts`) are skipped.
    #[instrument(fields(root = %root.display()))]
    pub fn scan_as(root: &Path, prefix: &str) -> ArfaResult<Self> {
        if !root.is_dir() {
            return Err(ApplicationError::NotFound {
                path: root.to_path_buf(),
            }
            .into());
        }

        let pages_root = PagesRoot::new(prefix);
        let mut files = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() || !is_script(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let module_path = module_key(pages_root.as_str(), relative);

            let kind = match RouteFile::classify(&pages_root.strip(&module_path)) {
                RouteFile::NotFound => PageFileKind::NotFound,
                RouteFile::App => PageFileKind::App,
                RouteFile::Layout { .. } => PageFileKind::Layout,
                RouteFile::Page => PageFileKind::Page,
            };
            let guard_redirect = match kind {
                PageFileKind::Layout => read_guard(entry.path()),
                _ => None,
            };

            debug!(module = %module_path, ?kind, "found module");
            files.push(PageFile {
                module_path,
                kind,
                guard_redirect,
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            prefix: pages_root,
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prefix the module keys were built with.
    pub fn prefix(&self) -> &PagesRoot {
        &self.prefix
    }

    pub fn files(&self) -> &[PageFile] {
        &self.files
    }

    /// Placeholder modules keyed under [`PagesDir::prefix`].
    pub fn modules(&self) -> RouteModules {
        let mut modules = RouteModules::new();
        for file in &self.files {
            let key = file.module_path.clone();
            modules = match file.kind {
                PageFileKind::Page | PageFileKind::NotFound => {
                    let label = key.clone();
                    modules.page(key, move |_| Node::text(label.clone()))
                }
                PageFileKind::Layout => {
                    let mut layout = LayoutModule::new(|props| props.children);
                    if let Some(redirect) = &file.guard_redirect {
                        layout = layout.with_guard(|| true, redirect.clone());
                    }
                    modules.layout(key, layout)
                }
                PageFileKind::App => modules.app(key, |props| props.component.render()),
            };
        }
        modules
    }
}

fn is_script(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

fn module_key(prefix: &str, relative: &Path) -> String {
    let mut key = String::from(prefix);
    for component in relative.components() {
        key.push('/');
        key.push_str(&component.as_os_str().to_string_lossy());
    }
    key
}

/// `Some(redirect)` when the layout source exports `protect`.
fn read_guard(path: &Path) -> Option<String> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read layout");
            return None;
        }
    };
    if !PROTECT_FN.is_match(&source) {
        return None;
    }
    let redirect = PROTECT_REDIRECT
        .captures(&source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| DEFAULT_GUARD_REDIRECT.to_owned());
    Some(redirect)
}
