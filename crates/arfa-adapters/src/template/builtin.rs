//! The starter project compiled into the binary.

use arfa_core::application::ports::TemplateSource;
use arfa_core::domain::{StarterTemplate, TemplateFile};
use arfa_core::error::ArfaResult;
use tracing::debug;

macro_rules! starter_files {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/starter/", $path)))),*]
    };
}

/// Relative path and content of every starter file.
pub const STARTER_FILES: &[(&str, &str)] = starter_files![
    ".gitignore",
    "README.md",
    "index.html",
    "package.json",
    "tsconfig.json",
    "vite.config.ts",
    "src/main.tsx",
    "src/pages/_layout.tsx",
    "src/pages/index.tsx",
    "src/pages/about.tsx",
    "src/pages/login.tsx",
    "src/pages/404.tsx",
    "src/pages/blog/[id].tsx",
    "src/pages/dashboard/_layout.tsx",
    "src/pages/dashboard/index.tsx",
];

/// Vite + TypeScript starter with a few example pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplate;

impl BuiltinTemplate {
    pub const NAME: &'static str = "arfa-starter";

    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for BuiltinTemplate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn load(&self) -> ArfaResult<StarterTemplate> {
        let files = STARTER_FILES
            .iter()
            .map(|(path, content)| TemplateFile::new(*path, *content))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(files = files.len(), "loaded built-in starter");
        Ok(StarterTemplate::new(Self::NAME, files))
    }
}
