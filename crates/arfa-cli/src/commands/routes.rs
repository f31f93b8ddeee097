//! `arfa routes`: print the route table a pages directory produces.
//!
//! The directory is scanned into placeholder modules, registered under the
//! configured `router.pages_root`, and built into a [`Router`] exactly as
//! the browser runtime would build it. Nothing is rendered.
//!
//! ```text
//! Routes (precedence order)
//!   /                ./pages/index.tsx
//!   /blog/[id]       ./pages/blog/[id].tsx        id
//!   /blog/[...slug]  ./pages/blog/[...slug].tsx   slug
//! Layouts
//!   /dashboard       guard → /login
//! ```

use arfa_adapters::PagesDir;
use arfa_core::application::{GuardPolicy, MatchReport, Router, RouterSummary};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    cli::{OutputFormat, RoutesArgs, RoutesFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// `routes --format json` document.
#[derive(Debug, Serialize)]
struct Listing<'a> {
    pages_dir: String,
    guard_policy: GuardPolicy,
    #[serde(flatten)]
    summary: &'a RouterSummary,
}

#[instrument(skip_all, fields(pages_dir = %args.pages_dir.display()))]
pub fn execute(args: RoutesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let scan = PagesDir::scan_as(&args.pages_dir, &config.router.pages_root)?;
    debug!(files = scan.files().len(), "pages scanned");

    let router = Router::builder()
        .pages_root(scan.prefix().as_str())
        .guard_policy(config.router.guard_policy)
        .build(&scan.modules())?;

    let format = match (args.format, output.format()) {
        (Some(format), _) => format,
        (None, OutputFormat::Json) => RoutesFormat::Json,
        (None, _) => RoutesFormat::Table,
    };

    match (args.match_path, format) {
        (Some(path), RoutesFormat::Json) => {
            output.json(&router.inspect(&normalize_pathname(&path)))?;
        }
        (Some(path), RoutesFormat::Table) => {
            let report = router.inspect(&normalize_pathname(&path));
            for line in match_lines(&report) {
                output.emit(&line)?;
            }
        }
        (None, RoutesFormat::Json) => {
            let summary = router.summary();
            output.json(&Listing {
                pages_dir: args.pages_dir.display().to_string(),
                guard_policy: router.guard_policy(),
                summary: &summary,
            })?;
        }
        (None, RoutesFormat::Table) => {
            let summary = router.summary();
            output.header("Routes (precedence order)")?;
            for line in route_lines(&summary) {
                output.emit(&line)?;
            }
            output.header("Layouts")?;
            for line in layout_lines(&summary) {
                output.emit(&line)?;
            }
            output.print(&output.dim(&special_files_line(&summary, router.guard_policy())))?;
        }
    }

    Ok(())
}

/// `blog/1?x#y` becomes `/blog/1`.
fn normalize_pathname(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

// ── Table rendering ───────────────────────────────────────────────────────────

fn route_lines(summary: &RouterSummary) -> Vec<String> {
    if summary.routes.is_empty() {
        return vec!["  (none)".into()];
    }
    let route_width = summary.routes.iter().map(|r| r.route.len()).max().unwrap_or(0);
    let file_width = summary.routes.iter().map(|r| r.file.len()).max().unwrap_or(0);

    summary
        .routes
        .iter()
        .map(|r| {
            let line = format!(
                "  {:route_width$}  {:file_width$}  {}",
                r.route,
                r.file,
                r.params.join(", ")
            );
            line.trim_end().to_owned()
        })
        .collect()
}

fn layout_lines(summary: &RouterSummary) -> Vec<String> {
    if summary.layouts.is_empty() {
        return vec!["  (none)".into()];
    }
    let width = summary.layouts.iter().map(|l| l.dir.len()).max().unwrap_or(0);

    summary
        .layouts
        .iter()
        .map(|l| match &l.guard_redirect {
            Some(to) => format!("  {:width$}  guard \u{2192} {to}", l.dir),
            None => format!("  {}", l.dir),
        })
        .collect()
}

fn special_files_line(summary: &RouterSummary, policy: GuardPolicy) -> String {
    let mark = |present: bool| if present { "yes" } else { "no" };
    format!(
        "_app: {}  404: {}  guards: {policy}",
        mark(summary.app),
        if summary.not_found { "custom" } else { "built-in" },
    )
}

fn match_lines(report: &MatchReport) -> Vec<String> {
    let mut lines = vec![format!("Path:    {}", report.pathname)];

    match &report.route {
        Some(route) => lines.push(format!("Route:   {} ({})", route.route, route.file)),
        None => lines.push("Route:   none, not-found page renders".into()),
    }

    if report.params.is_empty() {
        lines.push("Params:  -".into());
    } else {
        let params: Vec<String> = report
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        lines.push(format!("Params:  {}", params.join(" ")));
    }

    if report.layouts.is_empty() {
        lines.push("Layouts: -".into());
    } else {
        let chain: Vec<String> = report
            .layouts
            .iter()
            .map(|l| match &l.guard_redirect {
                Some(to) => format!("{} (guard \u{2192} {to})", l.dir),
                None => l.dir.clone(),
            })
            .collect();
        lines.push(format!("Layouts: {}", chain.join(" > ")));
    }

    lines
}
