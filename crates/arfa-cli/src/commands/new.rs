//! `arfa new`: scaffold a starter app into `./<name>`.
//!
//! Resolves the name (argument, prompt, or `project.default_name`), picks
//! the template source, then hands off to [`ScaffoldService`]. Validation,
//! the empty-directory rule, manifest patching and rollback all live there.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use arfa_adapters::{BuiltinTemplate, DirectoryTemplate, LocalFilesystem};
use arfa_core::application::{ApplicationError, ScaffoldPlan, ScaffoldService};
use arfa_core::application::ports::TemplateSource;
use arfa_core::domain::{DomainError, ProjectName};
use arfa_core::error::ArfaError;
use tracing::{debug, info, instrument};

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `arfa new` command.
///
/// 1. Resolve and validate the project name
/// 2. Build the template source and filesystem adapters
/// 3. `--dry-run`: print the plan and stop
/// 4. Scaffold with a progress bar
/// 5. Print next steps
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("<prompt>")))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let raw = resolve_name(&args, &config)?;
    let name = parse_name(&raw)?;

    let cwd = std::env::current_dir().with_cli_context(|| "failed to read current directory")?;
    let root = cwd.join(name.as_str());
    debug!(root = %root.display(), "target resolved");

    let service = ScaffoldService::new(
        template_source(args.template_dir.as_deref()),
        Box::new(LocalFilesystem::new()),
    );

    if args.dry_run {
        let plan = service.plan(&name, &root).map_err(from_core)?;
        return print_plan(&plan, &output);
    }

    output.header(&format!("Creating '{name}'..."))?;
    info!(project = %name, path = %root.display(), "scaffold started");

    let bar = output.progress(0);
    let report = service
        .scaffold_with_progress(&name, &root, |path, index, total| {
            bar.set_length(total as u64);
            bar.set_position(index as u64);
            let shown = path.strip_prefix(&root).unwrap_or(path);
            bar.set_message(shown.display().to_string());
        })
        .map_err(from_core);
    bar.finish_and_clear();
    let report = report?;

    output.success(&format!(
        "Created '{}' from {} ({} files)",
        report.project, report.template, report.files_written
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", report.project))?;
    output.print("  npm install")?;
    output.print("  npm run dev")?;

    Ok(())
}

// ── Name resolution ───────────────────────────────────────────────────────────

fn resolve_name(args: &NewArgs, config: &AppConfig) -> CliResult<String> {
    if let Some(name) = &args.name {
        return Ok(name.clone());
    }
    if args.yes || !std::io::stdin().is_terminal() {
        debug!(default = %config.project.default_name, "no name given, using default");
        return Ok(config.project.default_name.clone());
    }
    prompt_name(&config.project.default_name)
}

#[cfg(feature = "interactive")]
fn prompt_name(default: &str) -> CliResult<String> {
    use dialoguer::{Input, theme::ColorfulTheme};

    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Project name")
        .default(default.to_owned())
        .validate_with(|input: &String| -> Result<(), String> {
            ProjectName::parse(input.as_str())
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| {
            let interrupted = std::error::Error::source(&e)
                .and_then(|s| s.downcast_ref::<std::io::Error>())
                .is_some_and(|io| io.kind() == std::io::ErrorKind::Interrupted);
            if interrupted {
                CliError::Cancelled
            } else {
                CliError::InvalidInput {
                    message: "failed to read project name".into(),
                    source: Some(Box::new(e)),
                }
            }
        })
}

#[cfg(not(feature = "interactive"))]
fn prompt_name(_default: &str) -> CliResult<String> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

fn parse_name(raw: &str) -> CliResult<ProjectName> {
    ProjectName::parse(raw).map_err(|e| match e {
        DomainError::InvalidProjectName { name, reason } => {
            CliError::InvalidProjectName { name, reason }
        }
        other => CliError::Core(other.into()),
    })
}

// ── Adapters ──────────────────────────────────────────────────────────────────

fn template_source(dir: Option<&Path>) -> Box<dyn TemplateSource> {
    match dir {
        Some(dir) => Box::new(DirectoryTemplate::new(dir)),
        None => Box::new(BuiltinTemplate),
    }
}

/// Lift the core's "directory not empty" into the CLI variant.
fn from_core(err: ArfaError) -> CliError {
    match err {
        ArfaError::Application(ApplicationError::ProjectExists { path }) => {
            CliError::ProjectExists { path }
        }
        other => CliError::Core(other),
    }
}

// ── Dry run ───────────────────────────────────────────────────────────────────

fn print_plan(plan: &ScaffoldPlan, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: would create '{}' at {} from {}",
        plan.project,
        plan.root.display(),
        plan.template
    ))?;
    for file in &plan.files {
        let shown: PathBuf = file
            .path
            .strip_prefix(&plan.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| file.path.clone());
        output.emit(&format!("  {}", shown.display()))?;
    }
    output.info(&format!("{} files, nothing written", plan.files.len()))?;
    Ok(())
}
