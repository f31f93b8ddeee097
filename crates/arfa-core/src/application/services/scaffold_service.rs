//! Scaffold Service - creates a new project from the starter template.
//!
//! Workflow:
//! 1. Load and validate the template
//! 2. Check the target directory (missing or empty)
//! 3. Patch `package.json` with the project name
//! 4. Write every file, rolling back on failure

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateSource},
    },
    domain::{ProjectName, StarterTemplate, patch_package_json},
    error::ArfaResult,
};

/// A file about to be written, with its final content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Everything a scaffold run would write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub project: ProjectName,
    pub root: PathBuf,
    pub template: String,
    pub files: Vec<PlannedFile>,
}

/// Result of a finished scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub project: ProjectName,
    pub root: PathBuf,
    pub template: String,
    pub files_written: usize,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    templates: Box<dyn TemplateSource>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    pub fn new(templates: Box<dyn TemplateSource>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            templates,
            filesystem,
        }
    }

    /// Compute what would be written, without writing anything.
    #[instrument(skip_all, fields(project = %name, root = %root.display()))]
    pub fn plan(&self, name: &ProjectName, root: &Path) -> ArfaResult<ScaffoldPlan> {
        let template = self.templates.load()?;
        template.validate()?;
        info!(template = %template.name, files = template.file_count(), "Template loaded");

        self.check_target(root)?;

        let StarterTemplate {
            name: template_name,
            files,
        } = template;

        let files = files
            .into_iter()
            .map(|file| -> ArfaResult<PlannedFile> {
                let content = if file.is_manifest() {
                    patch_package_json(&file.content, name)?
                } else {
                    file.content
                };
                Ok(PlannedFile {
                    path: root.join(file.path.as_path()),
                    content,
                })
            })
            .collect::<ArfaResult<Vec<_>>>()?;

        Ok(ScaffoldPlan {
            project: name.clone(),
            root: root.to_path_buf(),
            template: template_name,
            files,
        })
    }

    /// Scaffold a new project at `root`.
    pub fn scaffold(&self, name: &ProjectName, root: &Path) -> ArfaResult<ScaffoldReport> {
        self.scaffold_with_progress(name, root, |_, _, _| {})
    }

    /// Scaffold, calling `on_file(path, index, total)` after each file.
    pub fn scaffold_with_progress(
        &self,
        name: &ProjectName,
        root: &Path,
        mut on_file: impl FnMut(&Path, usize, usize),
    ) -> ArfaResult<ScaffoldReport> {
        let plan = self.plan(name, root)?;
        self.write_plan(&plan, &mut on_file)?;

        info!(files = plan.files.len(), "Scaffold completed successfully");
        Ok(ScaffoldReport {
            project: plan.project,
            root: plan.root,
            template: plan.template,
            files_written: plan.files.len(),
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn check_target(&self, root: &Path) -> ArfaResult<()> {
        if self.filesystem.exists(root) && !self.filesystem.is_empty_dir(root) {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    /// Write the plan with rollback on failure.
    fn write_plan(
        &self,
        plan: &ScaffoldPlan,
        on_file: &mut dyn FnMut(&Path, usize, usize),
    ) -> ArfaResult<()> {
        let created_root = !self.filesystem.exists(&plan.root);

        match self.write_all(plan, on_file) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                if let Err(rollback) = self.rollback(&plan.root, created_root) {
                    warn!(error = %rollback, "Rollback failed");
                    return Err(ApplicationError::RollbackFailed {
                        path: plan.root.clone(),
                        reason: rollback.to_string(),
                    }
                    .into());
                }
                Err(e)
            }
        }
    }

    fn write_all(
        &self,
        plan: &ScaffoldPlan,
        on_file: &mut dyn FnMut(&Path, usize, usize),
    ) -> ArfaResult<()> {
        self.filesystem.create_dir_all(&plan.root)?;

        let total = plan.files.len();
        for (index, file) in plan.files.iter().enumerate() {
            if let Some(parent) = file.path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&file.path, &file.content)?;
            on_file(&file.path, index + 1, total);
        }

        Ok(())
    }

    /// Remove what was written; an originally empty directory is left
    /// empty rather than deleted.
    fn rollback(&self, root: &Path, created_root: bool) -> ArfaResult<()> {
        self.filesystem.remove_dir_all(root)?;
        if !created_root {
            self.filesystem.create_dir_all(root)?;
        }
        info!("Rollback successful");
        Ok(())
    }
}
