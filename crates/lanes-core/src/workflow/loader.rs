//! Loading and validating workflow templates.
//!
//! Templates are TOML by default; a `.json` extension selects JSON. A
//! template is only returned once it validates: no partial templates.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::errors::WorkflowError;
use super::template::{WorkflowStep, WorkflowTemplate};

/// Load and validate the template at `path`.
pub fn load(path: &Path) -> Result<WorkflowTemplate, WorkflowError> {
    info!(event = "core.workflow.load_started", path = %path.display());

    let content = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();

    let result = if is_json(path) {
        parse_json(&content, &origin)
    } else {
        parse_toml(&content, &origin)
    };

    match &result {
        Ok(template) => info!(
            event = "core.workflow.load_completed",
            path = %path.display(),
            workflow = %template.name,
            steps = template.steps.len()
        ),
        Err(e) => warn!(
            event = "core.workflow.load_failed",
            path = %path.display(),
            error = %e
        ),
    }
    result
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn parse_toml(content: &str, origin: &str) -> Result<WorkflowTemplate, WorkflowError> {
    let template: WorkflowTemplate = toml::from_str(content).map_err(|e| WorkflowError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    validate(&template)?;
    Ok(template)
}

pub fn parse_json(content: &str, origin: &str) -> Result<WorkflowTemplate, WorkflowError> {
    let template: WorkflowTemplate =
        serde_json::from_str(content).map_err(|e| WorkflowError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    validate(&template)?;
    Ok(template)
}

/// Check a template's referential integrity.
///
/// Requires at least one step, unique step ids, unique task ids per loop,
/// a declared loop for every loop step and a declared agent for every
/// agent reference.
pub fn validate(template: &WorkflowTemplate) -> Result<(), WorkflowError> {
    if template.steps.is_empty() {
        return Err(WorkflowError::EmptyTemplate {
            name: template.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for step in &template.steps {
        if !seen.insert(step.id()) {
            return Err(WorkflowError::DuplicateStep {
                step: step.id().to_string(),
            });
        }
    }

    for (loop_name, tasks) in &template.loops {
        let mut task_ids = HashSet::new();
        for task in tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(WorkflowError::DuplicateTask {
                    loop_name: loop_name.clone(),
                    task: task.id.clone(),
                });
            }
        }
    }

    for step in &template.steps {
        if let WorkflowStep::Loop { id, .. } = step
            && !template.loops.contains_key(id)
        {
            return Err(WorkflowError::UnknownLoop { step: id.clone() });
        }

        if let Some(agent) = step.agent()
            && !template.agents.contains_key(agent)
        {
            return Err(WorkflowError::UnknownAgent {
                step: step.id().to_string(),
                agent: agent.to_string(),
            });
        }
    }

    Ok(())
}

/// A template found by [`list_templates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path: PathBuf,
    pub name: String,
    pub description: String,
}

/// Enumerate the valid templates in `dir`, sorted by file name.
///
/// A missing directory yields an empty list; invalid templates are skipped
/// with a warning.
pub fn list_templates(dir: &Path) -> Vec<TemplateEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml") || ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| match load(&path) {
            Ok(template) => Some(TemplateEntry {
                path,
                name: template.name,
                description: template.description,
            }),
            Err(e) => {
                warn!(
                    event = "core.workflow.template_skipped",
                    path = %path.display(),
                    error = %e
                );
                None
            }
        })
        .collect()
}
