//! Plan applicator - runs rewrite steps file by file
//!
//! This module provides high-level plan application that:
//! - Filters plans by the project's version
//! - Groups steps by canonical target path, keeping declaration order
//! - Treats each file as one transaction: read once, commit once, or not at all
//! - Reports a result for every step

use crate::config::schema::{RewriteDefinition, RewritePlan, Verify};
use crate::config::version::{matches_requirement, VersionError};
use crate::document::{CommitOutcome, Document};
use crate::edit::EditError;
use crate::safety::{SafetyError, WorkspaceGuard};
use crate::transform::TransformError;
use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a single rewrite step
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RewriteResult should be checked for success/failure"]
pub enum RewriteResult {
    /// Step ran; `occurrences` replacements were made in memory
    Applied { file: PathBuf, occurrences: usize },
    /// `unless_present` text was already in the document
    SkippedPresent { file: PathBuf },
    /// Plan's version_range excluded the project
    SkippedVersion { reason: String },
}

impl fmt::Display for RewriteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteResult::Applied { file, occurrences } => {
                write!(f, "Applied to {} ({} occurrences)", file.display(), occurrences)
            }
            RewriteResult::SkippedPresent { file } => {
                write!(f, "Skipped (already present) in {}", file.display())
            }
            RewriteResult::SkippedVersion { reason } => {
                write!(f, "Skipped (version): {}", reason)
            }
        }
    }
}

/// What happened to a target file as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Rewritten { bytes: usize },
    Unchanged,
    Failed,
}

/// Errors during plan application
#[derive(Debug)]
pub enum ApplicationError {
    Version(VersionError),
    /// Target path rejected by the workspace guard
    Safety { path: PathBuf, source: SafetyError },
    Io { path: PathBuf, source: EditError },
    /// This step failed
    Transform {
        file: PathBuf,
        source: TransformError,
    },
    /// Another step on the same file failed, so nothing was written
    Aborted { file: PathBuf, failed_step: String },
    /// Every step succeeded but the write did not
    Commit { file: PathBuf, reason: String },
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::Version(e) => write!(f, "version error: {}", e),
            ApplicationError::Safety { path, source } => {
                write!(f, "refusing to rewrite {}: {}", path.display(), source)
            }
            ApplicationError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            ApplicationError::Transform { file, source } => {
                write!(f, "{} in {}", source, file.display())
            }
            ApplicationError::Aborted { file, failed_step } => write!(
                f,
                "not written: step '{}' failed on {}",
                failed_step,
                file.display()
            ),
            ApplicationError::Commit { file, reason } => {
                write!(f, "failed to write {}: {}", file.display(), reason)
            }
        }
    }
}

impl std::error::Error for ApplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicationError::Version(e) => Some(e),
            ApplicationError::Safety { source, .. } => Some(source),
            ApplicationError::Io { source, .. } => Some(source),
            ApplicationError::Transform { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<VersionError> for ApplicationError {
    fn from(e: VersionError) -> Self {
        ApplicationError::Version(e)
    }
}

pub type StepOutcome = (String, Result<RewriteResult, ApplicationError>);

/// Everything one plan did.
#[derive(Debug, Default)]
pub struct PlanReport {
    /// One entry per step, in plan order
    pub steps: Vec<StepOutcome>,
    /// One entry per target file, in order of first appearance
    pub files: Vec<(PathBuf, FileStatus)>,
}

impl PlanReport {
    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Apply a rewrite plan to a workspace
///
/// # Arguments
///
/// * `plan` - The rewrite plan to apply
/// * `workspace_root` - Root directory of the front-end project
/// * `project_version` - Version from the project's `package.json`
pub fn apply_plan(plan: &RewritePlan, workspace_root: &Path, project_version: &str) -> PlanReport {
    match matches_requirement(project_version, plan.meta.version_range.as_deref()) {
        Ok(true) => {}
        Ok(false) => {
            let req = plan.meta.version_range.as_deref().unwrap_or("").trim();
            let reason =
                format!("project version {project_version} does not satisfy version_range {req}");
            return PlanReport {
                steps: plan
                    .rewrites
                    .iter()
                    .map(|step| {
                        (
                            step.id.clone(),
                            Ok(RewriteResult::SkippedVersion {
                                reason: reason.clone(),
                            }),
                        )
                    })
                    .collect(),
                files: Vec::new(),
            };
        }
        Err(e) => {
            return PlanReport {
                steps: plan
                    .rewrites
                    .iter()
                    .map(|step| (step.id.clone(), Err(ApplicationError::Version(e.clone()))))
                    .collect(),
                files: Vec::new(),
            };
        }
    }

    let guard = match WorkspaceGuard::new(workspace_root) {
        Ok(guard) => guard,
        Err(source) => {
            let kind = match &source {
                SafetyError::Canonicalize(e) => e.kind(),
                _ => io::ErrorKind::Other,
            };
            let message = source.to_string();
            return PlanReport {
                steps: plan
                    .rewrites
                    .iter()
                    .map(|step| {
                        let error = ApplicationError::Io {
                            path: workspace_root.to_path_buf(),
                            source: EditError::Io(io::Error::new(kind, message.clone())),
                        };
                        (step.id.clone(), Err(error))
                    })
                    .collect(),
                files: Vec::new(),
            };
        }
    };

    let targets = resolve_targets(plan, &guard, workspace_root);

    // (first step index, file, status) so files can be reported in plan order
    let mut files: Vec<(usize, PathBuf, FileStatus)> = Vec::new();
    let mut indexed: Vec<(usize, StepOutcome)> = Vec::with_capacity(plan.rewrites.len());

    for (idx, target, error) in targets.rejected {
        warn!(file = %target.display(), "rewrite target rejected: {}", error);
        if !files.iter().any(|(_, file, _)| *file == target) {
            files.push((idx, target, FileStatus::Failed));
        }
        indexed.push((idx, (plan.rewrites[idx].id.clone(), Err(error))));
    }

    for (path, steps) in targets.groups {
        let first = steps.first().map_or(0, |(idx, _)| *idx);
        let (status, outcomes) = apply_file(&path, &steps);
        files.push((first, path, status));
        indexed.extend(outcomes);
    }

    // Back to plan order
    files.sort_by_key(|(idx, _, _)| *idx);
    indexed.sort_by_key(|(idx, _)| *idx);
    PlanReport {
        steps: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
        files: files
            .into_iter()
            .map(|(_, file, status)| (file, status))
            .collect(),
    }
}

type IndexedSteps<'a> = Vec<(usize, &'a RewriteDefinition)>;

/// Plan steps sorted into per-file transactions.
struct Targets<'a> {
    /// Canonical path and its steps, files in order of first appearance
    groups: Vec<(PathBuf, IndexedSteps<'a>)>,
    /// Steps whose file could not be resolved or is off limits
    rejected: Vec<(usize, PathBuf, ApplicationError)>,
}

/// Resolve every step's file through the guard and group on the canonical
/// path, so two spellings of one file share a transaction.
fn resolve_targets<'a>(
    plan: &'a RewritePlan,
    guard: &WorkspaceGuard,
    workspace_root: &Path,
) -> Targets<'a> {
    let mut targets = Targets {
        groups: Vec::new(),
        rejected: Vec::new(),
    };

    for (idx, step) in plan.rewrites.iter().enumerate() {
        let target = target_path(plan.meta.workspace_relative, workspace_root, &step.file);
        match guard.validate_path(&target) {
            Ok(path) => match targets.groups.iter_mut().find(|(p, _)| *p == path) {
                Some((_, steps)) => steps.push((idx, step)),
                None => targets.groups.push((path, vec![(idx, step)])),
            },
            Err(SafetyError::Canonicalize(source)) => {
                let error = ApplicationError::Io {
                    path: target.clone(),
                    source: EditError::Io(source),
                };
                targets.rejected.push((idx, target, error));
            }
            Err(source) => {
                let error = ApplicationError::Safety {
                    path: target.clone(),
                    source,
                };
                targets.rejected.push((idx, target, error));
            }
        }
    }

    targets
}

/// Path a step's `file` names before canonicalization.
///
/// Relative paths resolve against the workspace root when the plan is
/// `workspace_relative`, otherwise against the current directory.
fn target_path(workspace_relative: bool, workspace_root: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if workspace_relative || file.is_absolute() {
        return workspace_root.join(file);
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(file),
        Err(_) => file.to_path_buf(),
    }
}

/// Fail the first step with `error`; the others never ran.
fn fail_first(
    path: &Path,
    steps: &[(usize, &RewriteDefinition)],
    error: ApplicationError,
) -> Vec<(usize, StepOutcome)> {
    let first = steps.first().map(|(_, s)| s.id.clone()).unwrap_or_default();
    let mut error = Some(error);
    steps
        .iter()
        .map(|(idx, step)| {
            let error = error.take().unwrap_or_else(|| ApplicationError::Aborted {
                file: path.to_path_buf(),
                failed_step: first.clone(),
            });
            (*idx, (step.id.clone(), Err(error)))
        })
        .collect()
}

/// Run every step for one file against a single snapshot.
fn apply_file(
    path: &Path,
    steps: &[(usize, &RewriteDefinition)],
) -> (FileStatus, Vec<(usize, StepOutcome)>) {
    let mut doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(source) => {
            let error = ApplicationError::Io {
                path: path.to_path_buf(),
                source,
            };
            return (FileStatus::Failed, fail_first(path, steps, error));
        }
    };

    let mut results: Vec<(usize, String, Result<RewriteResult, TransformError>)> = Vec::new();
    let mut failed_step = None;

    for (idx, step) in steps {
        let result = run_step(&mut doc, step, path);
        if result.is_err() {
            failed_step = Some(step.id.clone());
        }
        results.push((*idx, step.id.clone(), result));
        if failed_step.is_some() {
            break;
        }
    }

    if let Some(failed) = failed_step {
        warn!(file = %path.display(), step = %failed, "rewrite aborted; file left untouched");
        let mut outcomes: Vec<(usize, StepOutcome)> = Vec::with_capacity(steps.len());
        for (idx, step) in steps {
            let outcome = match results.iter().position(|(i, _, _)| i == idx) {
                Some(pos) if step.id == failed => {
                    let (_, id, result) = results.swap_remove(pos);
                    let error = match result {
                        Err(source) => ApplicationError::Transform {
                            file: path.to_path_buf(),
                            source,
                        },
                        Ok(_) => ApplicationError::Aborted {
                            file: path.to_path_buf(),
                            failed_step: failed.clone(),
                        },
                    };
                    (id, Err(error))
                }
                _ => (
                    step.id.clone(),
                    Err(ApplicationError::Aborted {
                        file: path.to_path_buf(),
                        failed_step: failed.clone(),
                    }),
                ),
            };
            outcomes.push((*idx, outcome));
        }
        return (FileStatus::Failed, outcomes);
    }

    match doc.commit() {
        Ok(outcome) => {
            let status = match outcome {
                CommitOutcome::Written { bytes } => {
                    info!(file = %path.display(), bytes, "file rewritten");
                    FileStatus::Rewritten { bytes }
                }
                CommitOutcome::Unchanged => {
                    info!(file = %path.display(), "no changes to write");
                    FileStatus::Unchanged
                }
            };
            let outcomes = results
                .into_iter()
                .map(|(idx, id, result)| {
                    let result = result.map_err(|source| ApplicationError::Transform {
                        file: path.to_path_buf(),
                        source,
                    });
                    (idx, (id, result))
                })
                .collect();
            (status, outcomes)
        }
        Err(source) => {
            let reason = source.to_string();
            let outcomes = steps
                .iter()
                .map(|(idx, step)| {
                    let error = ApplicationError::Commit {
                        file: path.to_path_buf(),
                        reason: reason.clone(),
                    };
                    (*idx, (step.id.clone(), Err(error)))
                })
                .collect();
            (FileStatus::Failed, outcomes)
        }
    }
}

fn run_step(
    doc: &mut Document,
    step: &RewriteDefinition,
    target: &Path,
) -> Result<RewriteResult, TransformError> {
    if let Some(verify) = &step.verify {
        check_verify(verify, doc)?;
    }

    if let Some(present) = &step.unless_present {
        if doc.text.contains(present.as_str()) {
            debug!(step = %step.id, "guard text present; skipping");
            return Ok(RewriteResult::SkippedPresent {
                file: target.to_path_buf(),
            });
        }
    }

    debug!(step = %step.id, kind = step.transform.kind(), "applying");
    let applied = step.transform.apply(&doc.text)?;
    doc.text = applied.text;
    Ok(RewriteResult::Applied {
        file: target.to_path_buf(),
        occurrences: applied.occurrences,
    })
}

fn check_verify(verify: &Verify, doc: &Document) -> Result<(), TransformError> {
    match verify {
        Verify::Contains { text } => {
            if doc.text.contains(text.as_str()) {
                Ok(())
            } else {
                Err(TransformError::NoMatch {
                    search: text.clone(),
                })
            }
        }
        Verify::Hash { expected, .. } => {
            let matches = verify
                .to_verification()
                .ok()
                .flatten()
                .is_some_and(|v| v.matches(&doc.text));
            if matches {
                Ok(())
            } else {
                Err(TransformError::VerifyMismatch {
                    expected: expected.clone(),
                    found: doc.fingerprint(),
                })
            }
        }
    }
}
