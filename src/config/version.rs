//! Version gating for rewrite plans.
//!
//! A plan may declare `version_range = ">=1.4.0, <2.0.0"`; it only runs
//! against projects whose `package.json` version satisfies the range.

use semver::{Version, VersionReq};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum VersionError {
    /// Invalid version string (e.g., "not-a-version")
    InvalidVersion { value: String, source: String },
    /// Invalid version requirement (e.g., ">=bad")
    InvalidRequirement { value: String, source: String },
    /// `package.json` missing, unreadable, or without a `version` string
    Manifest { path: String, message: String },
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::InvalidVersion { value, source } => {
                write!(f, "invalid version '{}': {}", value, source)
            }
            VersionError::InvalidRequirement { value, source } => {
                write!(f, "invalid version requirement '{}': {}", value, source)
            }
            VersionError::Manifest { path, message } => {
                write!(f, "cannot read project version from {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for VersionError {}

/// Check if a version matches a requirement string
///
/// # Examples
///
/// ```
/// use text_rewriter::config::version::matches_requirement;
///
/// assert!(matches_requirement("1.4.0", Some(">=1.4.0")).unwrap());
/// assert!(!matches_requirement("1.3.9", Some(">=1.4.0")).unwrap());
///
/// // None requirement means "apply to all versions"
/// assert!(matches_requirement("1.0.0", None).unwrap());
/// ```
pub fn matches_requirement(
    version: &str,
    requirement: Option<&str>,
) -> Result<bool, VersionError> {
    let Some(req_str) = requirement else {
        return Ok(true);
    };

    let req_str = req_str.trim();
    if req_str.is_empty() {
        return Ok(true);
    }

    let version = Version::parse(version).map_err(|e| VersionError::InvalidVersion {
        value: version.to_string(),
        source: e.to_string(),
    })?;

    let req = VersionReq::parse(req_str).map_err(|e| VersionError::InvalidRequirement {
        value: req_str.to_string(),
        source: e.to_string(),
    })?;

    Ok(req.matches(&version))
}

/// Read the `version` field of `<workspace>/package.json`.
pub fn read_project_version(workspace: &Path) -> Result<String, VersionError> {
    let manifest = workspace.join("package.json");
    let manifest_error = |message: String| VersionError::Manifest {
        path: manifest.display().to_string(),
        message,
    };

    let contents = fs::read_to_string(&manifest).map_err(|e| manifest_error(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| manifest_error(e.to_string()))?;

    value
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| manifest_error("no \"version\" string".to_string()))
}
