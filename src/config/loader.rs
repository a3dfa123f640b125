//! Reading rewrite plans from TOML.

use crate::config::schema::{RewritePlan, ValidationError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a plan's text came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOrigin {
    Inline,
    File(PathBuf),
}

impl fmt::Display for PlanOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOrigin::Inline => f.write_str("<inline>"),
            PlanOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read plan {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    /// Malformed TOML, or a shape the schema does not accept
    #[error("plan {origin} does not parse: {source}")]
    Parse {
        origin: PlanOrigin,
        source: toml_edit::de::Error,
    },

    #[error("plan {origin} is invalid: {source}")]
    Invalid {
        origin: PlanOrigin,
        source: ValidationError,
    },
}

fn parse(input: &str, origin: PlanOrigin) -> Result<RewritePlan, ConfigError> {
    let plan: RewritePlan = match toml_edit::de::from_str(input) {
        Ok(plan) => plan,
        Err(source) => return Err(ConfigError::Parse { origin, source }),
    };
    match plan.validate() {
        Ok(()) => Ok(plan),
        Err(source) => Err(ConfigError::Invalid { origin, source }),
    }
}

/// Parse and validate a plan held in memory.
pub fn load_from_str(input: &str) -> Result<RewritePlan, ConfigError> {
    parse(input, PlanOrigin::Inline)
}

/// Read, parse and validate a plan file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RewritePlan, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, PlanOrigin::File(path.to_path_buf()))
}
