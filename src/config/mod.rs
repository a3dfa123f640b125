//! Rewrite plans: TOML schema, loading, version gating, and application.

pub mod applicator;
pub mod loader;
pub mod schema;
pub mod version;

pub use applicator::{apply_plan, ApplicationError, FileStatus, PlanReport, RewriteResult};
pub use loader::{load_from_path, load_from_str, ConfigError, PlanOrigin};
pub use schema::{
    HashAlgorithm, Metadata, RewriteDefinition, RewritePlan, ValidationError, ValidationIssue,
    Verify,
};
pub use version::{matches_requirement, read_project_version, VersionError};
