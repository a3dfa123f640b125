//! Text Rewriter: ordered, marker-driven rewrites of source files
//!
//! Used to move hardcoded UI strings in a front-end codebase over to
//! translation-key lookups (`t("key")`), together with the small structural
//! edits that go with it: adding an import, adding a hook call, moving a
//! module-level array into a component body.
//!
//! # Architecture
//!
//! Every region and insertion operation compiles down to a single verified
//! byte-span replacement, [`Edit`]. Transformations run in order against an
//! in-memory [`Document`]; the file on disk is written once, atomically,
//! after all of them succeed.
//!
//! # Safety
//!
//! - Region edits verify their before-text before splicing
//! - Atomic file writes (tempfile + fsync + rename)
//! - Workspace boundary enforcement
//! - A missing marker aborts the whole file, nothing is written
//!
//! Transformations are not idempotent. Guard re-runs with `unless_present`.
//!
//! # Example
//!
//! ```no_run
//! use text_rewriter::{rewrite, Transformation};
//!
//! rewrite(
//!     "client/src/pages/Upscale.tsx",
//!     &[
//!         Transformation::literal("\"Görsel indirildi!\"", "t(\"upscale.toast.downloaded\")"),
//!         Transformation::literal(">Büyüt<", ">{t(\"upscale.button\")}<"),
//!     ],
//! )
//! .expect("rewrite failed");
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod edit;
pub mod safety;
pub mod transform;

// Re-exports
pub use config::{
    apply_plan, load_from_path, load_from_str, matches_requirement, ApplicationError,
    ConfigError, PlanReport, RewritePlan, RewriteResult, VersionError,
};
pub use document::{CommitOutcome, Document};
pub use edit::{Edit, EditError, EditVerification};
pub use safety::{SafetyError, WorkspaceGuard};
pub use transform::{apply_all, rewrite, Placement, SearchFrom, TransformError, Transformation};
