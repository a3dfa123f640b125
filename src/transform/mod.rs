//! The rewrite engine.
//!
//! A [`Transformation`] is one atomic search/replace or region operation.
//! Lists are applied strictly in order and each step sees the previous
//! step's output, so reordering a list can change the result.
//!
//! Failure policy:
//! - literal and pattern steps with zero matches are inert unless `required`
//! - every region and insertion marker is mandatory and fails with
//!   [`TransformError::MarkerNotFound`]
//!
//! Nothing here is idempotent. Running an insertion twice inserts twice.

pub mod errors;
pub mod literal;
pub mod marker;
pub mod pattern;
pub mod region;

pub use errors::{MarkerHint, TransformError};
pub use marker::find_marker;
pub use region::{MoveSpec, Region, REGION_PLACEHOLDER};

use crate::document::{CommitOutcome, Document};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    After,
    Before,
}

/// Where a moved region looks for its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchFrom {
    /// In the text that followed the removed region
    #[default]
    Region,
    /// Anywhere in the document
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Transformation {
    Literal {
        search: String,
        replace: String,
        #[serde(default)]
        required: bool,
    },
    LiteralTable {
        pairs: Vec<(String, String)>,
    },
    Pattern {
        regex: String,
        replace: String,
        #[serde(default)]
        required: bool,
    },
    RemoveRegion {
        start: String,
        end: String,
        #[serde(default = "default_true")]
        consume_newline: bool,
    },
    ReplaceRegion {
        start: String,
        end: String,
        text: String,
        #[serde(default)]
        consume_newline: bool,
    },
    MoveRegion {
        start: String,
        end: String,
        anchor: String,
        #[serde(default)]
        placement: Placement,
        #[serde(default = "default_move_template")]
        template: String,
        #[serde(default)]
        search_from: SearchFrom,
        #[serde(default = "default_true")]
        consume_newline: bool,
    },
    Insert {
        anchor: String,
        text: String,
        #[serde(default)]
        placement: Placement,
    },
    InsertBeforeLine {
        contains: String,
        text: String,
    },
}

fn default_true() -> bool {
    true
}

fn default_move_template() -> String {
    format!("\n{REGION_PLACEHOLDER}")
}

/// Output of a single transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub text: String,
    /// Replacements made (region operations count as one)
    pub occurrences: usize,
}

impl Transformation {
    /// Kebab-case name as written in plan files.
    pub fn kind(&self) -> &'static str {
        match self {
            Transformation::Literal { .. } => "literal",
            Transformation::LiteralTable { .. } => "literal-table",
            Transformation::Pattern { .. } => "pattern",
            Transformation::RemoveRegion { .. } => "remove-region",
            Transformation::ReplaceRegion { .. } => "replace-region",
            Transformation::MoveRegion { .. } => "move-region",
            Transformation::Insert { .. } => "insert",
            Transformation::InsertBeforeLine { .. } => "insert-before-line",
        }
    }

    pub fn literal(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Transformation::Literal {
            search: search.into(),
            replace: replace.into(),
            required: false,
        }
    }

    pub fn apply(&self, text: &str) -> Result<Applied, TransformError> {
        let (text, occurrences) = match self {
            Transformation::Literal {
                search,
                replace,
                required,
            } => {
                let (out, n) = literal::replace_all(text, search, replace);
                check_required(n, *required, search)?;
                (out, n)
            }
            Transformation::LiteralTable { pairs } => {
                let (out, counts) = literal::replace_table(text, pairs);
                for ((search, _), n) in pairs.iter().zip(&counts) {
                    if *n == 0 {
                        warn!(search = %search, "table entry matched nothing");
                    }
                }
                (out, counts.iter().sum())
            }
            Transformation::Pattern {
                regex,
                replace,
                required,
            } => {
                let (out, n) = pattern::replace_all(text, regex, replace)?;
                check_required(n, *required, regex)?;
                (out, n)
            }
            Transformation::RemoveRegion {
                start,
                end,
                consume_newline,
            } => (region::remove(text, start, end, *consume_newline)?, 1),
            Transformation::ReplaceRegion {
                start,
                end,
                text: template,
                consume_newline,
            } => (
                region::replace(text, start, end, template, *consume_newline)?,
                1,
            ),
            Transformation::MoveRegion {
                start,
                end,
                anchor,
                placement,
                template,
                search_from,
                consume_newline,
            } => {
                let spec = MoveSpec {
                    start,
                    end,
                    anchor,
                    placement: *placement,
                    template,
                    search_from: *search_from,
                    consume_newline: *consume_newline,
                };
                (region::move_region(text, &spec)?, 1)
            }
            Transformation::Insert {
                anchor,
                text: content,
                placement,
            } => (region::insert(text, anchor, content, *placement)?, 1),
            Transformation::InsertBeforeLine {
                contains,
                text: line,
            } => (region::insert_before_line(text, contains, line)?, 1),
        };

        debug!(kind = self.kind(), occurrences, "transformation applied");
        Ok(Applied { text, occurrences })
    }
}

fn check_required(count: usize, required: bool, search: &str) -> Result<(), TransformError> {
    if count > 0 {
        return Ok(());
    }
    if required {
        return Err(TransformError::NoMatch {
            search: search.to_string(),
        });
    }
    warn!(search = %search, "search text matched nothing; step is a no-op");
    Ok(())
}

/// Apply `transformations` in order to `text`.
pub fn apply_all(text: &str, transformations: &[Transformation]) -> Result<String, TransformError> {
    let mut current = text.to_string();
    for transformation in transformations {
        current = transformation.apply(&current)?.text;
    }
    Ok(current)
}

/// Read `path`, apply `transformations` in order, and commit the result.
///
/// The file is written at most once, atomically, and only when every
/// transformation succeeded.
pub fn rewrite(
    path: impl AsRef<Path>,
    transformations: &[Transformation],
) -> Result<CommitOutcome, TransformError> {
    let mut doc = Document::load(path.as_ref())?;
    doc.text = apply_all(&doc.text, transformations)?;
    Ok(doc.commit()?)
}
