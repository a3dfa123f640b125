use crate::cache::get_or_compile_regex;
use crate::edit::EditVerification;
use crate::transform::Transformation;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// One plan file: metadata plus an ordered list of rewrite steps.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RewritePlan {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rewrites: Vec<RewriteDefinition>,
}

impl RewritePlan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rewrites.is_empty() {
            issues.push(ValidationIssue::EmptyPlan);
        }

        let mut seen = HashSet::new();
        for step in &self.rewrites {
            if step.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    step_id: None,
                    field: "id",
                });
            } else if !seen.insert(step.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    step_id: step.id.clone(),
                });
            }
            if step.file.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    step_id: Some(step.id.clone()),
                    field: "file",
                });
            }
            if matches!(&step.unless_present, Some(text) if text.is_empty()) {
                issues.push(ValidationIssue::MissingField {
                    step_id: Some(step.id.clone()),
                    field: "unless_present",
                });
            }
            if let Some(verify) = &step.verify {
                if let Err(message) = verify.to_verification() {
                    issues.push(ValidationIssue::InvalidCombo {
                        step_id: Some(step.id.clone()),
                        message,
                    });
                }
            }

            validate_transform(&step.id, &step.transform, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn require(issues: &mut Vec<ValidationIssue>, id: &str, value: &str, field: &'static str) {
    if value.is_empty() {
        issues.push(ValidationIssue::MissingField {
            step_id: Some(id.to_string()),
            field,
        });
    }
}

fn validate_transform(id: &str, transform: &Transformation, issues: &mut Vec<ValidationIssue>) {
    match transform {
        Transformation::Literal { search, .. } => require(issues, id, search, "transform.search"),
        Transformation::LiteralTable { pairs } => {
            if pairs.is_empty() {
                require(issues, id, "", "transform.pairs");
            }
            for (search, _) in pairs {
                require(issues, id, search, "transform.pairs[].search");
            }
        }
        Transformation::Pattern { regex, .. } => {
            require(issues, id, regex, "transform.regex");
            if !regex.is_empty() {
                if let Err(e) = get_or_compile_regex(regex) {
                    issues.push(ValidationIssue::InvalidCombo {
                        step_id: Some(id.to_string()),
                        message: format!("invalid regex: {e}"),
                    });
                }
            }
        }
        Transformation::RemoveRegion { start, end, .. }
        | Transformation::ReplaceRegion { start, end, .. } => {
            require(issues, id, start, "transform.start");
            require(issues, id, end, "transform.end");
        }
        Transformation::MoveRegion {
            start, end, anchor, ..
        } => {
            require(issues, id, start, "transform.start");
            require(issues, id, end, "transform.end");
            require(issues, id, anchor, "transform.anchor");
        }
        Transformation::Insert { anchor, text, .. } => {
            require(issues, id, anchor, "transform.anchor");
            require(issues, id, text, "transform.text");
        }
        Transformation::InsertBeforeLine { contains, .. } => {
            require(issues, id, contains, "transform.contains");
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Semver requirement on the project's `package.json` version
    #[serde(default)]
    pub version_range: Option<String>,
    #[serde(default = "default_true")]
    pub workspace_relative: bool,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            version_range: None,
            workspace_relative: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct RewriteDefinition {
    pub id: String,
    pub file: String,
    pub transform: Transformation,
    /// Skip this step when the document already contains this text
    #[serde(default)]
    pub unless_present: Option<String>,
    #[serde(default)]
    pub verify: Option<Verify>,
}

/// Precondition on the document as it stands right before a step.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Verify {
    Contains {
        text: String,
    },
    Hash {
        algorithm: Option<HashAlgorithm>,
        expected: String,
    },
}

impl Verify {
    pub fn to_verification(&self) -> Result<Option<EditVerification>, String> {
        match self {
            Verify::Contains { text } if text.is_empty() => {
                Err("verify.text must not be empty".to_string())
            }
            Verify::Contains { .. } => Ok(None),
            Verify::Hash { expected, .. } => EditVerification::parse_hash(expected)
                .map(Some)
                .ok_or_else(|| format!("invalid hash value: {expected}")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    Xxh3,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyPlan,
    MissingField {
        step_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        step_id: String,
    },
    InvalidCombo {
        step_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyPlan => write!(f, "rewrite plan contains no rewrites"),
            ValidationIssue::MissingField { step_id, field } => match step_id {
                Some(id) => write!(f, "rewrite '{id}' missing required field '{field}'"),
                None => write!(f, "rewrite missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { step_id } => {
                write!(f, "rewrite id '{step_id}' is used more than once")
            }
            ValidationIssue::InvalidCombo { step_id, message } => match step_id {
                Some(id) => write!(f, "rewrite '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid rewrite configuration: {message}"),
            },
        }
    }
}
