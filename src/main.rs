use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use text_rewriter::config::{
    apply_plan, load_from_path, read_project_version, ApplicationError, FileStatus,
    RewriteResult,
};
use text_rewriter::edit::format_hash;
use text_rewriter::transform::TransformError;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Parser)]
#[command(name = "text-rewriter")]
#[command(about = "Ordered literal, pattern, and region rewrites for source files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rewrite plans to a workspace (default)
    Apply {
        /// Path to workspace root (auto-detected if not specified)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Specific plan file to apply (otherwise applies all in rewrites/)
        #[arg(short, long)]
        plans: Option<PathBuf>,
    },

    /// List discovered plans and their steps
    List {
        /// Path to workspace root (auto-detected if not specified)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// Print the xxh3 fingerprint of a file, for use in `verify`
    Fingerprint {
        /// File to hash
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Apply {
        workspace: None,
        plans: None,
    }) {
        Commands::Apply { workspace, plans } => cmd_apply(workspace, plans),
        Commands::List { workspace } => cmd_list(workspace),
        Commands::Fingerprint { file } => cmd_fingerprint(&file),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("text_rewriter={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Discover all .toml plan files in a rewrites/ directory.
///
/// Discovery order:
/// 1. `<workspace>/rewrites`
/// 2. `./rewrites` relative to the current working directory
fn discover_plan_files(workspace: &Path) -> Result<Vec<PathBuf>> {
    let cwd_dir = env::current_dir().ok().map(|cwd| cwd.join("rewrites"));
    let candidate_dirs: Vec<PathBuf> = std::iter::once(workspace.join("rewrites"))
        .chain(cwd_dir)
        .collect();

    for dir in candidate_dirs {
        if !dir.exists() {
            continue;
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|s| s.to_str()) == Some("toml")
            {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();

        if !files.is_empty() {
            return Ok(files);
        }
    }

    anyhow::bail!(
        "No .toml plan files found in either ./rewrites or {}/rewrites",
        workspace.display()
    )
}

/// Resolve the workspace root.
///
/// Priority order:
/// 1. Explicit --workspace flag
/// 2. TEXT_REWRITER_WORKSPACE environment variable
/// 3. Nearest ancestor of the current directory with a package.json
/// 4. The current directory
fn resolve_workspace(cli_workspace: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_workspace {
        return path
            .canonicalize()
            .with_context(|| format!("workspace not found: {}", path.display()));
    }

    if let Ok(env_path) = env::var("TEXT_REWRITER_WORKSPACE") {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(path.canonicalize()?);
        }
        eprintln!(
            "{}",
            format!(
                "Warning: TEXT_REWRITER_WORKSPACE is set but path doesn't exist: {}",
                env_path
            )
            .yellow()
        );
    }

    let current = env::current_dir()?;
    if let Some(found) = current
        .ancestors()
        .find(|ancestor| ancestor.join("package.json").is_file())
    {
        debug!(workspace = %found.display(), "detected workspace from package.json");
        return Ok(found.to_path_buf());
    }

    Ok(current)
}

fn cmd_apply(workspace: Option<PathBuf>, plans: Option<PathBuf>) -> Result<()> {
    let workspace = resolve_workspace(workspace)?;

    let plan_files = match plans {
        Some(path) => vec![path],
        None => discover_plan_files(&workspace)?,
    };

    let project_version = read_project_version(&workspace).unwrap_or_else(|e| {
        eprintln!(
            "{}",
            format!("Warning: {e}, using 0.0.0").yellow()
        );
        "0.0.0".to_string()
    });

    println!("Workspace: {}", workspace.display());
    println!("Version: {}", project_version);
    println!();

    let mut total_applied = 0;
    let mut total_present = 0;
    let mut total_skipped = 0;
    let mut total_failed = 0;
    let mut files_rewritten = 0;
    let mut files_unchanged = 0;

    for plan_file in plan_files {
        println!("Loading rewrites from {}...", plan_file.display());
        let plan = match load_from_path(&plan_file) {
            Ok(plan) => plan,
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                total_failed += 1;
                println!();
                continue;
            }
        };
        let report = apply_plan(&plan, &workspace, &project_version);

        for (step_id, result) in &report.steps {
            match result {
                Ok(RewriteResult::Applied { occurrences, .. }) => {
                    println!(
                        "{} {}: {} occurrence(s)",
                        "✓".green(),
                        step_id,
                        occurrences
                    );
                    total_applied += 1;
                }
                Ok(RewriteResult::SkippedPresent { file }) => {
                    println!(
                        "{} {}: Already present in {}",
                        "⊙".yellow(),
                        step_id,
                        file.display()
                    );
                    total_present += 1;
                }
                Ok(RewriteResult::SkippedVersion { reason }) => {
                    println!("{} {}: Skipped ({})", "⊘".cyan(), step_id, reason);
                    total_skipped += 1;
                }
                Err(e) => {
                    eprintln!("{} {}: Error - {}", "✗".red(), step_id, e);
                    total_failed += 1;
                    print_remediation(e);
                }
            }
        }

        for (file, status) in &report.files {
            match status {
                FileStatus::Rewritten { .. } => {
                    let name = file
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.display().to_string());
                    println!("{}", format!("{name} refactored successfully!").green());
                    files_rewritten += 1;
                }
                FileStatus::Unchanged => files_unchanged += 1,
                FileStatus::Failed => {
                    eprintln!(
                        "{}",
                        format!("{} left untouched", file.display()).red()
                    );
                }
            }
        }

        println!();
    }

    println!("{}", "Summary:".bold());
    println!("  {} steps applied", format!("{}", total_applied).green());
    println!(
        "  {} already present",
        format!("{}", total_present).yellow()
    );
    println!("  {} skipped", format!("{}", total_skipped).cyan());
    println!("  {} failed", format!("{}", total_failed).red());
    println!(
        "  {} files rewritten, {} unchanged",
        files_rewritten, files_unchanged
    );

    if total_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_remediation(error: &ApplicationError) {
    let ApplicationError::Transform { file, source } = error else {
        return;
    };
    match source {
        TransformError::MarkerNotFound { marker, hint } => {
            eprintln!("  {}", "CONFLICT: marker not found".red());
            eprintln!("  File: {}", file.display());
            eprintln!("  Marker: {:?}", marker);
            if let Some(hint) = hint {
                eprintln!("  {}", hint.to_string().dimmed());
            }
            eprintln!("  Action: update the marker to match the current file");
        }
        TransformError::NoMatch { search } => {
            eprintln!("  {}", "CONFLICT: required text matched no locations".red());
            eprintln!("  File: {}", file.display());
            eprintln!("  Search: {:?}", search);
            eprintln!("  Possible causes:");
            eprintln!("    - String was already translated");
            eprintln!("    - Wording changed in the source");
        }
        TransformError::VerifyMismatch { .. } => {
            eprintln!("  File: {}", file.display());
            eprintln!("  Action: re-run `text-rewriter fingerprint` and update verify.expected");
        }
        _ => {}
    }
}

fn cmd_list(workspace: Option<PathBuf>) -> Result<()> {
    let workspace = resolve_workspace(workspace)?;
    let plan_files = discover_plan_files(&workspace)?;

    for plan_file in plan_files {
        let plan = load_from_path(&plan_file)?;
        let name = if plan.meta.name.is_empty() {
            plan_file.display().to_string()
        } else {
            plan.meta.name.clone()
        };

        print!("{}", name.bold());
        if let Some(range) = &plan.meta.version_range {
            print!(" {}", format!("({range})").dimmed());
        }
        println!();
        if let Some(description) = &plan.meta.description {
            println!("  {}", description.dimmed());
        }

        for step in &plan.rewrites {
            println!(
                "  - {} {} [{}]",
                step.id,
                step.file.dimmed(),
                step.transform.kind().cyan()
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_fingerprint(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    println!("{}", format_hash(xxh3_64(&bytes)));
    Ok(())
}
