//! Bundled rewrite plans run against fixture pages.

mod logo_generator_plan;
mod remaining_pages_plan;
mod upscale_plan;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path of a plan shipped in `rewrites/`.
pub fn bundled_plan(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("rewrites")
        .join(name)
}

/// Workspace with a `package.json` and one page under `client/src/pages`.
pub fn setup_workspace(page: &str, contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "studio", "version": "1.4.0", "private": true }"#,
    )
    .unwrap();

    let pages = dir.path().join("client/src/pages");
    fs::create_dir_all(&pages).unwrap();
    fs::write(pages.join(page), contents).unwrap();
    dir
}

pub fn read_page(dir: &TempDir, page: &str) -> String {
    fs::read_to_string(dir.path().join("client/src/pages").join(page)).unwrap()
}
