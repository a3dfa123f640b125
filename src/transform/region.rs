//! Region operations: locate a block between two markers, then drop it,
//! rewrite it, or move it to another anchor.
//!
//! A region starts at the first occurrence of the start marker and runs
//! through the end of the first end marker found after it. With
//! `consume_newline`, one line break directly after the end marker belongs
//! to the region too, so removing a declaration does not leave a blank line.

use super::errors::TransformError;
use super::marker::find_marker;
use super::{Placement, SearchFrom};
use crate::edit::Edit;

/// Placeholder expanded to the extracted region inside templates.
pub const REGION_PLACEHOLDER: &str = "{region}";

/// Byte span of a located region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    /// End of the end marker
    pub body_end: usize,
    /// `body_end`, plus the consumed line break if any
    pub end: usize,
}

impl Region {
    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.body_end]
    }

    pub fn span<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

pub fn locate(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    consume_newline: bool,
) -> Result<Region, TransformError> {
    let start = find_marker(text, start_marker, 0)?;
    let body_end = find_marker(text, end_marker, start + start_marker.len())? + end_marker.len();

    let rest = &text[body_end..];
    let end = if !consume_newline {
        body_end
    } else if rest.starts_with("\r\n") {
        body_end + 2
    } else if rest.starts_with('\n') {
        body_end + 1
    } else {
        body_end
    };

    Ok(Region {
        start,
        body_end,
        end,
    })
}

pub fn remove(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    consume_newline: bool,
) -> Result<String, TransformError> {
    let region = locate(text, start_marker, end_marker, consume_newline)?;
    let mut out = text.to_string();
    Edit::new(region.start, region.end, "", region.span(text)).apply_to(&mut out)?;
    Ok(out)
}

pub fn replace(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    template: &str,
    consume_newline: bool,
) -> Result<String, TransformError> {
    let region = locate(text, start_marker, end_marker, consume_newline)?;
    let rendered = template.replace(REGION_PLACEHOLDER, region.body(text));
    let mut out = text.to_string();
    Edit::new(region.start, region.end, rendered, region.span(text)).apply_to(&mut out)?;
    Ok(out)
}

/// Parameters of a region move.
#[derive(Debug, Clone, Copy)]
pub struct MoveSpec<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub anchor: &'a str,
    pub placement: Placement,
    pub template: &'a str,
    pub search_from: SearchFrom,
    pub consume_newline: bool,
}

/// Cut the region out and re-emit `template` at the anchor.
///
/// The document is first reduced to `prefix + suffix`. The anchor is then
/// searched in `suffix` (or anywhere, with [`SearchFrom::Start`]) and the
/// rendered template is spliced in next to it.
pub fn move_region(text: &str, spec: &MoveSpec<'_>) -> Result<String, TransformError> {
    let region = locate(text, spec.start, spec.end, spec.consume_newline)?;
    let block = region.body(text);

    let mut out = text.to_string();
    Edit::new(region.start, region.end, "", region.span(text)).apply_to(&mut out)?;

    let from = match spec.search_from {
        SearchFrom::Region => region.start,
        SearchFrom::Start => 0,
    };
    let anchor_at = find_marker(&out, spec.anchor, from)?;
    let at = match spec.placement {
        Placement::After => anchor_at + spec.anchor.len(),
        Placement::Before => anchor_at,
    };

    let rendered = spec.template.replace(REGION_PLACEHOLDER, block);
    Edit::insert(at, rendered).apply_to(&mut out)?;
    Ok(out)
}

/// Insert `content` next to the first occurrence of `anchor`.
pub fn insert(
    text: &str,
    anchor: &str,
    content: &str,
    placement: Placement,
) -> Result<String, TransformError> {
    let anchor_at = find_marker(text, anchor, 0)?;
    let at = match placement {
        Placement::After => anchor_at + anchor.len(),
        Placement::Before => anchor_at,
    };
    let mut out = text.to_string();
    Edit::insert(at, content).apply_to(&mut out)?;
    Ok(out)
}

/// Insert `line` as a new line before the first line containing `contains`.
pub fn insert_before_line(text: &str, contains: &str, line: &str) -> Result<String, TransformError> {
    let hit = find_marker(text, contains, 0)?;
    let line_start = text[..hit].rfind('\n').map_or(0, |nl| nl + 1);

    let mut out = text.to_string();
    Edit::insert(line_start, format!("{line}\n")).apply_to(&mut out)?;
    Ok(out)
}
