//! Marker lookup.
//!
//! Every positional anchor goes through [`find_marker`]. A missing marker is
//! an error, never a sentinel offset.

use super::errors::{MarkerHint, TransformError};

/// Minimum normalized similarity for a line to be offered as a hint.
const HINT_THRESHOLD: f64 = 0.6;

/// Byte offset of the first occurrence of `marker` at or after `from`.
pub fn find_marker(haystack: &str, marker: &str, from: usize) -> Result<usize, TransformError> {
    haystack
        .get(from..)
        .and_then(|tail| tail.find(marker))
        .map(|offset| from + offset)
        .ok_or_else(|| TransformError::MarkerNotFound {
            marker: marker.to_string(),
            hint: closest_line(haystack, marker),
        })
}

/// Find the line most similar to the first line of `marker`.
pub fn closest_line(haystack: &str, marker: &str) -> Option<MarkerHint> {
    let needle = marker.lines().find(|l| !l.trim().is_empty())?.trim();

    haystack
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let similarity = strsim::normalized_levenshtein(needle, line.trim());
            (idx, line, similarity)
        })
        .filter(|(_, _, similarity)| *similarity >= HINT_THRESHOLD)
        .max_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(idx, line, similarity)| MarkerHint {
            line: idx + 1,
            text: line.trim().to_string(),
            similarity,
        })
}
