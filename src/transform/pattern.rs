//! Regex replace-all.

use super::errors::TransformError;
use crate::cache::get_or_compile_regex;

/// Replace every match of `pattern` with `replace`.
///
/// `replace` may reference capture groups as `$1` or `${name}`.
pub fn replace_all(
    text: &str,
    pattern: &str,
    replace: &str,
) -> Result<(String, usize), TransformError> {
    let re = get_or_compile_regex(pattern).map_err(|e| TransformError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let count = re.find_iter(text).count();
    if count == 0 {
        return Ok((text.to_string(), 0));
    }
    Ok((re.replace_all(text, replace).into_owned(), count))
}
