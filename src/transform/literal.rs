//! Literal replace-all.

/// Replace every non-overlapping occurrence of `search`, scanning left to
/// right. Returns the new text and the number of replacements made.
pub fn replace_all(text: &str, search: &str, replace: &str) -> (String, usize) {
    if search.is_empty() {
        return (text.to_string(), 0);
    }
    let count = text.matches(search).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (text.replace(search, replace), count)
}

/// Apply `pairs` in order; each pair sees the previous pair's output.
///
/// Returns the text and the replacement count per pair.
pub fn replace_table(text: &str, pairs: &[(String, String)]) -> (String, Vec<usize>) {
    let mut current = text.to_string();
    let mut counts = Vec::with_capacity(pairs.len());
    for (search, replace) in pairs {
        let (next, count) = replace_all(&current, search, replace);
        current = next;
        counts.push(count);
    }
    (current, counts)
}
