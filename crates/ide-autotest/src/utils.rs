/// Normalize a string by removing zero-width and special Unicode whitespace characters.
///
/// Widget texts read through accessibility layers occasionally carry these;
/// comparisons against expected phrases go through this first.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| {
            // Remove zero-width and non-breaking spaces, but keep regular spaces
            !matches!(
                *c,
                '\u{200B}' | // zero-width space
                '\u{200C}' | // zero-width non-joiner
                '\u{200D}' | // zero-width joiner
                '\u{FEFF}' // zero-width no-break space
            )
        })
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect()
}

/// File name component of a path as reported by the IDE, accepting both separators.
pub fn basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

/// Lower-cased extension of `path`, if any.
pub fn suffix(path: &str) -> Option<String> {
    let name = basename(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(name[i + 1..].to_lowercase()),
    }
}
