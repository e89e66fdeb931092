//! Dotted namespace names.
//!
//! A namespace is a non-empty, dot-separated sequence of identifier segments
//! such as `app.ui.Button`. Namespaces are compared by exact equality and by
//! dotted-prefix containment: `app` is an ancestor of `app.ui`, but `ap` is
//! not an ancestor of `app`.

/// Returns true for bytes that may continue a JavaScript identifier.
#[inline]
pub fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Returns true if every segment of `namespace` is a plain ASCII identifier.
pub fn is_valid(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.split('.').all(|segment| {
            let bytes = segment.as_bytes();
            match bytes.first() {
                Some(first) if !first.is_ascii_digit() => bytes.iter().all(|&b| is_identifier_byte(b)),
                _ => false,
            }
        })
}

/// Returns true if `ancestor` is a strict dotted prefix of `namespace`.
///
/// ```
/// use gcjs_common::namespace::is_ancestor;
/// assert!(is_ancestor("a.b", "a.b.c"));
/// assert!(!is_ancestor("a.b", "a.bc"));
/// assert!(!is_ancestor("a.b", "a.b"));
/// ```
pub fn is_ancestor(ancestor: &str, namespace: &str) -> bool {
    namespace.len() > ancestor.len()
        && namespace.starts_with(ancestor)
        && namespace.as_bytes()[ancestor.len()] == b'.'
}

/// First segment of a namespace (`a` for `a.b.c`).
pub fn root_segment(namespace: &str) -> &str {
    namespace.split('.').next().unwrap_or(namespace)
}

/// Cumulative prefixes of a namespace, shortest first.
///
/// `a.b.c` yields `a`, `a.b`, `a.b.c`.
pub fn prefixes(namespace: &str) -> impl Iterator<Item = &str> {
    namespace
        .match_indices('.')
        .map(|(idx, _)| &namespace[..idx])
        .chain(std::iter::once(namespace))
}

/// Strict ancestors of a namespace, shortest first (`a`, `a.b` for `a.b.c`).
pub fn ancestors(namespace: &str) -> impl Iterator<Item = &str> {
    namespace.match_indices('.').map(|(idx, _)| &namespace[..idx])
}

/// Replace every `.` in `namespace` with `separator`.
pub fn flatten(namespace: &str, separator: &str) -> String {
    namespace.replace('.', separator)
}

#[cfg(test)]
#[path = "../tests/namespace_tests.rs"]
mod tests;
