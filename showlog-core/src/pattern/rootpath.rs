//! Path-boundary aware matching of directory paths against excluded roots.

#[inline]
fn is_separator(b: u8) -> bool {
    b == b'/'
}

/// True when `path` is `root` itself or lies underneath it.
///
/// A root ending in `/` also covers the path spelled without that slash.
pub fn path_under_root(root: &[u8], path: &[u8]) -> bool {
    if root.is_empty() {
        return false;
    }

    if let Some(dir) = root.strip_suffix(b"/") {
        if path == dir && dir.last().is_some_and(|&b| !is_separator(b)) {
            return true;
        }
        return path.starts_with(root);
    }

    path.starts_with(root)
        && match path.get(root.len()) {
            None => true,
            Some(&b) => is_separator(b),
        }
}

/// True when `path` falls under any of the space-separated `roots`.
///
/// Lists or paths shorter than two bytes never match.
pub fn matches_excluded_root(roots: impl AsRef<[u8]>, path: impl AsRef<[u8]>) -> bool {
    let (roots, path) = (roots.as_ref(), path.as_ref());
    if roots.len() < 2 || path.len() < 2 {
        return false;
    }
    roots
        .split(|&b| b == b' ')
        .filter(|t| !t.is_empty())
        .any(|root| path_under_root(root, path))
}
