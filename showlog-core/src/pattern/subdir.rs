//! Suppression of noise subdirectories (CD1, Sample, Subs, ...) by base name.

use crate::container::dirlog::basename;

/// True when the base name of `path` fits the comma-separated `list`.
///
/// A token such as `cd?1` is split at its first `?`: the part before it is a
/// required case-insensitive prefix and the token's full length bounds the
/// base name's length. A token without `?` therefore matches its own text
/// only. Evaluation stops at the first empty token or token with empty prefix.
pub fn matches_excluded_subdir(list: impl AsRef<[u8]>, path: impl AsRef<[u8]>) -> bool {
    let path = path.as_ref();
    if path.len() < 2 {
        return false;
    }
    let name = basename(path);

    for token in list.as_ref().split(|&b| b == b',') {
        if token.is_empty() {
            break;
        }
        let prefix = match token.iter().position(|&b| b == b'?') {
            Some(i) => &token[..i],
            None => token,
        };
        if prefix.is_empty() {
            break;
        }
        if (prefix.len()..=token.len()).contains(&name.len())
            && name[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return true;
        }
    }
    false
}
