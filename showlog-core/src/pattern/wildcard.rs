//! Case-insensitive `*`/`?` glob matching.

/// Matches `candidate` against a single glob token.
///
/// `*` matches any run of bytes (including none), `?` exactly one byte. Other
/// bytes compare with ASCII case folding; anything else compares raw.
pub fn wildcard_match(pattern: impl AsRef<[u8]>, candidate: impl AsRef<[u8]>) -> bool {
    let wild = pattern.as_ref();
    let s = candidate.as_ref();
    let (mut w, mut i) = (0usize, 0usize);

    while i < s.len() && wild.get(w) != Some(&b'*') {
        if !byte_matches(wild.get(w), s[i]) {
            return false;
        }
        w += 1;
        i += 1;
    }

    // (pattern index after the last `*`, next candidate index to retry from)
    let mut retry: Option<(usize, usize)> = None;
    while i < s.len() {
        if wild.get(w) == Some(&b'*') {
            w += 1;
            if w == wild.len() {
                return true;
            }
            retry = Some((w, i + 1));
        } else if byte_matches(wild.get(w), s[i]) {
            w += 1;
            i += 1;
        } else {
            let Some((mp, cp)) = retry.as_mut() else {
                return false;
            };
            w = *mp;
            i = *cp;
            *cp += 1;
        }
    }

    while wild.get(w) == Some(&b'*') {
        w += 1;
    }
    w == wild.len()
}

#[inline]
fn byte_matches(p: Option<&u8>, c: u8) -> bool {
    match p {
        Some(b'?') => true,
        Some(&p) => p.eq_ignore_ascii_case(&c),
        None => false,
    }
}

/// True when any space-separated token of `patterns` matches `candidate`.
pub fn any_wildcard_match(patterns: impl AsRef<[u8]>, candidate: impl AsRef<[u8]>) -> bool {
    let candidate = candidate.as_ref();
    patterns
        .as_ref()
        .split(|&b| b == b' ')
        .any(|token| wildcard_match(token, candidate))
}
