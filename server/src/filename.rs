//! Client-supplied filename handling.
//!
//! Some HTTP clients send multipart filenames whose UTF-8 bytes were read
//! back byte-for-byte as single-byte characters, which garbles anything
//! non-ASCII. `repair_encoding` detects and undoes that common case. The
//! check is a guess: a name that legitimately consists of single-byte
//! characters and happens to decode as UTF-8 gets "repaired" too. Correct
//! behavior for such names is undefined, so the heuristic stays as is.

/// Best-effort repair of a mis-decoded multipart filename.
///
/// If every character fits in a single byte and those bytes form valid
/// UTF-8, the UTF-8 decoding is returned; otherwise the name is returned
/// unchanged. Idempotent: a repaired name contains multi-byte characters
/// and passes through untouched on a second run.
#[must_use]
pub fn repair_encoding(name: &str) -> String {
    let mut bytes = Vec::with_capacity(name.len());
    for ch in name.chars() {
        let code = ch as u32;
        if code > 0xFF {
            // Not a single-byte-per-character name, nothing to undo.
            return name.to_string();
        }
        bytes.push(code as u8);
    }
    match String::from_utf8(bytes) {
        Ok(decoded) => decoded,
        Err(_) => name.to_string(),
    }
}

/// True if `name` can be resolved inside the storage directory without
/// escaping it.
#[must_use]
pub fn is_safe_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Turns a client-supplied filename into the name used on disk: encoding
/// repair, then the final path segment only. Falls back to a generated
/// `file_<millis>` name when nothing usable remains.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let repaired = repair_encoding(raw);
    let segment = repaired
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string();
    if is_safe_segment(&segment) {
        segment
    } else {
        fallback_name()
    }
}

fn fallback_name() -> String {
    format!("file_{}", chrono::Utc::now().timestamp_millis())
}
