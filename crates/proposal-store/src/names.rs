//! File naming rules: sanitization, collision suffixes, generated names

use chrono::{DateTime, Utc};

/// Name a module falls back to when sanitization leaves nothing usable.
pub const FALLBACK_MODULE_NAME: &str = "module.pdf";

const PDF_EXTENSION: &str = ".pdf";

/// True when `name` ends in `.pdf`, ignoring case.
pub fn is_pdf_name(name: &str) -> bool {
    name.len() >= PDF_EXTENSION.len()
        && name.as_bytes()[name.len() - PDF_EXTENSION.len()..].eq_ignore_ascii_case(PDF_EXTENSION.as_bytes())
}

/// True when `name` is a single ordinary path component.
///
/// Rejects empty names, `.` and `..`, and anything containing a path
/// separator or NUL.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Turn a client-supplied file name into a safe PDF name.
///
/// Unicode is transliterated to ASCII, each run of separators or whitespace
/// becomes a single `_`, anything outside `[A-Za-z0-9._-]` is dropped, and
/// leading or trailing `.`/`_` are stripped. Underscores already in the name
/// are kept. If the result is empty or no longer ends in `.pdf`,
/// [`FALLBACK_MODULE_NAME`] is used.
pub fn sanitize_file_name(name: &str) -> String {
    let transliterated = deunicode::deunicode(name);
    let mut out = String::with_capacity(transliterated.len());
    let mut in_separator_run = false;

    for ch in transliterated.chars() {
        if ch == '/' || ch == '\\' || ch.is_whitespace() {
            if !in_separator_run {
                out.push('_');
            }
            in_separator_run = true;
            continue;
        }

        in_separator_run = false;
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            out.push(ch);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() || !is_pdf_name(trimmed) {
        return FALLBACK_MODULE_NAME.to_string();
    }

    guard_reserved(trimmed)
}

/// Windows device names can't be used as a basename.
fn guard_reserved(name: &str) -> String {
    let (stem, ext) = split_extension(name);
    let upper = stem.to_ascii_uppercase();
    let is_reserved = matches!(upper.as_str(), "CON" | "PRN" | "AUX" | "NUL")
        || ((upper.starts_with("COM") || upper.starts_with("LPT"))
            && upper.len() == 4
            && matches!(upper.as_bytes()[3], b'1'..=b'9'));

    if is_reserved {
        format!("{stem}_{ext}")
    } else {
        name.to_string()
    }
}

/// Split off the final extension, dot included.
///
/// A leading dot does not start an extension, so `.pdf` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Candidate names for `base`: `base` itself, then `stem_1.ext`, `stem_2.ext`, ...
pub fn suffix_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = split_extension(base);
    std::iter::once(base.to_string()).chain((1u32..).map(move |n| format!("{stem}_{n}{ext}")))
}

/// `<prefix>_<YYYYMMDDHHMMSS><micros>.pdf` in UTC.
pub fn timestamped_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.pdf", prefix, now.format("%Y%m%d%H%M%S%6f"))
}
