use std::sync::OnceLock;

use regex::Regex;

/// Prefix shared by every log file name, and the replacement for a leading `_` or `-`.
pub const LOG_PREFIX: &str = "cmdlog_";

static FORBIDDEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn forbidden_regex() -> &'static Regex {
    FORBIDDEN_REGEX.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|&^%$#@!~;,+\s]"#).expect("FORBIDDEN_REGEX is valid")
    })
}

/// Maps an arbitrary string to a token that is safe to use inside a file name.
///
/// Each forbidden character (path separators, shell metacharacters, quotes,
/// whitespace and `~ ; , +`) becomes exactly one `_`; runs are not collapsed.
/// A result starting with `_` or `-` loses that character and gets the
/// `cmdlog_` prefix instead, so the output never looks like an option or a
/// hidden-ish name.
pub fn sanitize(s: &str) -> String {
    let replaced = forbidden_regex().replace_all(s, "_");

    if let Some(rest) = replaced.strip_prefix(['_', '-']) {
        return format!("{LOG_PREFIX}{rest}");
    }
    replaced.into_owned()
}
