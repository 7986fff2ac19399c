use std::borrow::Cow;
use std::sync::OnceLock;

use regex::bytes::Regex;

// CSI sequences (colors, cursor movement) and OSC sequences terminated by BEL or ST.
static ANSI_REGEX: OnceLock<Regex> = OnceLock::new();

fn ansi_regex() -> &'static Regex {
    ANSI_REGEX.get_or_init(|| {
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
            .expect("ANSI_REGEX is valid")
    })
}

pub fn strip_ansi(buf: &[u8]) -> Cow<'_, [u8]> {
    ansi_regex().replace_all(buf, &b""[..])
}
