//! Log file naming: a sanitized command line plus a collision check.
mod sanitize;

use std::path::{Path, PathBuf};

pub use sanitize::{sanitize, LOG_PREFIX};

const LOG_SUFFIX: &str = ".log";

/// The command line as it appears in the log header and as the naming input.
///
/// The separating space is kept even without arguments, so `ls` alone
/// becomes `"ls "` (and the log file `cmdlog_ls_.log`).
pub fn command_line(cmd: &str, args: &[String]) -> String {
    format!("{} {}", cmd, args.join(" "))
}

/// Picks a log file path in the current working directory that no existing
/// file occupies.
pub fn name_for(cmd: &str, args: &[String]) -> PathBuf {
    name_in(Path::new(""), cmd, args)
}

/// Same as [`name_for`] but checks and returns paths under `dir`.
///
/// The check is a plain existence check; two invocations racing on the same
/// command line may pick the same name.
pub fn name_in(dir: &Path, cmd: &str, args: &[String]) -> PathBuf {
    let stem = format!("{LOG_PREFIX}{}", sanitize(&command_line(cmd, args)));

    let first = dir.join(format!("{stem}{LOG_SUFFIX}"));
    if !exists(&first) {
        return first;
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = dir.join(format!("{stem}.{counter}{LOG_SUFFIX}"));
        if !exists(&candidate) {
            tracing::debug!(path = %candidate.display(), "log name collision resolved");
            return candidate;
        }
        counter += 1;
    }
}

// Dangling symlinks count as taken. A path we cannot stat at all counts as
// free so the caller's open reports the real error instead of probing forever.
fn exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}
