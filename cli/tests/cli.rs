#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output, Stdio};

fn cmdlog(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdlog"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("cmdlog binary runs")
}

fn log_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".log"))
        .collect();
    names.sort();
    names
}

#[test]
fn no_command_prints_usage_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = cmdlog(dir.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Usage: cmdlog [OPTION...] CMD [CMD OPTION...]"));
    assert!(stdout.contains(&format!("cmdlog v{}", env!("CARGO_PKG_VERSION"))));
    assert!(log_files(dir.path()).is_empty());
}

#[test]
fn child_exit_status_is_not_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let out = cmdlog(dir.path(), &["sh", "-c", "echo out; exit 7"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains(" out\n"));

    let logs = log_files(dir.path());
    assert_eq!(logs, vec!["cmdlog_sh_-c_echo_out__exit_7.log"]);
    let log = std::fs::read_to_string(dir.path().join(&logs[0])).unwrap();
    assert!(log.starts_with("sh -c echo out; exit 7\n\n"), "{log:?}");
    assert!(log.contains("Command finished with error: exit status: 7"));
}

#[test]
fn repeated_runs_get_numbered_logs() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..3 {
        let out = cmdlog(dir.path(), &["echo", "hi"]);
        assert_eq!(out.status.code(), Some(0));
    }

    assert_eq!(
        log_files(dir.path()),
        vec![
            "cmdlog_echo_hi.1.log",
            "cmdlog_echo_hi.2.log",
            "cmdlog_echo_hi.log"
        ]
    );
}

#[test]
fn unwritable_directory_fails_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let ro = dir.path().join("ro");
    std::fs::create_dir(&ro).unwrap();
    let mut perms = std::fs::metadata(&ro).unwrap().permissions();
    std::os::unix::fs::PermissionsExt::set_mode(&mut perms, 0o555);
    std::fs::set_permissions(&ro, perms).unwrap();

    // root ignores directory permissions; nothing to check there.
    if std::fs::write(ro.join("writable"), b"").is_ok() {
        return;
    }

    let marker = dir.path().join("marker");
    let script = format!("touch '{}'", marker.display());
    let out = cmdlog(&ro, &["sh", "-c", &script]);

    assert_ne!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error opening log file"));
    assert!(!marker.exists(), "child must never be spawned");
}

#[test]
fn missing_command_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = cmdlog(dir.path(), &["cmdlog-test-no-such-binary"]);

    assert_eq!(out.status.code(), Some(20));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error starting command"));
}
