// Capability tagger: end-to-end tests of the `tagger` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_listing(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("listing.S");
    fs::write(&path, contents).unwrap();
    path
}

fn run_tagger(input: &Path, output: &Path, extra: Option<&str>) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("tagger").unwrap();
    cmd.arg(input).arg(output);
    if let Some(extra) = extra {
        cmd.arg(extra);
    }
    cmd.assert()
}

#[test]
fn test_futex_listing() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,98\necall\n");
    let output = dir.path().join("features.txt");

    run_tagger(&input, &output, None).success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "syscall_task\nfutex\n");
}

#[test]
fn test_objdump_fixture() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("features.txt");

    run_tagger(&fixture("hello.S"), &output, Some("img")).success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "syscall_fs\nsyscall_mem\nsyscall_task\nfutex\nimg\n"
    );
}

#[test]
fn test_no_ecall_gives_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,64\nli a7,222\nret\n");
    let output = dir.path().join("features.txt");

    run_tagger(&input, &output, Some("img")).success();

    assert!(output.exists());
    assert_eq!(fs::read(&output).unwrap().len(), 0);
}

#[test]
fn test_img_only_for_sentinel() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,57\necall\n");
    let output = dir.path().join("features.txt");

    run_tagger(&input, &output, Some("other")).success();
    assert_eq!(fs::read_to_string(&output).unwrap(), "syscall_fs\n");

    run_tagger(&input, &output, Some("img")).success();
    assert_eq!(fs::read_to_string(&output).unwrap(), "syscall_fs\nimg\n");
}

#[test]
fn test_output_is_overwritten_and_idempotent() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,198\necall\nli a7,134\necall\n");
    let output = dir.path().join("features.txt");
    fs::write(&output, "stale\nlines\nfrom\nbefore\n").unwrap();

    run_tagger(&input, &output, None).success();
    let first = fs::read(&output).unwrap();
    run_tagger(&input, &output, None).success();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "syscall_net\nsyscall_task\nsignal\n"
    );
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("features.txt");

    run_tagger(&dir.path().join("nope.S"), &output, None)
        .failure()
        .stderr(predicate::str::contains("nope.S"));

    assert!(!output.exists());
}

#[test]
fn test_malformed_operand_fails_without_touching_output() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,64\necall\nli a7,SYS_exit\necall\n");
    let output = dir.path().join("features.txt");
    fs::write(&output, "previous\n").unwrap();

    run_tagger(&input, &output, None)
        .failure()
        .stderr(predicate::str::contains("SYS_exit"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn test_unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,64\necall\n");
    let output = dir.path().join("no_such_dir").join("features.txt");

    run_tagger(&input, &output, None)
        .failure()
        .stderr(predicate::str::contains("Failed to write tag file"));
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let mut cmd = Command::cargo_bin("tagger").unwrap();
    cmd.arg("only-input.S");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_debug_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = write_listing(&dir, "li a7,98\necall\n");
    let output = dir.path().join("features.txt");

    let mut cmd = Command::cargo_bin("tagger").unwrap();
    cmd.arg("--debug").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("futex"));
}
