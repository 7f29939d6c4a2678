//! Integration tests for the command-line surface: usage, errors, output routing.

use assert_cmd::Command;
use predicates::prelude::*;

use super::helpers::{parse_csv, row, Sandbox};

// ============================================================================
// Help and Usage Tests
// ============================================================================

#[test]
fn help_exits_0_and_lists_flags() {
    Command::cargo_bin("docs2csv")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<DIRECTORY>"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--ocr"))
        .stdout(predicate::str::contains("--force-ocr"))
        .stdout(predicate::str::contains("--recurse"));
}

#[test]
fn missing_directory_is_a_usage_error() {
    Command::cargo_bin("docs2csv")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<DIRECTORY>"));
}

#[test]
fn nonexistent_directory_exits_1_with_message() {
    let sandbox = Sandbox::new();
    let missing = sandbox.path().join("no-such-dir");

    let (stdout, stderr, exit_code) = sandbox.run(&[missing.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Cannot read input directory"), "stderr: {}", stderr);
    assert!(stderr.contains("no-such-dir"));
}

#[test]
fn invalid_settings_file_exits_1() {
    let sandbox = Sandbox::new();
    let settings = sandbox.path().join("bad.toml");
    std::fs::write(&settings, "render_dpi = \"high\"\n").unwrap();

    Command::cargo_bin("docs2csv")
        .unwrap()
        .arg("--config")
        .arg(&settings)
        .arg(sandbox.input())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bad.toml"));
}

// ============================================================================
// Output Routing Tests
// ============================================================================

#[test]
fn empty_directory_outputs_header_only() {
    let sandbox = Sandbox::new();

    let (stdout, _stderr, exit_code) = sandbox.run_input(&[]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "id,text,title,url\n");
}

#[test]
fn empty_directory_in_list_mode_outputs_nothing() {
    let sandbox = Sandbox::new();

    let (stdout, _stderr, exit_code) = sandbox.run_input(&["--list"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn text_files_become_rows() {
    let sandbox = Sandbox::new();
    sandbox
        .file("a.txt", "hello world")
        .file("b.txt", "page one\x0cpage two\0");

    let (stdout, _stderr, exit_code) = sandbox.run_input(&[]);
    let (header, rows) = parse_csv(&stdout);

    assert_eq!(exit_code, 0);
    assert_eq!(header, ["id", "text", "title", "url"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(row(&rows, "a.txt")[1], "hello world");
    assert_eq!(row(&rows, "b.txt")[1], "page one\npage two");
}

#[test]
fn ids_are_stable_across_runs() {
    let sandbox = Sandbox::new();
    sandbox.file("a.txt", "one").file("b.txt", "two");

    let (first, _, _) = sandbox.run_input(&[]);
    let (second, _, _) = sandbox.run_input(&[]);
    let (_, first_rows) = parse_csv(&first);
    let (_, second_rows) = parse_csv(&second);

    assert_eq!(first_rows[0][0], second_rows[0][0]);
    assert_ne!(first_rows[0][0], first_rows[1][0]);
    assert_eq!(first_rows[0][0].len(), 32);
}

#[test]
fn diagnostics_go_to_stderr_only() {
    let sandbox = Sandbox::new();
    sandbox.file("a.txt", "hello");

    let (stdout, stderr, _) = sandbox.run_input(&[]);

    assert!(stderr.contains("Processing"));
    assert!(stderr.contains("a.txt"));
    assert!(!stdout.contains("Processing"));
}

#[test]
fn output_file_receives_csv() {
    let sandbox = Sandbox::new();
    sandbox.file("a.txt", "to a file");
    let out = sandbox.path().join("out.csv");

    let input = sandbox.input();
    let (stdout, _stderr, exit_code) =
        sandbox.run(&[input.to_str().unwrap(), out.to_str().unwrap()]);

    assert_eq!(exit_code, 0);
    assert!(stdout.is_empty());
    let (_, rows) = parse_csv(&std::fs::read_to_string(out).unwrap());
    assert_eq!(rows[0][1], "to a file");
}

#[test]
fn unwritable_output_exits_1() {
    let sandbox = Sandbox::new();
    let out = sandbox.path().join("missing-dir").join("out.csv");

    let input = sandbox.input();
    let (_stdout, stderr, exit_code) =
        sandbox.run(&[input.to_str().unwrap(), out.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Cannot open output file"));
}

// ============================================================================
// Traversal Flag Tests
// ============================================================================

#[test]
fn unrecognized_files_never_appear() {
    let sandbox = Sandbox::new();
    sandbox
        .file("a.txt", "kept")
        .file("b.md", "ignored")
        .file("c.TXT", "wrong case")
        .file("d.png", "not a jpg");

    let (stdout, _, _) = sandbox.run_input(&[]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(rows.len(), 1);
    assert!(rows[0][2].ends_with("a.txt"));
}

#[test]
fn subdirectories_need_recurse() {
    let sandbox = Sandbox::new();
    sandbox.file("top.txt", "top").file("x/y/z/deep.txt", "deep");

    let (flat, _, _) = sandbox.run_input(&[]);
    let (deep, _, _) = sandbox.run_input(&["-r"]);

    assert_eq!(parse_csv(&flat).1.len(), 1);
    let (_, rows) = parse_csv(&deep);
    assert_eq!(rows.len(), 2);
    assert_eq!(row(&rows, "deep.txt")[1], "deep");
}

#[test]
fn list_mode_prints_paths_without_extracting() {
    let sandbox = Sandbox::new();
    sandbox.file("a.txt", "hello").file("b.pdf", "%PDF").file("c.md", "no");

    let (stdout, _, exit_code) = sandbox.run_input(&["-l"]);
    let lines: Vec<_> = stdout.lines().collect();

    assert_eq!(exit_code, 0);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a.txt"));
    assert!(lines[1].ends_with("b.pdf"));
    assert!(!stdout.contains("id,text"));
    assert!(!stdout.contains("hello"));
}

#[test]
fn url_base_flag_builds_http_locators() {
    let sandbox = Sandbox::new();
    sandbox.file("sub/a.txt", "x");

    let (stdout, _, _) = sandbox.run_input(&["-r", "-u", "http://archive.local/docs"]);
    let (_, rows) = parse_csv(&stdout);

    assert_eq!(rows[0][3], "http://archive.local/docs/sub/a.txt");
}
