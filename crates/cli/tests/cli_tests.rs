// Integration tests for the `boxedit` binary.
// Run with: cargo test -p boxedit-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

const PAGE: &str = "\
T 10 80 20 95 0
h 21 80 30 95 0
e 31 80 40 90 0
@b 60 80 70 95 0
$i 71 80 76 95 0
g 77 80 90 95 0
";

fn boxedit(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_boxedit"));
    // Keep tests away from the user's settings file.
    cmd.arg("--config").arg(dir.join("settings.json"));
    cmd.current_dir(dir);
    cmd
}

fn setup(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("page.box");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn run(dir: &Path, args: &[&str]) -> Output {
    boxedit(dir).args(args).output().expect("run boxedit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_reports_pages_as_json() {
    let (dir, _) = setup(&format!("{PAGE}x 1 2 3 4 1\n"));
    let output = run(dir.path(), &["check", "page.box", "--height", "100", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(report["pages"], 2);
    assert_eq!(report["records"], 7);
    assert_eq!(report["page_records"], serde_json::json!([6, 1]));
}

#[test]
fn check_malformed_line_exits_4() {
    let (dir, _) = setup("a 1 2 3 4 0\nb 1 2 3\n");
    let output = run(dir.path(), &["check", "page.box", "--height", "100"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
}

#[test]
fn check_missing_file_exits_3() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), &["check", "nope.box", "--height", "100"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn missing_height_is_usage_error() {
    let (dir, _) = setup(PAGE);
    let output = run(dir.path(), &["check", "page.box"]);
    assert_eq!(output.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// stats / normalize / export-text / split-styles
// ---------------------------------------------------------------------------

#[test]
fn stats_json_descending() {
    let (dir, _) = setup("A 0 0 1 1 0\nB 0 0 1 1 0\n@A 0 0 1 1 0\n");
    let output = run(dir.path(), &["stats", "page.box", "--json"]);
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["letter"], "A");
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[1]["letter"], "B");
}

#[test]
fn normalize_rewrites_line_endings() {
    let (dir, _) = setup("A 10 5 20 15 0\r\nB 20 5 30 15 0\r\n");
    let output = run(dir.path(), &["normalize", "page.box", "--height", "100"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "A 10 5 20 15 0\nB 20 5 30 15 0\n");
}

#[test]
fn export_text_lines() {
    let (dir, _) = setup(PAGE);
    let output = run(dir.path(), &["export-text", "page.box", "--height", "100", "--mode", "lines"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "The big\n");
}

#[test]
fn split_styles_writes_buckets() {
    let (dir, _) = setup(PAGE);
    let output = run(dir.path(), &["split-styles", "page.box", "--height", "100"]);
    assert!(output.status.success());

    let bold = fs::read_to_string(dir.path().join("page.bold.box")).unwrap();
    assert_eq!(bold, "b 60 80 70 95 0\n");
    assert!(dir.path().join("page.italic.box").exists());
    assert!(dir.path().join("page.normal.box").exists());
    assert!(!dir.path().join("page.underline.box").exists());
}

// ---------------------------------------------------------------------------
// edit / import-symbols
// ---------------------------------------------------------------------------

#[test]
fn edit_join_then_undo_round_trips() {
    let (dir, path) = setup(PAGE);
    let output = run(
        dir.path(),
        &["edit", "page.box", "--height", "100", "--op", "join 0 1 2", "--op", "undo"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
}

#[test]
fn edit_writes_output_file() {
    let (dir, path) = setup(PAGE);
    let output = run(
        dir.path(),
        &[
            "edit", "page.box", "--height", "100",
            "--op", "join 0 1",
            "--op", "letter 3 j",
            "--op", "italic 0 on",
            "-o", "out.box",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = fs::read_to_string(dir.path().join("out.box")).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "$Th 10 80 30 95 0");
    assert_eq!(lines[3], "$j 71 80 76 95 0");
    // Input untouched.
    assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
}

#[test]
fn edit_out_of_range_exits_5() {
    let (dir, path) = setup(PAGE);
    let output = run(dir.path(), &["edit", "page.box", "--height", "100", "--op", "split 40"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("split 40"));
    assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
}

#[test]
fn edit_unknown_command_exits_2() {
    let (dir, _) = setup(PAGE);
    let output = run(dir.path(), &["edit", "page.box", "--height", "100", "--op", "explode 1"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn edit_on_missing_page_keeps_existing_pages() {
    let (dir, path) = setup("a 0 0 10 10 0\n");
    // Page 1 does not exist yet; undo on it is a no-op, page 0 survives.
    let output = run(dir.path(), &["edit", "page.box", "--height", "10", "--page", "1", "--op", "undo"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), "a 0 0 10 10 0\n");
}

#[test]
fn import_symbols_with_ligatures() {
    let (dir, path) = setup("a 0 0 10 10 0\nb 10 0 20 10 0\nc 20 0 30 10 0\n");
    fs::write(dir.path().join("symbols.txt"), "fi x\ny\n").unwrap();
    let output = run(
        dir.path(),
        &["import-symbols", "page.box", "--height", "10", "--symbols", "symbols.txt", "--text"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "fi 0 0 10 10 0\nx 10 0 20 10 0\ny 20 0 30 10 0\n"
    );
}

#[test]
fn import_symbols_count_mismatch_warns() {
    let (dir, path) = setup("a 0 0 10 10 0\nb 10 0 20 10 0\n");
    fs::write(dir.path().join("symbols.txt"), "q\n").unwrap();
    let output = run(
        dir.path(),
        &["import-symbols", "page.box", "--height", "10", "--symbols", "symbols.txt"],
    );
    assert!(output.status.success());
    assert!(stderr(&output).contains("1 symbols for 2 boxes"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "q 0 0 10 10 0\nb 10 0 20 10 0\n");
}

#[test]
fn edit_letter_with_space_is_refused() {
    let (dir, path) = setup(PAGE);
    let output = run(dir.path(), &["edit", "page.box", "--height", "100", "--op", "letter 0 a b"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("whitespace"), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
}

#[test]
fn edit_styled_space_glyph_reloads() {
    let (dir, path) = setup("  10 5 20 15 0\nb 20 5 30 15 0\n");
    let output = run(dir.path(), &["edit", "page.box", "--height", "100", "--op", "bold 0 on"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), "@  10 5 20 15 0\nb 20 5 30 15 0\n");

    let output = run(dir.path(), &["check", "page.box", "--height", "100"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn import_symbols_with_inner_space_exits_4() {
    let (dir, path) = setup("a 0 0 10 10 0\nb 10 0 20 10 0\n");
    fs::write(dir.path().join("symbols.txt"), "q\nr s\n").unwrap();
    let output = run(
        dir.path(),
        &["import-symbols", "page.box", "--height", "10", "--symbols", "symbols.txt"],
    );
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), "a 0 0 10 10 0\nb 10 0 20 10 0\n");
}

#[test]
fn check_overflowing_coordinate_exits_4() {
    let (dir, _) = setup("A 0 -2147483648 1 0 0\n");
    let output = run(dir.path(), &["check", "page.box", "--height", "100"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("bottom"), "stderr: {}", stderr(&output));
}
