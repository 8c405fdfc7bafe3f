use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const SQUARE: &str = r#"{
    "contours": [
        {
            "closed": true,
            "nodes": [
                { "position": { "x": 0.0, "y": 0.0 }, "kind": "line" },
                { "position": { "x": 100.0, "y": 0.0 }, "kind": "line" },
                { "position": { "x": 100.0, "y": 100.0 }, "kind": "curve", "smooth": true },
                { "position": { "x": 0.0, "y": 100.0 }, "kind": "line" }
            ]
        }
    ],
    "anchors": [ { "name": "top", "position": { "x": 50.0, "y": 100.0 } } ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("outline.json"), SQUARE).expect("write outline");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("selpal").expect("binary exists");
        cmd.arg("--config")
            .arg(self.path("missing-config.json"))
            .arg("--outline")
            .arg(self.path("outline.json"))
            .arg("--compact");
        cmd
    }
}

fn node(contour: usize, index: usize) -> String {
    format!(r#"{{"type":"node","contour":{},"index":{}}}"#, contour, index)
}

fn selection_file(fixture: &Fixture, nodes: &[usize]) -> PathBuf {
    let entries: Vec<String> = nodes.iter().map(|&i| node(0, i)).collect();
    fixture.write("selection.json", &format!("[{}]", entries.join(",")))
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("run selpal");
    assert!(output.status.success(), "selpal failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn help_displays_usage() {
    Command::cargo_bin("selpal")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn list_controls_prints_rows_and_menu() {
    let fixture = Fixture::new();
    Command::cargo_bin("selpal")
        .expect("binary exists")
        .arg("--config")
        .arg(fixture.path("missing-config.json"))
        .arg("--list-controls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Smooth"))
        .stdout(predicate::str::contains("Shrink Selection"));
}

#[test]
fn grow_from_single_node() {
    let fixture = Fixture::new();
    let selection = selection_file(&fixture, &[0]);
    let out = stdout_of(fixture.command().arg("--selection").arg(&selection).arg("grow"));
    assert!(out.contains(&node(0, 3)));
    assert!(out.contains(&node(0, 1)));
    assert!(!out.contains(&node(0, 2)));
}

#[test]
fn filter_with_armed_mode() {
    let fixture = Fixture::new();
    let selection = selection_file(&fixture, &[0, 1, 2]);
    let out = stdout_of(
        fixture
            .command()
            .arg("--selection")
            .arg(&selection)
            .args(["mode:subtract", "smooth_curves"]),
    );
    assert_eq!(out.trim(), format!("[{},{}]", node(0, 0), node(0, 1)));
}

#[test]
fn anchors_row_button() {
    let fixture = Fixture::new();
    let out = stdout_of(fixture.command().arg("anchors:add"));
    assert_eq!(out.trim(), r#"[{"type":"anchor","index":0}]"#);
}

#[test]
fn stale_selection_is_left_alone() {
    let fixture = Fixture::new();
    let selection = selection_file(&fixture, &[1, 12]);
    let out = stdout_of(fixture.command().arg("--selection").arg(&selection).arg("shrink"));
    assert_eq!(out.trim(), format!("[{},{}]", node(0, 1), node(0, 12)));
}

#[test]
fn unknown_control_is_rejected() {
    let fixture = Fixture::new();
    fixture
        .command()
        .arg("teleport")
        .assert()
        .failure()
        .stderr(predicate::str::contains("teleport"));
}

#[test]
fn missing_outline_file_reports_path() {
    let fixture = Fixture::new();
    Command::cargo_bin("selpal")
        .expect("binary exists")
        .arg("--config")
        .arg(fixture.path("missing-config.json"))
        .arg("--outline")
        .arg(Path::new("/nonexistent/outline.json"))
        .arg("grow")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read outline"));
}

#[test]
fn reset_mode_forgets_stored_operation() {
    let fixture = Fixture::new();
    let prefs = fixture.path("prefs");
    let config = fixture.write(
        "config.json",
        &format!(r#"{{ "preferences_path": {:?} }}"#, prefs.display().to_string()),
    );
    let outline = fixture.path("outline.json");
    let stored = prefs.join("selection_palette.json");

    Command::cargo_bin("selpal")
        .expect("binary exists")
        .arg("--config")
        .arg(&config)
        .arg("--outline")
        .arg(&outline)
        .arg("mode:intersect")
        .assert()
        .success();
    let contents = fs::read_to_string(&stored).expect("mode was stored");
    assert!(contents.contains("intersect"), "{}", contents);

    Command::cargo_bin("selpal")
        .expect("binary exists")
        .arg("--config")
        .arg(&config)
        .arg("--reset-mode")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!stored.exists());
}
