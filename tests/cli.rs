use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SCENE: &str = r#"{
    "graph": {"A": {"B": 1}, "B": {"C": 2}, "C": {}},
    "paths": [{"nodes": ["A", "B"], "node_color": "red", "edge_color": "red"}],
    "source": "A",
    "sink": "C",
    "legend": {"lines": ["A to B"]}
}"#;

#[test]
fn writes_dot_file_for_scene() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let scene_path = tmp.path().join("route.json");
    fs::write(&scene_path, SCENE)?;
    let out_dir = tmp.path().join("data").join("dot");

    let mut cmd = Command::cargo_bin("graphdot")?;
    cmd.arg("--input")
        .arg(&scene_path)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--dot-only");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("route.dot"));

    let dot = fs::read_to_string(out_dir.join("route.dot"))?;
    assert!(dot.contains("\"A\" [color=\"red\"]"));
    assert!(dot.contains("\"C\" [rank=\"sink\"]"));

    Ok(())
}

#[test]
fn prints_dot_to_stdout_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("graphdot")?;
    cmd.arg("render").arg("--stdout").write_stdin(SCENE);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("digraph G {"))
        .stdout(predicate::str::contains(
            "\"A\" -> \"B\" [label=\"1\", penwidth=2, color=\"red\"]",
        ));

    Ok(())
}

#[test]
fn missing_template_is_a_configuration_error() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;

    let mut cmd = Command::cargo_bin("graphdot")?;
    cmd.arg("--stdout")
        .arg("--template")
        .arg(tmp.path().join("absent.dot"))
        .write_stdin(SCENE);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load DOT template"));

    Ok(())
}

#[test]
fn failed_layout_keeps_dot_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let out_dir = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("graphdot")?;
    cmd.arg("--name")
        .arg("broken")
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--engine")
        .arg("graphdot-no-such-layout-engine")
        .write_stdin(SCENE);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to render image for 'broken'"));
    assert!(out_dir.join("broken.dot").is_file());

    Ok(())
}
