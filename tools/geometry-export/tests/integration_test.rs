//! Integration tests for geometry-export
//!
//! Runs the binary end to end: config -> OBJ file on disk

use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_geometry-export"))
        .args(args)
        .output()
        .expect("Failed to run geometry-export")
}

fn count(text: &str, prefix: &str) -> usize {
    text.lines().filter(|l| l.starts_with(prefix)).count()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

#[test]
fn test_config_to_obj() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("torus.toml");
    let obj_path = dir.path().join("torus.obj");

    std::fs::write(
        &config_path,
        r#"
[shape]
kind = "torus"
segments = 8
minor_segments = 4
"#,
    )
    .expect("Failed to write config");

    let output = run(&[path_arg(&config_path), "-o", path_arg(&obj_path)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(&obj_path).expect("Failed to read OBJ");
    assert_eq!(count(&text, "v "), 9 * 5);
    assert_eq!(count(&text, "vn "), 9 * 5);
    assert_eq!(count(&text, "vt "), 9 * 5);
    assert_eq!(count(&text, "f "), 8 * 4 * 2);
}

#[test]
fn test_output_section() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("box.toml");
    let obj_path = dir.path().join("box.obj");

    std::fs::write(
        &config_path,
        format!(
            r#"
[shape]
kind = "box"
sx = 2.0

[output]
path = {:?}
triangulate = true
"#,
            path_arg(&obj_path)
        ),
    )
    .expect("Failed to write config");

    let output = run(&[path_arg(&config_path)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(&obj_path).expect("Failed to read OBJ");
    assert_eq!(count(&text, "v "), 8);
    assert_eq!(count(&text, "f "), 12);
    assert!(text.contains("v 1 -1 1"));
}

#[test]
fn test_shape_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("circle.obj");

    let output = run(&["--shape", "circle", "-o", path_arg(&obj_path)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(&obj_path).expect("Failed to read OBJ");
    assert_eq!(count(&text, "v "), 33);
    assert_eq!(count(&text, "l "), 32);
}

#[test]
fn test_print_config() {
    let output = run(&["--shape", "cylinder", "--print-config"]);
    assert!(output.status.success());

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("kind = \"cylinder\""));
    assert!(text.contains("cap_segments = 1"));
}

#[test]
fn test_failures() {
    let dir = tempdir().expect("Failed to create temp dir");

    assert!(!run(&["--shape", "teapot"]).status.success());
    assert!(!run(&[path_arg(&dir.path().join("missing.toml"))]).status.success());

    let config_path = dir.path().join("deep.toml");
    std::fs::write(&config_path, "[shape]\nkind = \"icosphere\"\nsubdivisions = 11\n")
        .expect("Failed to write config");
    let obj_path = dir.path().join("deep.obj");
    let output = run(&[path_arg(&config_path), "-o", path_arg(&obj_path)]);
    assert!(!output.status.success());
    assert!(!obj_path.exists());
}
