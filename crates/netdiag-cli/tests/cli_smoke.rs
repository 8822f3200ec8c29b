use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

#[test]
fn cli_validates_script_fixture() {
    let exe = assert_cmd::cargo_bin!("netdiag-cli");
    let output = Command::new(exe)
        .args(["validate", fixture("office.ndg").to_string_lossy().as_ref()])
        .output()
        .expect("run netdiag-cli");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn cli_parse_prints_model_json() {
    let exe = assert_cmd::cargo_bin!("netdiag-cli");
    let output = Command::new(exe)
        .args(["parse", fixture("office.json").to_string_lossy().as_ref()])
        .output()
        .expect("run netdiag-cli");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["diagram"]["nodes"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["style"]["linkPalette"], "RED_GREEN");
}

#[test]
fn cli_renders_svg_with_overrides() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("office.svg");

    let exe = assert_cmd::cargo_bin!("netdiag-cli");
    Command::new(exe)
        .args([
            "render",
            "--title",
            "Office & Lab",
            "--no-legend",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("office.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("Office &amp; Lab"));
    assert!(!svg.contains(r#"class="legend""#));
}

#[test]
fn cli_renders_png_with_default_out_path_for_file_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let tmp_fixture = tmp.path().join("office.ndg");
    fs::copy(fixture("office.ndg"), &tmp_fixture).expect("copy fixture");

    let expected_out = tmp_fixture.with_extension("png");

    let exe = assert_cmd::cargo_bin!("netdiag-cli");
    Command::new(exe)
        .args([
            "render",
            "--format",
            "png",
            tmp_fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&expected_out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn cli_reports_validation_errors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let broken = tmp.path().join("broken.ndg");
    fs::write(
        &broken,
        "Node N1: Position(0, 0), Size(10, 10), Label(\"A\")\nN1 ---[5,5]--> N7\n",
    )
    .expect("write fixture");

    let exe = assert_cmd::cargo_bin!("netdiag-cli");
    Command::new(exe)
        .args(["validate", broken.to_string_lossy().as_ref()])
        .assert()
        .failure();
}
