use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("apex").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn init_then_build_with_no_arguments() {
    let temp = tempdir().unwrap();

    cmd(temp.path()).arg("init").assert().success();
    cmd(temp.path())
        .assert()
        .success()
        .stdout(contains("Built demo for skyline-builders"))
        .stdout(contains("Built demo for acme"));

    let index = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
    assert!(index.contains("<title>Apex Builder — The Ultimate Real Estate Cloud</title>"));
    assert!(index.contains("href=\"demos/acme/index.html\""));
    assert!(!index.contains("Tallygo"));

    let acme = fs::read_to_string(temp.path().join("dist/demos/acme/index.html")).unwrap();
    assert!(acme.contains("<span class=\"logo\">A</span>"));
    assert!(!acme.contains("{{"));
}

#[test]
fn init_keeps_existing_files() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("clients.json"), "[]").unwrap();

    cmd(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("already exists"));

    assert_eq!(fs::read_to_string(temp.path().join("clients.json")).unwrap(), "[]");
}

#[test]
fn build_honours_output_override() {
    let temp = tempdir().unwrap();
    cmd(temp.path()).arg("init").assert().success();

    cmd(temp.path())
        .args(["build", "--output", "site", "--no-minify"])
        .assert()
        .success();

    let index = fs::read_to_string(temp.path().join("site/index.html")).unwrap();
    assert!(index.contains(".demo-grid {"));
    assert!(!temp.path().join("dist").exists());
}

#[test]
fn missing_landing_template_is_reported_but_not_fatal() {
    let temp = tempdir().unwrap();
    cmd(temp.path()).arg("init").assert().success();
    fs::remove_file(temp.path().join("tallygo/index.html")).unwrap();

    cmd(temp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(contains("not found"));

    assert!(!temp.path().join("dist/index.html").exists());
}

#[test]
fn malformed_client_data_fails() {
    let temp = tempdir().unwrap();
    cmd(temp.path()).arg("init").assert().success();
    fs::write(temp.path().join("clients.json"), "[{\"slug\": ").unwrap();

    cmd(temp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(contains("Invalid client data"));
}

#[test]
fn serve_requires_a_built_site() {
    let temp = tempdir().unwrap();

    cmd(temp.path())
        .args(["serve", "--dir", "dist"])
        .assert()
        .failure()
        .stderr(contains("apex build"));
}
