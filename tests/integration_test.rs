use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Server, ServerGuard};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

/// Serves a filters catalog with a single `simple` entry named `debug`.
fn serve_debug_filter(server: &mut ServerGuard) {
    let url = server.url();
    server
        .mock("GET", "/filters.yaml")
        .with_status(200)
        .with_body(format!(
            "- name: debug\n  url: {}/debug.yaml\n  url-type: simple\n",
            url
        ))
        .create();
    server
        .mock("GET", "/debug.yaml")
        .with_status(200)
        .with_body("name: debug\nversion: 1.2.0\n")
        .create();
    server
        .mock("GET", "/debug.py")
        .with_status(200)
        .with_body("import sys\n")
        .create();
}

fn pandocpm(target: &Path, index_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("pandocpm"));
    cmd.env_remove("PANDOCPM_TARGET")
        .env_remove("PANDOCPM_INDEX_URL")
        .env_remove("PANDOCPM_INSTALLER")
        .arg("--target")
        .arg(target)
        .arg("--index_url")
        .arg(index_url);
    cmd
}

fn filter_files(target: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(target.join("filters"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_end_to_end_install_replace_uninstall() {
    let mut server = Server::new();
    serve_debug_filter(&mut server);
    let index_url = format!("{}/{{}}.yaml", server.url());

    let root_dir = tempdir().unwrap();
    let target = root_dir.path();

    pandocpm(target, &index_url)
        .args(["install", "filter", "debug"])
        .assert()
        .success();
    assert_eq!(filter_files(target), vec!["debug.py", "debug.yaml"]);
    assert_eq!(
        std::fs::read_to_string(target.join("filters/debug.py")).unwrap(),
        "import sys\n"
    );

    // Installing over an existing copy needs --replace
    pandocpm(target, &index_url)
        .args(["install", "filter", "debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already installed"));

    pandocpm(target, &index_url)
        .args(["install", "filter", "debug", "--replace", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "filter debug installed successfully (default branch)",
        ));
    assert_eq!(filter_files(target), vec!["debug.py", "debug.yaml"]);

    pandocpm(target, &index_url)
        .args(["list", "filter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug 1.2.0"));

    pandocpm(target, &index_url)
        .args(["uninstall", "filter", "debug"])
        .assert()
        .success();
    assert!(filter_files(target).is_empty());

    pandocpm(target, &index_url)
        .args(["uninstall", "filter", "debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("filter debug not installed"));
}

#[test]
fn test_install_unknown_branch_lists_catalog() {
    let mut server = Server::new();
    serve_debug_filter(&mut server);
    let index_url = format!("{}/{{}}.yaml", server.url());

    let root_dir = tempdir().unwrap();
    let target = root_dir.path();

    pandocpm(target, &index_url)
        .args(["install", "filter", "debug", "--branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on index"))
        .stderr(predicate::str::contains("debug (default)"));
    assert!(filter_files(target).is_empty());
}

#[test]
fn test_search_and_info() {
    let mut server = Server::new();
    serve_debug_filter(&mut server);
    let index_url = format!("{}/{{}}.yaml", server.url());
    let root_dir = tempdir().unwrap();

    pandocpm(root_dir.path(), &index_url)
        .args(["search", "filter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug (default) simple"));

    pandocpm(root_dir.path(), &index_url)
        .args(["info", "filter", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 1.2.0"));
}

#[test]
fn test_catalog_unreachable() {
    let mut server = Server::new();
    server.mock("GET", "/filters.yaml").with_status(500).create();
    let index_url = format!("{}/{{}}.yaml", server.url());
    let root_dir = tempdir().unwrap();

    pandocpm(root_dir.path(), &index_url)
        .args(["install", "filter", "debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("filters.yaml"));
}

#[test]
fn test_upgrade_is_not_a_command() {
    Command::new(cargo::cargo_bin!("pandocpm"))
        .args(["upgrade", "filter", "debug"])
        .assert()
        .failure();
}
