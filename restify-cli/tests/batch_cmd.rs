use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_pep(dir: &std::path::Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn batch_converts_a_checkout_and_reports() {
    let dir = tempdir().unwrap();
    let peps = dir.path().join("peps");
    fs::create_dir(&peps).unwrap();
    write_pep(
        &peps,
        "pep-0001.txt",
        "PEP: 1\nContent-Type: text/plain\n\nAbstract\n\n    First body line.\n",
    );
    write_pep(&peps, "pep-0002.txt", "PEP: 2\nContent-Type: text/x-rst\n");
    write_pep(&peps, "README", "not a pep\n");

    let output_dir = dir.path().join("output");
    let backup_dir = dir.path().join("backups");

    let mut cmd = cargo_bin_cmd!("restify");
    cmd.arg("batch")
        .arg(peps.as_os_str())
        .arg("--output-dir")
        .arg(output_dir.as_os_str())
        .arg("--backup-dir")
        .arg(backup_dir.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 1 PEPs still in plain text"))
        .stdout(predicate::str::contains("1 text PEPs converted :D"));

    let converted = fs::read_to_string(output_dir.join("pep-0001.txt")).unwrap();
    assert!(converted.contains("Content-Type: text/x-rst"));
    assert!(converted.contains("Abstract\n========"));
}

#[test]
fn batch_copy_backs_up_and_revert_restores() {
    let dir = tempdir().unwrap();
    let peps = dir.path().join("peps");
    fs::create_dir(&peps).unwrap();
    let origin = peps.join("pep-0001.txt");
    write_pep(
        &peps,
        "pep-0001.txt",
        "PEP: 1\nContent-Type: text/plain\n\nAbstract\n\n    Body.\n",
    );

    let output_dir = dir.path().join("output");
    let backup_dir = dir.path().join("backups");

    let mut cmd = cargo_bin_cmd!("restify");
    cmd.arg("batch")
        .arg(peps.as_os_str())
        .arg("--copy")
        .arg("--output-dir")
        .arg(output_dir.as_os_str())
        .arg("--backup-dir")
        .arg(backup_dir.as_os_str());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("backed up and copied"));

    assert!(fs::read_to_string(&origin)
        .unwrap()
        .contains("text/x-rst"));
    assert!(fs::read_to_string(backup_dir.join("pep-0001.txt"))
        .unwrap()
        .contains("text/plain"));

    let mut revert = cargo_bin_cmd!("restify");
    revert
        .arg("revert")
        .arg(peps.as_os_str())
        .arg("--backup-dir")
        .arg(backup_dir.as_os_str());

    revert
        .assert()
        .success()
        .stdout(predicate::str::contains("1 PEPs restored"));

    assert!(fs::read_to_string(&origin)
        .unwrap()
        .contains("text/plain"));
}

#[test]
fn batch_emits_a_json_report() {
    let dir = tempdir().unwrap();
    let peps = dir.path().join("peps");
    fs::create_dir(&peps).unwrap();
    write_pep(
        &peps,
        "pep-0001.txt",
        "PEP: 1\nContent-Type: text/plain\n\nAbstract\n\n    Body.\n",
    );

    let output_dir = dir.path().join("output");

    let mut cmd = cargo_bin_cmd!("restify");
    cmd.arg("batch")
        .arg(peps.as_os_str())
        .arg("--json")
        .arg("--output-dir")
        .arg(output_dir.as_os_str());

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["found"], 1);
    assert_eq!(report["converted"].as_array().unwrap().len(), 1);
    assert!(report["converted"][0]["has_references"].is_boolean());
}

#[test]
fn open_prints_urls_for_backed_up_documents() {
    let dir = tempdir().unwrap();
    let backup_dir = dir.path().join("backups");
    fs::create_dir(&backup_dir).unwrap();
    fs::write(backup_dir.join("pep-0020.txt"), "backup").unwrap();

    let mut cmd = cargo_bin_cmd!("restify");
    cmd.arg("open")
        .arg("--print")
        .arg("--backup-dir")
        .arg(backup_dir.as_os_str())
        .arg("--base-url")
        .arg("http://localhost:8000/dev/peps/");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "http://localhost:8000/dev/peps/pep-0020",
        ));
}
