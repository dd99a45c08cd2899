//! Binary-level tests: validate-only short-circuit, seeded reproducible
//! runs, and artifact shape. All runs use `--no-animate` so nothing waits
//! on a wall clock.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn write_candidates(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn good_list() -> &'static str {
    r#"{
        "schema_version": "1.x",
        "candidates": [
            {"candidate_id":"film:1","title":"Stalker","year":1979,"rating_tenths":43},
            {"candidate_id":"film:2","title":"Ran","year":1985,"rating_tenths":42},
            {"candidate_id":"film:3","title":"Playtime","year":1967,"rating_tenths":41},
            {"candidate_id":"film:4","title":"Close-Up","year":1990,"rating_tenths":42},
            {"candidate_id":"film:5","title":"Yi Yi","year":2000,"rating_tenths":42}
        ]
    }"#
}

fn reel() -> Command {
    Command::cargo_bin("reel").unwrap()
}

#[test]
fn validate_only_accepts_a_good_file() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(&dir, "films.json", good_list());

    reel()
        .args(["--candidates", list.to_str().unwrap(), "--validate-only"])
        .assert()
        .success()
        .stderr(predicate::str::contains("5 candidates OK"));
}

#[test]
fn validate_only_rejects_duplicates_with_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(
        &dir,
        "dup.json",
        r#"{"candidates":[
            {"candidate_id":"film:1","title":"A"},
            {"candidate_id":"film:1","title":"B"}
        ]}"#,
    );

    reel()
        .args(["--candidates", list.to_str().unwrap(), "--validate-only"])
        .assert()
        .code(2);
}

#[test]
fn missing_candidate_file_is_a_validation_error() {
    reel()
        .args(["--candidates", "/definitely/not/here.json", "--validate-only"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn empty_list_is_an_engine_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(&dir, "empty.json", r#"{"candidates":[]}"#);
    let out = dir.path().join("out");

    reel()
        .args([
            "--candidates",
            list.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--no-animate",
        ])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("empty candidate list"));
}

#[test]
fn seeded_run_writes_a_reproducible_record() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(&dir, "films.json", good_list());

    let winner_of = |out: &std::path::Path| -> String {
        reel()
            .args([
                "--candidates",
                list.to_str().unwrap(),
                "--out",
                out.to_str().unwrap(),
                "--seed",
                "42",
                "--no-animate",
                "--quiet",
            ])
            .assert()
            .success();
        let record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("spin_record.json")).unwrap())
                .unwrap();
        assert!(record["id"].as_str().unwrap().starts_with("SPIN:"));
        assert_eq!(record["seed"], serde_json::json!(42));
        assert_eq!(record["plan"]["candidate_count"], serde_json::json!(5));
        assert_eq!(record["candidates_sha256"].as_str().unwrap().len(), 64);
        record["winner"]["candidate_id"].as_str().unwrap().to_string()
    };

    let a = winner_of(&dir.path().join("run_a"));
    let b = winner_of(&dir.path().join("run_b"));
    assert_eq!(a, b, "same seed, same list → same draw");
    assert!(a.starts_with("film:"));
}

#[test]
fn multiple_spins_write_one_record_each() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(&dir, "films.json", good_list());
    let out = dir.path().join("out");

    reel()
        .args([
            "--candidates",
            list.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--seed",
            "7",
            "--spins",
            "3",
            "--no-animate",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("winner:").count(3));

    assert!(out.join("spin_record.json").is_file());
    assert!(out.join("spin_record.2.json").is_file());
    assert!(out.join("spin_record.3.json").is_file());
}

#[test]
fn scheme_paths_are_rejected() {
    reel()
        .args(["--candidates", "https://example.com/films.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("local"));
}

#[test]
fn zero_spins_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let list = write_candidates(&dir, "films.json", good_list());

    reel()
        .args([
            "--candidates",
            list.to_str().unwrap(),
            "--spins",
            "0",
            "--no-animate",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--spins"));
}
