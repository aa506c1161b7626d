use assert_cmd::prelude::*;
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let config = dir.join("feedpilot.yaml");
    let policy = dir.join("policy.yaml");
    std::fs::write(
        &policy,
        "engine:\n  debounce_ms: 750\nprofiles:\n  reddit:\n    stuck_timeout_ms: 6000\n",
    )
    .expect("write policy");
    std::fs::write(
        &config,
        format!(
            "store_path: {}\npolicy_paths:\n  - {}\n",
            dir.join("store.json").display(),
            policy.display()
        ),
    )
    .expect("write config");
    config
}

fn run_json(config: &Path, args: &[&str]) -> Value {
    let mut cmd = Command::cargo_bin("feedpilot").expect("binary");
    let assert = cmd
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(["--output", "json"])
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    serde_json::from_str(stdout.trim()).expect("valid json")
}

#[test]
fn toggle_persists_and_flips() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path());

    let value = run_json(&config, &["toggle", "off"]);
    assert_eq!(value["enabled"], Value::Bool(false));
    assert_eq!(value["previous"], Value::Bool(true));

    let value = run_json(&config, &["toggle"]);
    assert_eq!(value["enabled"], Value::Bool(true));
    assert_eq!(value["previous"], Value::Bool(false));
}

#[test]
fn stats_reads_daily_counters() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path());
    std::fs::write(
        dir.path().join("store.json"),
        r#"{ "analytics_2024-06-01": { "youtube": 4, "tiktok": 2, "total": 6 } }"#,
    )
    .expect("seed store");

    let value = run_json(&config, &["stats", "--date", "2024-06-01"]);
    assert_eq!(value["date"], "2024-06-01");
    assert_eq!(value["total"].as_u64(), Some(6));
    assert_eq!(value["per_platform"]["youtube"].as_u64(), Some(4));

    let value = run_json(&config, &["stats", "--date", "2024-06-02"]);
    assert_eq!(value["total"].as_u64(), Some(0));
}

#[test]
fn profiles_reflect_policy_file() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path());

    let value = run_json(&config, &["profiles", "--platform", "reddit"]);
    assert_eq!(value["engine"]["debounce_ms"].as_u64(), Some(750));
    assert_eq!(
        value["profiles"]["reddit"]["stuck_timeout_ms"].as_u64(),
        Some(6000)
    );
    assert!(value["profiles"].get("youtube").is_none());
    let provenance = value["provenance"].as_array().expect("provenance");
    assert!(provenance.iter().any(|entry| {
        entry["path"] == "profiles.reddit.stuck_timeout_ms" && entry["source"] == "File"
    }));
}
