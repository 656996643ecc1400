use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

const CHAIN_4: &str = "\
number_of_sites: 4
spin_inversion: 0
generators:
  - permutation: [1, 2, 3, 0]
    sector: 0
  - permutation: [3, 2, 1, 0]
    sector: 0
";

fn lsym(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lsym"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run lsym")
}

fn write_config(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write config");
    path.to_string_lossy().into_owned()
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "lsym failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let body = String::from_utf8(output.stdout.clone()).expect("utf8");
    serde_json::from_str(body.trim()).expect("json")
}

#[test]
fn group_closes_dihedral_chain() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "chain.yaml", CHAIN_4);
    let value = stdout_json(&lsym(&["group", "--config", &config]));
    assert_eq!(value["size"], 8);
    assert_eq!(value["number_of_sites"], 4);
    assert_eq!(value["network_depth"], 3);
    assert_eq!(value["elements"].as_array().map(Vec::len), Some(8));
}

#[test]
fn group_writes_identical_json_for_yaml_and_json_input() {
    let dir = tempdir().expect("tempdir");
    let yaml = write_config(dir.path(), "chain.yaml", CHAIN_4);
    let json = write_config(
        dir.path(),
        "chain.json",
        r#"{"number_of_sites":4,"generators":[{"permutation":[1,2,3,0]},{"permutation":[3,2,1,0]}]}"#,
    );
    let yaml_out = dir.path().join("out/yaml.json");
    let json_out = dir.path().join("out/json.json");
    for (config, out) in [(&yaml, &yaml_out), (&json, &json_out)] {
        let output = lsym(&["group", "--config", config, "--out", &out.to_string_lossy()]);
        assert!(output.status.success());
    }
    assert_eq!(
        fs::read(&yaml_out).expect("yaml summary"),
        fs::read(&json_out).expect("json summary")
    );
}

#[test]
fn state_info_reports_representative() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "chain.yaml", CHAIN_4);
    let value = stdout_json(&lsym(&[
        "state-info",
        "--config",
        &config,
        "--state",
        "0b0110",
        "--state",
        "3",
    ]));
    let states = value["states"].as_array().expect("states");
    assert_eq!(states.len(), 2);
    assert_eq!(states[0]["representative"], "0x3");
    assert_eq!(states[1]["representative"], "0x3");
    assert_eq!(states[0]["is_representative"], false);
    assert_eq!(states[1]["is_representative"], true);
    let norm = states[1]["norm"].as_f64().expect("norm");
    assert!((norm - 0.5).abs() < 1e-12, "norm = {norm}");
}

#[test]
fn state_info_random_is_seeded() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "chain.yaml", CHAIN_4);
    let args = ["state-info", "--config", &config, "--random", "5", "--seed", "17"];
    let first = stdout_json(&lsym(&args));
    let second = stdout_json(&lsym(&args));
    assert_eq!(first, second);
    assert_eq!(first["states"].as_array().map(Vec::len), Some(5));
}

#[test]
fn state_info_rejects_out_of_range_state() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(dir.path(), "chain.yaml", CHAIN_4);
    let output = lsym(&["state-info", "--config", &config, "--state", "0x10"]);
    assert!(!output.status.success());
}

#[test]
fn incompatible_generators_fail() {
    let dir = tempdir().expect("tempdir");
    let config = write_config(
        dir.path(),
        "bad.yaml",
        "number_of_sites: 4\ngenerators:\n  - permutation: [1, 2, 3, 0]\n    sector: 1\n  - permutation: [3, 2, 1, 0]\n",
    );
    let output = lsym(&["group", "--config", &config]);
    assert!(!output.status.success());
}

#[test]
fn tiers_lists_detected_tier() {
    let value = stdout_json(&lsym(&["tiers", "--quiet"]));
    let detected = value["detected"].clone();
    let available = value["available"].as_array().expect("available");
    assert!(available.contains(&detected));
}

#[test]
fn rust_log_controls_verbosity() {
    let verbose = Command::new(env!("CARGO_BIN_EXE_lsym"))
        .args(["tiers", "--quiet"])
        .env("RUST_LOG", "debug")
        .output()
        .expect("run lsym");
    assert!(verbose.status.success());
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("selected capability tier"), "stderr: {stderr}");

    let quiet = Command::new(env!("CARGO_BIN_EXE_lsym"))
        .args(["tiers", "--quiet"])
        .env_remove("RUST_LOG")
        .output()
        .expect("run lsym");
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("selected capability tier"));
}
