use assert_cmd::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn arg(p: &Path) -> String {
    p.to_string_lossy().to_string()
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let out = Command::new(exe).args(args).assert().success();
    serde_json::from_slice(&out.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn layout_prints_the_tree_layout() {
    let family = arg(&fixture("family.json"));
    let narrow = arg(&fixture("narrow.yaml"));
    let v = run_json(&["layout", "--config", &narrow, &family]);

    assert_eq!(v["rootId"], "A");
    assert_eq!(v["layoutType"], "descendants");
    let x = |id: &str| v["nodes"][id]["x"].as_f64().unwrap();
    assert_eq!((x("A"), x("B"), x("C"), x("D")), (0.0, 100.0, 0.0, 100.0));
    assert_eq!(v["nodes"]["A"]["subtreeWidth"].as_f64(), Some(180.0));
    assert_eq!(v["nodes"]["C"]["level"], 1);

    let ids: Vec<&str> = v["connections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["parent-child:A:C", "parent-child:A:D", "spouse:A:B"]
    );
    assert_eq!(v["diagnostics"][0]["kind"], "danglingRelationship");
}

#[test]
fn layout_reads_stdin_and_honours_flags() {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let input = std::fs::read(fixture("family.json")).unwrap();
    let out = assert_cmd::Command::new(exe)
        .args(["--direction", "rtl", "--line-style", "straight", "-"])
        .write_stdin(input)
        .assert()
        .success();
    let v: Value = serde_json::from_slice(&out.get_output().stdout).unwrap();

    assert_eq!(v["direction"], "rtl");
    // default widths: B sits one node plus spouse spacing to the left after mirroring
    assert_eq!(v["nodes"]["B"]["x"].as_f64(), Some(-180.0));
    assert_eq!(v["connections"][0]["path"]["style"], "straight");
}

#[test]
fn yaml_input_is_accepted() {
    let v = run_json(&["layout", &arg(&fixture("family.yaml"))]);
    let spouse = &v["connections"][0];
    assert_eq!(spouse["id"], "spouse:A:B");
    assert_eq!(spouse["isDashed"], true);
    assert_eq!(spouse["path"]["d"], "M80,0 L100,0");
}

#[test]
fn collapse_hides_children() {
    let v = run_json(&["--collapse", "A", "--highlight", "D", &arg(&fixture("family.json"))]);
    assert_eq!(v["nodes"]["A"]["isCollapsed"], true);
    assert_eq!(v["nodes"]["C"]["isVisible"], false);
    assert_eq!(v["nodes"]["D"]["isHighlighted"], true);
    assert_eq!(v["connections"].as_array().unwrap().len(), 1);
}

#[test]
fn validate_reports_diagnostics() {
    let family = arg(&fixture("family.json"));
    let v = run_json(&["validate", &family]);
    assert_eq!(v["persons"], 4);
    assert_eq!(v["relationships"], 6);
    assert_eq!(v["visibleNodes"], 4);
    assert_eq!(v["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(v["diagnostics"][0]["relationshipId"], "r-ghost");
    assert_eq!(v["diagnostics"][0]["missingPersonIds"][0], "ghost");

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    Command::new(exe)
        .args(["validate", "--strict", &family])
        .assert()
        .code(3);
}

#[test]
fn export_emits_pixel_geometry() {
    let v = run_json(&[
        "export",
        "--config",
        &arg(&fixture("narrow.yaml")),
        &arg(&fixture("family.json")),
    ]);
    assert_eq!(v["format"], "svg");
    assert_eq!((v["width"].as_u64(), v["height"].as_u64()), (Some(400), Some(520)));
    assert_eq!(v["translateX"].as_f64(), Some(50.0));
    let a = v["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "A")
        .unwrap();
    assert_eq!(a["label"], "Alice Ng");
    assert_eq!(a["x"].as_f64(), Some(20.0));
}

#[test]
fn search_ranks_name_matches() {
    let v = run_json(&["search", "--query", "ALI", &arg(&fixture("family.json"))]);
    let hits = v.as_array().unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h["personId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["A", "D"]);
    assert_eq!(hits[0]["rank"], "prefix");
}

#[test]
fn unknown_root_fails_with_status_one() {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let out = Command::new(exe)
        .args(["--root", "nobody", &arg(&fixture("family.json"))])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&out.get_output().stderr).to_string();
    assert!(stderr.contains("Root person not found: nobody"), "{stderr}");
}

#[test]
fn bad_arguments_print_usage() {
    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let out = Command::new(exe)
        .args(["--layout", "sideways"])
        .assert()
        .code(2);
    let stderr = String::from_utf8_lossy(&out.get_output().stderr).to_string();
    assert!(stderr.contains("USAGE:"));
}

#[test]
fn invalid_config_file_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = tmp.path().join("bad.json");
    std::fs::write(&cfg, r#"{"layout":{"verticalSpacing":-5}}"#).unwrap();

    let exe = assert_cmd::cargo_bin!("lineage-cli");
    let out = Command::new(exe)
        .args(["--config", &arg(&cfg), &arg(&fixture("family.json"))])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&out.get_output().stderr).to_string();
    assert!(stderr.contains("verticalSpacing"), "{stderr}");
}
