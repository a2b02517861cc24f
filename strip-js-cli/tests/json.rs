use assert_cmd::Command;
use serde_json::Value;
use std::time::Duration;

fn strip_js_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("strip-js")
}

#[test]
fn json_success_contains_schema_version_output_and_firings() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("x();\nif (!module.hot) {\n  y();\n}")
    .assert()
    .success()
    .code(0);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert_eq!(value["mode"], "global");
  assert_eq!(value["output"], "x();{y();}");

  let firings = value["firings"].as_array().expect("expected firings array");
  assert_eq!(firings.len(), 1);
  assert_eq!(firings[0]["construct"], "if");
  assert_eq!(firings[0]["outcome"], "consequent");
  assert_eq!(firings[0]["line"], 2);
  assert_eq!(firings[0]["column"], 1);
  assert_eq!(firings[0]["loc"][0], 5);
}

#[test]
fn json_reports_no_firings_for_untouched_input() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .arg("--mode")
    .arg("module")
    .write_stdin("var module = {};\nif (module.hot) a();\n")
    .assert()
    .success();

  let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(value["mode"], "module");
  assert_eq!(value["output"], "var module = {};\nif (module.hot) a();\n");
  assert_eq!(value["firings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn json_error_contains_diagnostics_array() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("\nif (module.hot {")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert!(value.get("output").is_none());

  let diagnostics = value
    .get("diagnostics")
    .and_then(|value| value.as_array())
    .expect("expected diagnostics array");
  assert_eq!(diagnostics.len(), 1);
  assert!(diagnostics[0]["code"].as_str().unwrap().starts_with("PS"));
  assert_eq!(diagnostics[0]["line"], 2);
}

#[test]
fn trace_flag_logs_json_to_stderr() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--trace")
    .write_stdin("if (module.hot) a();")
    .assert()
    .success();

  assert_eq!(String::from_utf8_lossy(&assert.get_output().stdout), "");
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  let events: Vec<Value> = stderr
    .lines()
    .map(|line| serde_json::from_str(line).expect("each trace line is JSON"))
    .collect();
  assert!(events
    .iter()
    .any(|event| event["fields"]["message"] == "stripped branch"));
}
