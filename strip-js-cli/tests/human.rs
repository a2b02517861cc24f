use assert_cmd::Command;
use std::time::Duration;
use tempfile::tempdir;

fn strip_js_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("strip-js")
}

#[test]
fn human_mode_writes_output_to_stdout() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("if (module.hot) { module.hot.accept(); }\nstart();")
    .assert()
    .success()
    .code(0);

  assert_eq!(String::from_utf8_lossy(&assert.get_output().stdout), "start();");
  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );
}

#[test]
fn untouched_input_is_copied_verbatim() {
  let src = "// keep me\nif (other.hot) {\n  go();\n}\n";
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin(src)
    .assert()
    .success();

  assert_eq!(String::from_utf8_lossy(&assert.get_output().stdout), src);
}

#[test]
fn pretty_flag_indents_output() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--pretty")
    .write_stdin("if (module.hot) { A(); } else if (otherTest) { B(); } else { C(); }")
    .assert()
    .success();

  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "if (otherTest) {\n  B();\n} else {\n  C();\n}\n"
  );
}

#[test]
fn flags_override_config_file() {
  let dir = tempdir().unwrap();
  let config = dir.path().join("strip.json");
  std::fs::write(&config, r#"{"objectName": "env", "propertyName": "debug"}"#).unwrap();
  let src = "if (env.debug) a();\nif (env.trace) b();\nif (module.hot) c();";

  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--config")
    .arg(&config)
    .write_stdin(src)
    .assert()
    .success();
  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "if(env.trace){b();}if(module.hot){c();}"
  );

  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--config")
    .arg(&config)
    .arg("--property-name")
    .arg("trace")
    .write_stdin(src)
    .assert()
    .success();
  assert_eq!(
    String::from_utf8_lossy(&assert.get_output().stdout),
    "if(env.debug){a();}if(module.hot){c();}"
  );
}

#[test]
fn reads_and_writes_files() {
  let dir = tempdir().unwrap();
  let input = dir.path().join("in.mjs");
  let output = dir.path().join("out.mjs");
  std::fs::write(&input, "export const live = 'hot' in module ? 1 : 0;").unwrap();

  strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--mode")
    .arg("module")
    .arg("--input")
    .arg(&input)
    .arg("--output")
    .arg(&output)
    .assert()
    .success()
    .stdout("");

  assert_eq!(std::fs::read_to_string(&output).unwrap(), "export const live=0;");
}

#[test]
fn human_mode_writes_diagnostics_to_stderr() {
  let assert = strip_js_cli()
    .timeout(Duration::from_secs(5))
    .write_stdin("if (module.hot {")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stdout.is_empty(),
    "expected stdout to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stdout)
  );
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
  assert!(stderr.starts_with("<stdin>:1:"), "unexpected stderr: {stderr}");
  assert!(stderr.contains("error[PS"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_input_file_fails() {
  let dir = tempdir().unwrap();
  strip_js_cli()
    .timeout(Duration::from_secs(5))
    .arg("--input")
    .arg(dir.path().join("missing.js"))
    .assert()
    .failure()
    .code(1);
}
