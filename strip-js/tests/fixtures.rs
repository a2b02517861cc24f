use emit_js::EmitOptions;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use std::env::var;
use std::fs;
use std::path::Path;
use strip_js::strip;
use strip_js::PatternSpec;
use strip_js::StripOptions;
use strip_js::TopLevelMode;

// `<name>.js` is stripped with the options in `<name>.options.json` (if any)
// and pretty printed, then compared against `<name>.out.js`.
fn options_for(dir: &Path, name: &str) -> StripOptions {
  let options: Value = match fs::read_to_string(dir.join(format!("{name}.options.json"))) {
    Ok(raw) => serde_json::from_str(&raw).unwrap(),
    Err(_) => Value::Null,
  };
  let mode = match options.get("mode").and_then(Value::as_str) {
    Some("module") => TopLevelMode::Module,
    _ => TopLevelMode::Global,
  };
  StripOptions::new(mode)
    .with_pattern(PatternSpec::from_options(&options))
    .with_emit(EmitOptions::pretty())
}

fn diff(expected: &str, actual: &str) -> String {
  let mut msg = String::new();
  for change in TextDiff::from_lines(expected, actual).iter_all_changes() {
    let sign = match change.tag() {
      ChangeTag::Delete => "-",
      ChangeTag::Insert => "+",
      ChangeTag::Equal => " ",
    };
    msg.push_str(sign);
    msg.push_str(change.as_str().unwrap());
  }
  msg
}

#[test]
fn test_fixtures() {
  let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
  let mut names: Vec<String> = fs::read_dir(&dir)
    .unwrap()
    .map(|entry| entry.unwrap().file_name().to_str().unwrap().to_string())
    .filter(|name| name.ends_with(".js") && !name.ends_with(".out.js"))
    .map(|name| name.trim_end_matches(".js").to_string())
    .collect();
  names.sort();
  assert!(!names.is_empty());

  let regenerate = var("STRIPJS_REGENERATE_FIXTURES").is_ok_and(|v| v == "1");
  let mut failures = Vec::new();
  for name in names {
    let input = fs::read_to_string(dir.join(format!("{name}.js"))).unwrap();
    let actual = strip(&options_for(&dir, &name), &input)
      .unwrap_or_else(|err| panic!("failed to strip {name}: {err}"))
      .code;
    let expected_path = dir.join(format!("{name}.out.js"));
    let expected = fs::read_to_string(&expected_path).unwrap_or_default();
    if actual == expected {
      continue;
    };
    if regenerate {
      fs::write(&expected_path, &actual).unwrap();
    } else {
      failures.push(format!("Failed {name}, got:\n{}", diff(&expected, &actual)));
    };
  }
  assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn test_stripped_fixtures_reparse() {
  let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
  for entry in fs::read_dir(&dir).unwrap() {
    let path = entry.unwrap().path();
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    if !name.ends_with(".out.js") {
      continue;
    };
    let output = fs::read_to_string(&path).unwrap();
    let name = name.trim_end_matches(".out.js");
    // Stripping again must be a no-op.
    let again = strip(&options_for(&dir, name), &output).unwrap();
    assert!(again.firings.is_empty(), "{name} still has decidable probes");
    assert_eq!(again.code, output);
  }
}
