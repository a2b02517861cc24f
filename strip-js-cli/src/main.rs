use clap::Parser;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use strip_js::strip;
use strip_js::EmitOptions;
use strip_js::Firing;
use strip_js::PatternSpec;
use strip_js::StripError;
use strip_js::StripOptions;
use strip_js::TopLevelMode;
use tracing::warn;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(
  name = "strip-js",
  version,
  about = "Removes branches decided by an environment probe such as module.hot"
)]
struct Cli {
  /// File to process; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Whether the file is a module or global script.
  #[arg(short, long, value_enum, default_value_t = ModeArg::Global)]
  mode: ModeArg,

  /// Name of the global probe object. Overrides --config.
  #[arg(long)]
  object_name: Option<String>,

  /// Name of the probe property. Overrides --config.
  #[arg(long)]
  property_name: Option<String>,

  /// JSON file with `objectName` and `propertyName`.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Print rewritten code with indentation instead of minified.
  #[arg(long)]
  pretty: bool,

  /// Write a JSON report to stdout.
  #[arg(long)]
  json: bool,

  /// Emit JSON tracing events to stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
  Global,
  Module,
}

impl ModeArg {
  fn as_str(self) -> &'static str {
    match self {
      ModeArg::Global => "global",
      ModeArg::Module => "module",
    }
  }
}

impl From<ModeArg> for TopLevelMode {
  fn from(mode: ModeArg) -> Self {
    match mode {
      ModeArg::Global => TopLevelMode::Global,
      ModeArg::Module => TopLevelMode::Module,
    }
  }
}

#[derive(Serialize)]
struct JsonFiring {
  #[serde(flatten)]
  firing: Firing,
  line: usize,
  column: usize,
}

#[derive(Serialize)]
struct JsonDiagnostic {
  code: &'static str,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  line: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  column: Option<usize>,
}

#[derive(Serialize)]
struct JsonReport {
  schema_version: u32,
  mode: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  output: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  firings: Option<Vec<JsonFiring>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  diagnostics: Option<Vec<JsonDiagnostic>>,
}

impl JsonReport {
  fn new(mode: ModeArg) -> Self {
    JsonReport {
      schema_version: 1,
      mode: mode.as_str(),
      output: None,
      firings: None,
      diagnostics: None,
    }
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .with_writer(std::io::stderr)
    .json()
    .with_ansi(false)
    .try_init();
}

/// Flags win over the config file, which wins over the defaults.
fn load_pattern(args: &Cli) -> Result<PatternSpec, String> {
  let base = match &args.config {
    Some(path) => {
      let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
      match serde_json::from_str::<Value>(&raw) {
        Ok(value) => PatternSpec::from_options(&value),
        Err(err) => {
          warn!(path = %path.display(), %err, "config is not valid JSON, using defaults");
          PatternSpec::default()
        }
      }
    }
    None => PatternSpec::default(),
  };
  Ok(base.merge(args.object_name.as_deref(), args.property_name.as_deref()))
}

fn read_input(args: &Cli) -> Result<String, String> {
  let mut input = Vec::new();
  match &args.input {
    Some(path) => {
      input = fs::read(path).map_err(|err| format!("failed to open {}: {err}", path.display()))?;
    }
    None => {
      stdin()
        .read_to_end(&mut input)
        .map_err(|err| format!("failed to read input: {err}"))?;
    }
  };
  String::from_utf8(input).map_err(|err| format!("input is not valid UTF-8: {err}"))
}

fn write_output(args: &Cli, code: &str) -> Result<(), String> {
  match &args.output {
    Some(path) => fs::write(path, code)
      .map_err(|err| format!("failed to write {}: {err}", path.display())),
    None => stdout()
      .write_all(code.as_bytes())
      .map_err(|err| format!("failed to write output: {err}")),
  }
}

fn diagnostic_for(err: &StripError, source: &str) -> JsonDiagnostic {
  let position = err.loc().map(|loc| loc.line_col(source));
  JsonDiagnostic {
    code: err.code(),
    message: err.to_string(),
    line: position.map(|(line, _)| line),
    column: position.map(|(_, column)| column),
  }
}

fn host_diagnostic(message: String) -> JsonDiagnostic {
  JsonDiagnostic {
    code: "HOST",
    message,
    line: None,
    column: None,
  }
}

fn input_name(args: &Cli) -> String {
  args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string())
}

fn fail(args: &Cli, diagnostic: JsonDiagnostic) -> ExitCode {
  if args.json {
    let mut report = JsonReport::new(args.mode);
    report.diagnostics = Some(vec![diagnostic]);
    print_json(&report);
  } else {
    let name = input_name(args);
    match (diagnostic.line, diagnostic.column) {
      (Some(line), Some(column)) => eprintln!(
        "{name}:{line}:{column}: error[{}]: {}",
        diagnostic.code, diagnostic.message
      ),
      _ => eprintln!("{name}: error[{}]: {}", diagnostic.code, diagnostic.message),
    };
  };
  ExitCode::from(1)
}

fn print_json(report: &JsonReport) {
  // Nothing useful can be reported if stdout itself is gone.
  if let Ok(json) = serde_json::to_string(report) {
    println!("{json}");
  };
}

fn main() -> ExitCode {
  let args = Cli::parse();
  init_tracing(args.trace);

  let pattern = match load_pattern(&args) {
    Ok(pattern) => pattern,
    Err(message) => return fail(&args, host_diagnostic(message)),
  };
  let source = match read_input(&args) {
    Ok(source) => source,
    Err(message) => return fail(&args, host_diagnostic(message)),
  };
  let emit = if args.pretty {
    EmitOptions::pretty()
  } else {
    EmitOptions::minified()
  };
  let options = StripOptions::new(args.mode.into())
    .with_pattern(pattern)
    .with_emit(emit);

  let out = match strip(&options, &source) {
    Ok(out) => out,
    Err(err) => return fail(&args, diagnostic_for(&err, &source)),
  };

  if args.json {
    if args.output.is_some() {
      if let Err(message) = write_output(&args, &out.code) {
        return fail(&args, host_diagnostic(message));
      };
    };
    let firings = out
      .firings
      .iter()
      .map(|firing| {
        let (line, column) = firing.loc.line_col(&source);
        JsonFiring {
          firing: *firing,
          line,
          column,
        }
      })
      .collect();
    let mut report = JsonReport::new(args.mode);
    report.output = Some(out.code);
    report.firings = Some(firings);
    print_json(&report);
  } else if let Err(message) = write_output(&args, &out.code) {
    return fail(&args, host_diagnostic(message));
  };
  ExitCode::SUCCESS
}
